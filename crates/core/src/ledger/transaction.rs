//! Transaction aggregate and the posting state machine.

use atelia_shared::types::{
    BranchId, CustomerId, OrderId, PaymentId, TransactionId, UserId,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line::{NewLine, TransactionLine};

/// Transaction type classification.
///
/// Categorizes transactions for reporting and numbering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Payment received against an order or balance.
    Payment,
    /// Receipt of a customer advance.
    Advance,
    /// Sales invoice.
    Invoice,
    /// Refund to a customer.
    Refund,
    /// Expense transaction.
    Expense,
    /// Transfer or reclassification between accounts.
    Transfer,
    /// Adjustment entry.
    Adjustment,
    /// Opening balance entry.
    Opening,
}

/// Transaction status.
///
/// Transactions progress `Draft -> Posted -> Cancelled`; no transition
/// re-enters `Draft` and posted lines are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Transaction is being drafted and can be modified or deleted.
    Draft,
    /// Transaction has been posted to the ledger (immutable).
    Posted,
    /// Transaction has been cancelled via a compensating reversal
    /// (immutable).
    Cancelled,
}

impl TransactionStatus {
    /// Returns true if the transaction can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the transaction is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Cancelled)
    }

    /// Returns true if the transaction can be posted.
    #[must_use]
    pub fn can_post(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the transaction can be cancelled.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// A financial transaction owning an ordered set of balanced lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Generated document number, `PREFIX-YYYYMM-NNNNN`; assigned once at
    /// creation and never reused.
    pub transaction_number: String,
    /// Transaction type.
    pub kind: TransactionKind,
    /// Current status.
    pub status: TransactionStatus,
    /// Business date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional external reference (receipt number, invoice number).
    pub reference: Option<String>,
    /// Linked customer, if any.
    pub customer_id: Option<CustomerId>,
    /// Linked order, if any.
    pub order_id: Option<OrderId>,
    /// Linked payment, if any.
    pub payment_id: Option<PaymentId>,
    /// Linked branch, if any.
    pub branch_id: Option<BranchId>,
    /// For a reversal, the transaction it compensates.
    pub reverses: Option<TransactionId>,
    /// Sum of all line debits.
    pub total_debit: Decimal,
    /// Sum of all line credits.
    pub total_credit: Decimal,
    /// User who created the transaction.
    pub created_by: UserId,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
    /// User who posted the transaction.
    pub posted_by: Option<UserId>,
    /// When the transaction was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// Lines in insertion order. Order is significant for display, not for
    /// balance.
    pub lines: Vec<TransactionLine>,
}

impl Transaction {
    /// Recomputes `total_debit`/`total_credit` from the lines.
    ///
    /// Must be called whenever lines are added, removed, or edited on a
    /// draft, and before any balance check.
    pub fn calculate_totals(&mut self) {
        self.total_debit = self.lines.iter().map(|line| line.debit).sum();
        self.total_credit = self.lines.iter().map(|line| line.credit).sum();
    }

    /// Returns true if total debits equal total credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }

    /// Returns the distinct accounts referenced by the lines, in first-seen
    /// order.
    #[must_use]
    pub fn distinct_accounts(&self) -> Vec<atelia_shared::types::AccountId> {
        let mut seen = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.account_id) {
                seen.push(line.account_id);
            }
        }
        seen
    }
}

/// Input for creating a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Transaction type.
    pub kind: TransactionKind,
    /// Business date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Linked customer, if any.
    pub customer_id: Option<CustomerId>,
    /// Linked order, if any.
    pub order_id: Option<OrderId>,
    /// Linked payment, if any.
    pub payment_id: Option<PaymentId>,
    /// Linked branch, if any.
    pub branch_id: Option<BranchId>,
    /// For a reversal, the transaction it compensates.
    pub reverses: Option<TransactionId>,
    /// The user creating the transaction.
    pub created_by: UserId,
    /// Lines (must have at least 2 to post).
    pub lines: Vec<NewLine>,
}

impl NewTransaction {
    /// Creates an input with the given kind, date, description and creator;
    /// no links and no lines.
    #[must_use]
    pub fn new(
        kind: TransactionKind,
        date: NaiveDate,
        description: impl Into<String>,
        created_by: UserId,
    ) -> Self {
        Self {
            kind,
            date,
            description: description.into(),
            reference: None,
            customer_id: None,
            order_id: None,
            payment_id: None,
            branch_id: None,
            reverses: None,
            created_by,
            lines: Vec::new(),
        }
    }

    /// Adds a line.
    #[must_use]
    pub fn with_line(mut self, line: NewLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Links a customer.
    #[must_use]
    pub fn for_customer(mut self, customer: CustomerId) -> Self {
        self.customer_id = Some(customer);
        self
    }

    /// Sets the external reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
