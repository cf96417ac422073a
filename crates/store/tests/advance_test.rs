//! Customer advance ledger integration tests.

use atelia_core::advances::{AdvanceError, AdvanceStatus, NewAdvance};
use atelia_core::events::PaymentMethod;
use atelia_core::ledger::TransactionStatus;
use atelia_shared::LedgerConfig;
use atelia_shared::types::{CustomerId, UserId};
use atelia_store::Ledger;
use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ledger() -> Ledger {
    Ledger::with_standard_chart(LedgerConfig::default()).unwrap()
}

fn new_advance(customer: CustomerId, amount: Decimal) -> NewAdvance {
    NewAdvance {
        customer_id: customer,
        amount,
        payment_method: PaymentMethod::Cash,
        receipt_number: Some("R-1001".to_string()),
        date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        created_by: UserId::new(),
    }
}

#[test]
fn test_issue_advance_posts_receipt() {
    let ledger = ledger();
    let customer = CustomerId::new();

    let advance = ledger.issue_advance(new_advance(customer, dec!(500.00))).unwrap();
    assert_eq!(advance.status, AdvanceStatus::Active);
    assert_eq!(advance.remaining_amount, dec!(500.00));
    assert_eq!(advance.advance_number, "ADV-202601-00001");
    assert_eq!(advance.used_amount(), dec!(0));

    // The companion transaction debits cash and credits the liability.
    let receipt = ledger
        .get_transaction(advance.receipt_transaction.unwrap())
        .unwrap();
    assert_eq!(receipt.status, TransactionStatus::Posted);

    let cash = ledger.get_account_by_code("1010").unwrap().id;
    let liability = ledger.get_account_by_code("2300").unwrap().id;
    assert_eq!(ledger.get_balance(cash).unwrap(), dec!(500.00));
    assert_eq!(ledger.get_balance(liability).unwrap(), dec!(500.00));
}

#[test]
fn test_partial_consumption_lifecycle() {
    let ledger = ledger();
    let customer = CustomerId::new();
    let actor = UserId::new();

    let advance = ledger.issue_advance(new_advance(customer, dec!(500.00))).unwrap();

    let remaining = ledger.use_advance(advance.id, dec!(300.00), None, actor).unwrap();
    assert_eq!(remaining, dec!(200.00));
    let advance_now = ledger.get_advance(advance.id).unwrap();
    assert_eq!(advance_now.status, AdvanceStatus::PartiallyUsed);
    assert_eq!(advance_now.used_amount(), dec!(300.00));

    // Over-consumption fails and changes nothing.
    let err = ledger
        .use_advance(advance.id, dec!(250.00), None, actor)
        .unwrap_err();
    assert!(matches!(
        err,
        AdvanceError::ExceedsRemaining { requested, remaining }
            if requested == dec!(250.00) && remaining == dec!(200.00)
    ));
    assert_eq!(
        ledger.get_advance(advance.id).unwrap().remaining_amount,
        dec!(200.00)
    );

    // Consuming the rest closes the advance.
    let remaining = ledger.use_advance(advance.id, dec!(200.00), None, actor).unwrap();
    assert_eq!(remaining, dec!(0));
    assert_eq!(
        ledger.get_advance(advance.id).unwrap().status,
        AdvanceStatus::FullyUsed
    );

    // Each consumption left an immutable usage record.
    let usages = ledger.list_advance_usages(advance.id);
    assert_eq!(usages.len(), 2);
    assert_eq!(usages[0].amount, dec!(300.00));
    assert_eq!(usages[1].amount, dec!(200.00));
}

#[test]
fn test_consumption_reclassifies_liability() {
    let ledger = ledger();
    let customer = CustomerId::new();
    let actor = UserId::new();

    let advance = ledger.issue_advance(new_advance(customer, dec!(500.00))).unwrap();
    let liability = ledger.get_account_by_code("2300").unwrap().id;

    // Without an order the liability is released to revenue.
    ledger.use_advance(advance.id, dec!(100.00), None, actor).unwrap();
    let revenue = ledger.get_account_by_code("4010").unwrap().id;
    assert_eq!(ledger.get_balance(liability).unwrap(), dec!(400.00));
    assert_eq!(ledger.get_balance(revenue).unwrap(), dec!(100.00));

    // With an order the liability settles the customer's receivable.
    let order = atelia_shared::types::OrderId::new();
    ledger
        .use_advance(advance.id, dec!(150.00), Some(order), actor)
        .unwrap();
    let receivable = ledger.ensure_customer_account(customer).unwrap();
    assert_eq!(ledger.get_balance(liability).unwrap(), dec!(250.00));
    // The credit against the receivable reduces what the customer owes.
    assert_eq!(ledger.get_balance(receivable.id).unwrap(), dec!(-150.00));
}

#[test]
fn test_zero_and_negative_amounts_rejected() {
    let ledger = ledger();
    let customer = CustomerId::new();
    let actor = UserId::new();

    let advance = ledger.issue_advance(new_advance(customer, dec!(100.00))).unwrap();
    assert!(matches!(
        ledger.use_advance(advance.id, dec!(0), None, actor),
        Err(AdvanceError::InvalidAmount(_))
    ));
    assert!(matches!(
        ledger.issue_advance(new_advance(customer, dec!(-50))),
        Err(AdvanceError::InvalidAmount(_))
    ));
}

#[test]
fn test_refund_returns_remaining_and_pins_status() {
    let ledger = ledger();
    let customer = CustomerId::new();
    let actor = UserId::new();

    let advance = ledger.issue_advance(new_advance(customer, dec!(500.00))).unwrap();
    ledger.use_advance(advance.id, dec!(200.00), None, actor).unwrap();

    let refunded = ledger.refund_advance(advance.id, actor).unwrap();
    assert_eq!(refunded.status, AdvanceStatus::Refunded);
    assert_eq!(refunded.remaining_amount, dec!(0));

    // Liability released, cash returned: 500 in, 200 to revenue, 300 back.
    let cash = ledger.get_account_by_code("1010").unwrap().id;
    let liability = ledger.get_account_by_code("2300").unwrap().id;
    assert_eq!(ledger.get_balance(liability).unwrap(), dec!(0));
    assert_eq!(ledger.get_balance(cash).unwrap(), dec!(200.00));

    // A refunded advance cannot be consumed or refunded again.
    assert!(matches!(
        ledger.use_advance(advance.id, dec!(1), None, actor),
        Err(AdvanceError::NotConsumable(AdvanceStatus::Refunded))
    ));
    assert!(matches!(
        ledger.refund_advance(advance.id, actor),
        Err(AdvanceError::NotRefundable(AdvanceStatus::Refunded))
    ));
}

#[test]
fn test_cancel_reverses_receipt() {
    let ledger = ledger();
    let customer = CustomerId::new();
    let actor = UserId::new();

    let advance = ledger.issue_advance(new_advance(customer, dec!(400.00))).unwrap();
    let cancelled = ledger.cancel_advance(advance.id, actor).unwrap();
    assert_eq!(cancelled.status, AdvanceStatus::Cancelled);

    // The receipt was compensated, so both accounts are flat again.
    let cash = ledger.get_account_by_code("1010").unwrap().id;
    let liability = ledger.get_account_by_code("2300").unwrap().id;
    assert_eq!(ledger.get_balance(cash).unwrap(), dec!(0));
    assert_eq!(ledger.get_balance(liability).unwrap(), dec!(0));
    assert_eq!(
        ledger
            .get_transaction(advance.receipt_transaction.unwrap())
            .unwrap()
            .status,
        TransactionStatus::Cancelled
    );
}

#[test]
fn test_touched_advance_cannot_be_cancelled() {
    let ledger = ledger();
    let customer = CustomerId::new();
    let actor = UserId::new();

    let advance = ledger.issue_advance(new_advance(customer, dec!(400.00))).unwrap();
    ledger.use_advance(advance.id, dec!(100.00), None, actor).unwrap();

    assert!(matches!(
        ledger.cancel_advance(advance.id, actor),
        Err(AdvanceError::NotCancellable(AdvanceStatus::PartiallyUsed))
    ));
}

#[rstest]
#[case(PaymentMethod::Cash, "1010")]
#[case(PaymentMethod::BankTransfer, "1020")]
#[case(PaymentMethod::Card, "1020")]
fn test_receipt_routes_by_payment_method(#[case] method: PaymentMethod, #[case] code: &str) {
    let ledger = ledger();
    let customer = CustomerId::new();

    let mut input = new_advance(customer, dec!(250.00));
    input.payment_method = method;
    ledger.issue_advance(input).unwrap();

    let funds = ledger.get_account_by_code(code).unwrap().id;
    assert_eq!(ledger.get_balance(funds).unwrap(), dec!(250.00));
}

#[test]
fn test_advance_numbers_are_sequential() {
    let ledger = ledger();
    let customer = CustomerId::new();

    let first = ledger.issue_advance(new_advance(customer, dec!(100))).unwrap();
    let second = ledger.issue_advance(new_advance(customer, dec!(100))).unwrap();
    assert_eq!(first.advance_number, "ADV-202601-00001");
    assert_eq!(second.advance_number, "ADV-202601-00002");

    let listed = ledger.list_advances(customer);
    assert_eq!(listed.len(), 2);
}
