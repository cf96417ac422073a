//! Document numbering.
//!
//! Transaction and advance numbers take the form `PREFIX-YYYYMM-NNNNN`,
//! monotonically increasing within each (prefix, month) scope. A number is
//! assigned once at creation and never reused, even when the document it
//! names is later cancelled.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

/// Issues month-scoped document numbers.
#[derive(Debug, Default)]
pub struct NumberSequencer {
    counters: HashMap<(String, u32), u32>,
}

impl NumberSequencer {
    /// Creates a sequencer with all scopes at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next number for the given prefix and date.
    pub fn next(&mut self, prefix: &str, date: NaiveDate) -> String {
        let scope = date.year_ce().1 * 100 + date.month();
        let counter = self
            .counters
            .entry((prefix.to_string(), scope))
            .or_insert(0);
        *counter += 1;
        format!("{prefix}-{scope:06}-{counter:05}")
    }
}
