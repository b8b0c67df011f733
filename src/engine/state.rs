//! The single account of a run.

/// The account with its active flag and remaining spending limit.
///
/// The engine holds exactly one account per run. The limit only ever
/// decreases, and only through [`Account::debit`] after a transaction passed
/// every rule. Nothing here stops the limit going negative; the
/// insufficient-limit rule is what prevents that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub active: bool,
    pub available_limit: i64,
}

impl Account {
    pub fn new(active: bool, limit: i64) -> Self {
        Self {
            active,
            available_limit: limit,
        }
    }

    /// Subtract `amount` unconditionally. Only call with zero violations.
    pub fn debit(&mut self, amount: i64) {
        self.available_limit -= amount;
    }
}
