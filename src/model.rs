//! Core domain types for the authorizer.

use serde::Serialize;

/// A candidate transaction against the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Amount to debit. Expected positive, not enforced.
    pub amount: i64,
    /// Merchant name, compared verbatim by the duplicate check.
    pub merchant: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
}

/// A classified input event, one per well-formed input line.
#[derive(Debug, Clone)]
pub enum Event {
    /// Account initialization: create the single account of the run.
    Account { active: bool, limit: i64 },
    /// A transaction to authorize against the current account.
    Transaction(Transaction),
}

/// A rule violation attached to an event outcome.
///
/// Serialized as its kebab-case name (e.g. `account-not-active`). Outcomes
/// carry violations as an ordered sequence following evaluation order:
/// active-account, sufficient-limit, then the velocity/duplicate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Violation {
    AccountAlreadyInitialized,
    AccountNotActive,
    DoubledTransaction,
    HighFrequencySmallInterval,
    InsufficientLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_names_are_kebab_case() {
        let names: Vec<String> = [
            Violation::AccountAlreadyInitialized,
            Violation::AccountNotActive,
            Violation::DoubledTransaction,
            Violation::HighFrequencySmallInterval,
            Violation::InsufficientLimit,
        ]
        .iter()
        .map(|v| serde_json::to_string(v).unwrap())
        .collect();

        assert_eq!(
            names,
            [
                "\"account-already-initialized\"",
                "\"account-not-active\"",
                "\"doubled-transaction\"",
                "\"high-frequency-small-interval\"",
                "\"insufficient-limit\"",
            ]
        );
    }
}
