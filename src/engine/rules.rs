//! The violation rules.
//!
//! Each rule inspects the current account, the candidate transaction and
//! (for the velocity rule) the history, and appends zero or more violations
//! to the ordered result list. Rules never mutate account or history.

use std::collections::VecDeque;

use crate::history::TransactionHistory;
use crate::model::{Transaction, Violation};

use super::Account;

/// Lookback window of the velocity/duplicate rule: 2 minutes.
pub const SMALL_INTERVAL_MS: i64 = 2 * 60 * 1000;

/// `account-not-active` iff the account is inactive.
pub fn check_active_account(account: &Account, violations: &mut Vec<Violation>) {
    if !account.active {
        violations.push(Violation::AccountNotActive);
    }
}

/// `insufficient-limit` iff the amount exceeds the remaining limit.
pub fn check_sufficient_limit(
    account: &Account,
    candidate: &Transaction,
    violations: &mut Vec<Violation>,
) {
    if account.available_limit < candidate.amount {
        violations.push(Violation::InsufficientLimit);
    }
}

/// The windowed velocity/duplicate rule.
///
/// Walks the history newest-first and stops at the first entry at least
/// [`SMALL_INTERVAL_MS`] older than the candidate; descending order means
/// everything beyond it is older still. Entries within the window under the
/// absolute-value test are gathered into a deque (this also admits entries
/// *newer* than the candidate, which exist only after out-of-order
/// insertion). At each step the deque is pruned from the front of any entry
/// more than a window away from the current one, then its total size and
/// its count of entries with the candidate's merchant and amount are
/// recorded. The running maxima over the whole scan decide the outcome:
///
/// - `doubled-transaction` if more than one held entry ever matched the
///   candidate's merchant and amount (timestamps ignored);
/// - `high-frequency-small-interval` if the deque ever held more than two
///   entries.
///
/// Both comparisons against the window are strict: entries exactly
/// 120000ms apart fall outside it.
pub fn check_small_interval(
    history: &TransactionHistory,
    candidate: &Transaction,
    violations: &mut Vec<Violation>,
) {
    if history.is_empty() {
        return;
    }

    let mut held: VecDeque<&Transaction> = VecDeque::new();
    let mut max_total = 0usize;
    let mut max_equal = 0usize;

    for (ts, past) in history.scan_back() {
        let timediff = candidate.timestamp_millis - ts;
        if timediff >= SMALL_INTERVAL_MS {
            break;
        }
        if timediff.abs() >= SMALL_INTERVAL_MS {
            continue;
        }

        held.push_back(past);
        while let Some(front) = held.front() {
            if front.timestamp_millis - ts > SMALL_INTERVAL_MS {
                held.pop_front();
            } else {
                break;
            }
        }

        let equal = held
            .iter()
            .filter(|t| t.merchant == candidate.merchant && t.amount == candidate.amount)
            .count();
        max_total = max_total.max(held.len());
        max_equal = max_equal.max(equal);
    }

    if max_equal > 1 {
        violations.push(Violation::DoubledTransaction);
    }
    if max_total > 2 {
        violations.push(Violation::HighFrequencySmallInterval);
    }
}
