//! The authorization engine.
//!
//! Processes a sequential stream of account and transaction events. The
//! first valid account event creates the single account of the run; every
//! transaction after it is checked against the violation rules and, when
//! clean, committed by debiting the account and recording the transaction
//! in the history. Every consumed event yields one [`Authorization`].

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::history::TransactionHistory;
use crate::model::{Event, Transaction, Violation};

mod state;
pub use state::Account;

pub mod rules;

/// Outcome of one consumed event: the account snapshot after whatever
/// mutation (if any) occurred, plus the violations in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub account: Account,
    pub violations: Vec<Violation>,
}

enum State {
    /// No account yet; transaction events are dropped without output.
    AwaitingAccount,
    /// The account exists; a second account event violates, transactions
    /// run through the rules.
    Processing {
        account: Account,
        history: TransactionHistory,
    },
}

/// The sequential event processor.
///
/// Exclusively owns the account and the transaction history for the whole
/// run; one event is fully evaluated and emitted before the next is read.
pub struct Engine {
    state: State,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            state: State::AwaitingAccount,
        }
    }

    /// The current account, once initialized.
    pub fn account(&self) -> Option<&Account> {
        match &self.state {
            State::AwaitingAccount => None,
            State::Processing { account, .. } => Some(account),
        }
    }

    /// Drive the engine over an event stream, handing each outcome to the
    /// sink as soon as it is produced.
    pub async fn run<F>(&mut self, mut stream: impl Stream<Item = Event> + Unpin, mut sink: F)
    where
        F: FnMut(Authorization),
    {
        while let Some(event) = stream.next().await {
            if let Some(outcome) = self.apply(event) {
                sink(outcome);
            }
        }
    }

    /// Apply a single event on top of the current state.
    ///
    /// Returns `None` only while no account exists and the event is not an
    /// account initialization; every event after initialization produces an
    /// outcome.
    pub fn apply(&mut self, event: Event) -> Option<Authorization> {
        match (&mut self.state, event) {
            (State::AwaitingAccount, Event::Account { active, limit }) => {
                let account = Account::new(active, limit);
                info!(active, limit, "account initialized");
                self.state = State::Processing {
                    account,
                    history: TransactionHistory::new(),
                };
                Some(Authorization {
                    account,
                    violations: Vec::new(),
                })
            }
            (State::AwaitingAccount, Event::Transaction(tx)) => {
                warn!(
                    merchant = %tx.merchant,
                    amount = tx.amount,
                    "transaction before account initialization, dropped"
                );
                None
            }
            (State::Processing { account, .. }, Event::Account { .. }) => {
                info!("account re-initialization rejected");
                Some(Authorization {
                    account: *account,
                    violations: vec![Violation::AccountAlreadyInitialized],
                })
            }
            (State::Processing { account, history }, Event::Transaction(tx)) => {
                Some(Self::authorize(account, history, tx))
            }
        }
    }

    /// Run the three rules in fixed order and commit when all pass.
    fn authorize(
        account: &mut Account,
        history: &mut TransactionHistory,
        tx: Transaction,
    ) -> Authorization {
        let mut violations = Vec::new();
        rules::check_active_account(account, &mut violations);
        rules::check_sufficient_limit(account, &tx, &mut violations);
        rules::check_small_interval(history, &tx, &mut violations);

        if violations.is_empty() {
            account.debit(tx.amount);
            info!(
                merchant = %tx.merchant,
                amount = tx.amount,
                available_limit = account.available_limit,
                "transaction committed"
            );
            history.insert(tx);
        } else {
            info!(
                merchant = %tx.merchant,
                amount = tx.amount,
                violations = ?violations,
                "transaction rejected"
            );
        }

        Authorization {
            account: *account,
            violations,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
