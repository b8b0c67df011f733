//! Time-keyed store of committed transactions.

use std::collections::BTreeMap;

use crate::model::Transaction;

/// Append-only collection of committed transactions, keyed by timestamp.
///
/// Transactions can arrive out of chronological order, so the store keeps a
/// sorted index rather than relying on insertion order. Several transactions
/// may share the exact same timestamp; all of them are retained in a bucket
/// under that key.
#[derive(Debug, Default)]
pub struct TransactionHistory {
    entries: BTreeMap<i64, Vec<Transaction>>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed transaction under its own timestamp.
    pub fn insert(&mut self, transaction: Transaction) {
        self.entries
            .entry(transaction.timestamp_millis)
            .or_default()
            .push(transaction);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lazily iterate all entries in descending timestamp order.
    ///
    /// The velocity rule stops this scan at the first entry outside its
    /// window; that early termination is only sound because the order is
    /// strictly non-increasing.
    pub fn scan_back(&self) -> impl Iterator<Item = (i64, &Transaction)> {
        self.entries
            .iter()
            .rev()
            .flat_map(|(ts, bucket)| bucket.iter().map(move |tx| (*ts, tx)))
    }
}
