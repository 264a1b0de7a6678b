//! Collapses transactions sharing an identifier to a single representative.

use crate::duplicates::group_by;
use crate::transaction::Transaction;

/// Keeps one transaction per identifier: the one with the latest creation
/// instant. On equal instants the first one encountered wins.
///
/// Output follows the first appearance of each identifier.
pub fn deduplicate(transactions: &[Transaction]) -> Vec<Transaction> {
    group_by(transactions, |tx| tx.transaction_id.as_str())
        .into_iter()
        .filter_map(|group| {
            group
                .into_iter()
                .reduce(|kept, tx| {
                    if tx.created_at_utc > kept.created_at_utc {
                        tx
                    } else {
                        kept
                    }
                })
                .cloned()
        })
        .collect()
}
