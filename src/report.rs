//! Report aggregation.
//!
//! Validates every record, detects duplicates on the validated set,
//! deduplicates by identifier, then tallies statuses and amount statistics.
//! Every record is classified individually; nothing aborts the batch.

use crate::decimal::Amount;
use crate::dedup::deduplicate;
use crate::duplicates::{detect_duplicates, DuplicateGroup};
use crate::transaction::{RawRecord, Transaction, TransactionStatus};
use crate::validator::{validate, RejectionReason};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

/// Amount statistics over deduplicated SUCCESS transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountStats {
    pub min: Amount,
    pub max: Amount,

    /// Mean rounded half-to-even to two decimal places
    pub avg: Amount,
}

impl AmountStats {
    /// Computes statistics for the given amounts; all zero when empty.
    pub fn from_amounts(amounts: &[Amount]) -> Self {
        match (amounts.iter().min(), amounts.iter().max()) {
            (Some(min), Some(max)) => AmountStats {
                min: *min,
                max: *max,
                avg: Amount::mean(amounts),
            },
            _ => AmountStats::default(),
        }
    }
}

impl Default for AmountStats {
    fn default() -> Self {
        AmountStats {
            min: Amount::ZERO,
            max: Amount::ZERO,
            avg: Amount::mean(&[]),
        }
    }
}

/// Summary of one batch.
///
/// # Invariants
///
/// - `total_transactions == valid_transactions + invalid_transactions`
/// - `invalid_reasons` holds every `RejectionReason` and `status_counts`
///   every `TransactionStatus`, zero when unseen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_transactions: usize,
    pub valid_transactions: usize,
    pub invalid_transactions: usize,

    /// Rejections per reason
    pub invalid_reasons: BTreeMap<RejectionReason, usize>,

    /// Statuses after deduplication
    pub status_counts: BTreeMap<TransactionStatus, usize>,

    pub success_amount_stats: AmountStats,

    /// Groups found before deduplication
    pub duplicate_groups: Vec<DuplicateGroup>,
}

impl SummaryReport {
    /// Number of records rejected for `reason`.
    pub fn rejected(&self, reason: RejectionReason) -> usize {
        self.invalid_reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Number of deduplicated transactions with `status`.
    pub fn with_status(&self, status: TransactionStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

/// Processes a batch of raw records into a summary report.
///
/// Pure apart from logging: the same batch always yields the same report.
pub fn process(records: &[RawRecord]) -> SummaryReport {
    let mut invalid_reasons: BTreeMap<RejectionReason, usize> =
        RejectionReason::ALL.iter().map(|reason| (*reason, 0)).collect();
    let mut valid: Vec<Transaction> = Vec::with_capacity(records.len());

    for (index, raw) in records.iter().enumerate() {
        match validate(raw) {
            Ok(tx) => valid.push(tx),
            Err(reason) => {
                debug!("Record {}: rejected with {}", index, reason);
                *invalid_reasons.entry(reason).or_insert(0) += 1;
            }
        }
    }

    let duplicate_groups = detect_duplicates(&valid);
    for group in &duplicate_groups {
        debug!(
            "Duplicate group {:?} with {} transactions",
            group.rule,
            group.transactions.len()
        );
    }

    let deduplicated = deduplicate(&valid);

    let mut status_counts: BTreeMap<TransactionStatus, usize> =
        TransactionStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for tx in &deduplicated {
        *status_counts.entry(tx.status).or_insert(0) += 1;
    }

    let success_amounts: Vec<Amount> = deduplicated
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Success)
        .map(|tx| tx.amount)
        .collect();

    let report = SummaryReport {
        total_transactions: records.len(),
        valid_transactions: valid.len(),
        invalid_transactions: records.len() - valid.len(),
        invalid_reasons,
        status_counts,
        success_amount_stats: AmountStats::from_amounts(&success_amounts),
        duplicate_groups,
    };

    info!(
        "Processed {} records: {} valid, {} invalid, {} unique, {} duplicate groups",
        report.total_transactions,
        report.valid_transactions,
        report.invalid_transactions,
        deduplicated.len(),
        report.duplicate_groups.len()
    );

    report
}
