//! Transaction models: the loosely-typed input record and the validated domain type.

use crate::decimal::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Raw transaction record as supplied by the caller.
///
/// Every field is optional; absence or blankness is a validation failure,
/// not a parse error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub transaction_id: Option<String>,
    pub merchant_ref: Option<String>,
    pub amount: Option<Amount>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub created_at_utc: Option<String>,
}

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
}

impl TransactionStatus {
    /// All statuses in report order.
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Success,
        TransactionStatus::Failed,
        TransactionStatus::Pending,
    ];

    /// Parses a status name. Matching is case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(TransactionStatus::Success),
            "FAILED" => Some(TransactionStatus::Failed),
            "PENDING" => Some(TransactionStatus::Pending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction that passed every validation rule.
///
/// Only `validator::validate` builds these, so a `Transaction` is never
/// partially valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Non-empty identifier, used for TXID grouping and deduplication
    pub transaction_id: String,

    /// Non-empty merchant reference
    pub merchant_ref: String,

    /// Strictly positive amount, kept at its input precision
    pub amount: Amount,

    /// Three uppercase ASCII letters
    pub currency: String,

    pub status: TransactionStatus,

    /// Creation instant in UTC
    pub created_at_utc: DateTime<Utc>,
}

impl Transaction {
    /// Calendar date of the creation instant in UTC.
    pub fn utc_date(&self) -> NaiveDate {
        self.created_at_utc.date_naive()
    }
}
