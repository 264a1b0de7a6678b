//! Field validation: turns a `RawRecord` into a `Transaction` or a rejection reason.
//!
//! Rules run in a fixed order and the first failing rule decides the reason.
//! A rule whose field is absent passes, leaving the absence to be reported
//! once as `MISSING_FIELDS`.

use crate::transaction::{RawRecord, Transaction, TransactionStatus};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

/// Why a record was rejected. Variants are declared in rule priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    MissingFields,
    InvalidAmount,
    InvalidCurrency,
    InvalidStatus,
    InvalidTimestamp,
}

impl RejectionReason {
    /// All reasons in report order.
    pub const ALL: [RejectionReason; 5] = [
        RejectionReason::MissingFields,
        RejectionReason::InvalidAmount,
        RejectionReason::InvalidCurrency,
        RejectionReason::InvalidStatus,
        RejectionReason::InvalidTimestamp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MissingFields => "MISSING_FIELDS",
            RejectionReason::InvalidAmount => "INVALID_AMOUNT",
            RejectionReason::InvalidCurrency => "INVALID_CURRENCY",
            RejectionReason::InvalidStatus => "INVALID_STATUS",
            RejectionReason::InvalidTimestamp => "INVALID_TIMESTAMP",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule predicate: `true` when the record satisfies the rule.
type Check = fn(&RawRecord) -> bool;

/// Validation rules in priority order.
const RULES: [(RejectionReason, Check); 5] = [
    (RejectionReason::MissingFields, has_required_fields),
    (RejectionReason::InvalidAmount, has_positive_amount),
    (RejectionReason::InvalidCurrency, has_valid_currency),
    (RejectionReason::InvalidStatus, has_known_status),
    (RejectionReason::InvalidTimestamp, has_utc_timestamp),
];

/// Date-time layouts accepted before the UTC designator.
const TIMESTAMP_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Suffixes that mark a timestamp as UTC.
const UTC_DESIGNATORS: [&str; 6] = ["Z", "z", "+00:00", "-00:00", "+0000", "-0000"];

/// Validates a raw record.
///
/// Pure and deterministic: the same record always yields the same result.
pub fn validate(raw: &RawRecord) -> Result<Transaction, RejectionReason> {
    if let Some((reason, _)) = RULES.iter().find(|(_, check)| !check(raw)) {
        return Err(*reason);
    }

    Ok(Transaction {
        transaction_id: raw
            .transaction_id
            .clone()
            .ok_or(RejectionReason::MissingFields)?,
        merchant_ref: raw
            .merchant_ref
            .clone()
            .ok_or(RejectionReason::MissingFields)?,
        amount: raw.amount.ok_or(RejectionReason::MissingFields)?,
        currency: raw.currency.clone().ok_or(RejectionReason::MissingFields)?,
        status: raw
            .status
            .as_deref()
            .and_then(TransactionStatus::parse)
            .ok_or(RejectionReason::InvalidStatus)?,
        created_at_utc: raw
            .created_at_utc
            .as_deref()
            .and_then(parse_utc_timestamp)
            .ok_or(RejectionReason::InvalidTimestamp)?,
    })
}

/// Parses a timestamp that carries an explicit UTC designator.
///
/// Unzoned timestamps and non-zero offsets are rejected even when otherwise
/// well formed. Fractional seconds are optional.
pub fn parse_utc_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let local = UTC_DESIGNATORS
        .iter()
        .find_map(|designator| s.strip_suffix(designator))?;

    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(local, layout).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn has_required_fields(raw: &RawRecord) -> bool {
    !is_blank(&raw.transaction_id)
        && !is_blank(&raw.merchant_ref)
        && raw.amount.is_some()
        && !is_blank(&raw.currency)
        && !is_blank(&raw.status)
        && !is_blank(&raw.created_at_utc)
}

fn has_positive_amount(raw: &RawRecord) -> bool {
    raw.amount.map_or(true, |amount| amount.is_positive())
}

fn has_valid_currency(raw: &RawRecord) -> bool {
    raw.currency
        .as_deref()
        .map_or(true, |c| c.len() == 3 && c.bytes().all(|b| b.is_ascii_uppercase()))
}

fn has_known_status(raw: &RawRecord) -> bool {
    raw.status
        .as_deref()
        .map_or(true, |s| TransactionStatus::parse(s).is_some())
}

fn has_utc_timestamp(raw: &RawRecord) -> bool {
    raw.created_at_utc
        .as_deref()
        .map_or(true, |ts| parse_utc_timestamp(ts).is_some())
}
