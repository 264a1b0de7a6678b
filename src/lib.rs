//! # Payments Report
//!
//! Validates a batch of payment transaction records, detects duplicates and
//! produces a summary report.
//!
//! ## Pipeline
//!
//! - **Validation**: each record is checked against ordered rules; the first
//!   failing rule names the rejection reason
//! - **Duplicate detection**: groups by identifier (`TXID`) and by
//!   merchant, amount, currency and UTC day (`MERCHANT_AMOUNT_DAY`)
//! - **Deduplication**: one transaction per identifier, latest timestamp wins
//! - **Aggregation**: status counts and amount statistics over the
//!   deduplicated set, with exact decimal arithmetic via `rust_decimal`
//!
//! ## Example
//!
//! ```
//! use payments_report::{process, read_records, TransactionStatus};
//! use std::io::Cursor;
//!
//! let json = r#"[
//!   {"transactionId":"tx-001","merchantRef":"m-1","amount":100,"currency":"USD",
//!    "status":"SUCCESS","createdAtUtc":"2025-01-12T01:00:00Z"},
//!   {"transactionId":"tx-001","merchantRef":"m-1","amount":100,"currency":"USD",
//!    "status":"SUCCESS","createdAtUtc":"2025-01-12T02:00:00Z"}
//! ]"#;
//!
//! let records = read_records(Cursor::new(json)).unwrap();
//! let report = process(&records);
//! assert_eq!(report.duplicate_groups.len(), 1);
//! assert_eq!(report.with_status(TransactionStatus::Success), 1);
//! ```

pub mod decimal;
pub mod dedup;
pub mod duplicates;
pub mod error;
pub mod json;
pub mod report;
pub mod transaction;
pub mod validator;

pub use decimal::Amount;
pub use dedup::deduplicate;
pub use duplicates::{detect_duplicates, DuplicateGroup, DuplicateRule};
pub use error::{ReportError, Result};
pub use json::{read_records, write_report};
pub use report::{process, AmountStats, SummaryReport};
pub use transaction::{RawRecord, Transaction, TransactionStatus};
pub use validator::{validate, RejectionReason};
