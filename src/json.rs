//! JSON boundary: reads the record batch and writes the report.
//!
//! Field names are matched case-insensitively. A missing field and an
//! explicit `null` both mean "absent" and are left to validation; a field of
//! the wrong JSON type is a structural error.

use crate::decimal::Amount;
use crate::error::{ReportError, Result};
use crate::report::SummaryReport;
use crate::transaction::RawRecord;
use log::warn;
use serde_json::{Map, Value};
use std::io::{Read, Write};

/// Reads a JSON array of transaction records.
///
/// A top-level `null` is an empty batch.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let batch: Option<Vec<Value>> = serde_json::from_reader(reader)?;

    batch
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, value)| parse_record(index, value))
        .collect()
}

/// Writes the report as indented JSON followed by a newline.
pub fn write_report<W: Write>(report: &SummaryReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn parse_record(index: usize, value: &Value) -> Result<RawRecord> {
    let fields = value.as_object().ok_or_else(|| {
        ReportError::invalid_record(index, format!("expected an object, got {}", kind(value)))
    })?;

    Ok(RawRecord {
        transaction_id: string_field(index, fields, "transactionId")?,
        merchant_ref: string_field(index, fields, "merchantRef")?,
        amount: amount_field(index, fields, "amount")?,
        currency: string_field(index, fields, "currency")?,
        status: string_field(index, fields, "status")?,
        created_at_utc: string_field(index, fields, "createdAtUtc")?,
    })
}

/// Finds a field ignoring ASCII case. The first spelling wins.
fn lookup<'a>(index: usize, fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    let mut matches = fields
        .iter()
        .filter(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value);

    let value = matches.next()?;
    if matches.next().is_some() {
        warn!(
            "Record {}: field {} appears under several spellings, using the first",
            index, name
        );
    }
    Some(value)
}

fn string_field(index: usize, fields: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match lookup(index, fields, name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ReportError::invalid_record(
            index,
            format!("{} must be a string, got {}", name, kind(other)),
        )),
    }
}

fn amount_field(index: usize, fields: &Map<String, Value>, name: &str) -> Result<Option<Amount>> {
    match lookup(index, fields, name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Amount::from_json_number(number)
            .map(Some)
            .ok_or_else(|| {
                ReportError::invalid_record(index, format!("{} {} is out of range", name, number))
            }),
        Some(other) => Err(ReportError::invalid_record(
            index,
            format!("{} must be a number, got {}", name, kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
