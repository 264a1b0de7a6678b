//! Duplicate detection over validated, not yet deduplicated, transactions.
//!
//! Two independent rules:
//!
//! - **TXID**: two or more transactions share an identifier.
//! - **MERCHANT_AMOUNT_DAY**: two or more transactions share merchant, amount,
//!   currency and UTC calendar date, and carry more than one identifier.
//!   A group with a single identifier is already covered by TXID.
//!
//! TXID groups come first, then MERCHANT_AMOUNT_DAY groups, each in order of
//! first appearance of their key. Members keep input order.

use crate::decimal::Amount;
use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Rule that produced a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DuplicateRule {
    #[serde(rename = "TXID")]
    TxId,
    #[serde(rename = "MERCHANT_AMOUNT_DAY")]
    MerchantAmountDay,
}

/// Two or more transactions sharing a key under one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub rule: DuplicateRule,
    pub transactions: Vec<Transaction>,
}

/// Composite key for the MERCHANT_AMOUNT_DAY rule.
#[derive(Debug, PartialEq, Eq, Hash)]
struct MerchantAmountDay<'a> {
    merchant_ref: &'a str,
    amount: Amount,
    currency: &'a str,
    date: NaiveDate,
}

impl<'a> MerchantAmountDay<'a> {
    fn of(tx: &'a Transaction) -> Self {
        MerchantAmountDay {
            merchant_ref: &tx.merchant_ref,
            amount: tx.amount,
            currency: &tx.currency,
            date: tx.utc_date(),
        }
    }
}

/// Finds duplicate groups under both rules.
pub fn detect_duplicates(transactions: &[Transaction]) -> Vec<DuplicateGroup> {
    let by_id = group_by(transactions, |tx| tx.transaction_id.as_str())
        .into_iter()
        .filter(|group| group.len() > 1)
        .map(|group| DuplicateGroup {
            rule: DuplicateRule::TxId,
            transactions: group.into_iter().cloned().collect(),
        });

    let by_merchant_day = group_by(transactions, MerchantAmountDay::of)
        .into_iter()
        .filter(|group| group.len() > 1 && !shares_one_id(group))
        .map(|group| DuplicateGroup {
            rule: DuplicateRule::MerchantAmountDay,
            transactions: group.into_iter().cloned().collect(),
        });

    by_id.chain(by_merchant_day).collect()
}

/// Groups items by key, groups ordered by first appearance of their key.
pub(crate) fn group_by<'a, K, F>(transactions: &'a [Transaction], key: F) -> Vec<Vec<&'a Transaction>>
where
    K: Hash + Eq,
    F: Fn(&'a Transaction) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Transaction>> = Vec::new();

    for tx in transactions {
        let slot = *index.entry(key(tx)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(tx);
    }

    groups
}

fn shares_one_id(group: &[&Transaction]) -> bool {
    match group.split_first() {
        Some((first, rest)) => rest
            .iter()
            .all(|tx| tx.transaction_id == first.transaction_id),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionStatus;
    use chrono::{DateTime, Utc};
    use std::str::FromStr;

    fn tx(id: &str, merchant: &str, amount: &str, currency: &str, ts: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            merchant_ref: merchant.to_string(),
            amount: Amount::from_str(amount).unwrap(),
            currency: currency.to_string(),
            status: TransactionStatus::Success,
            created_at_utc: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
        }
    }

    fn ids(group: &DuplicateGroup) -> Vec<&str> {
        group
            .transactions
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect()
    }

    #[test]
    fn test_no_duplicates() {
        let txs = vec![
            tx("tx-001", "m-1", "100", "USD", "2025-01-12T01:00:00Z"),
            tx("tx-002", "m-2", "100", "USD", "2025-01-12T02:00:00Z"),
        ];
        assert!(detect_duplicates(&txs).is_empty());
        assert!(detect_duplicates(&[]).is_empty());
    }

    #[test]
    fn test_same_id_only_reports_txid() {
        let txs = vec![
            tx("tx-001", "m-1", "100", "USD", "2025-01-12T01:00:00Z"),
            tx("tx-001", "m-1", "100", "USD", "2025-01-12T02:00:00Z"),
        ];
        let groups = detect_duplicates(&txs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rule, DuplicateRule::TxId);
        assert_eq!(groups[0].transactions, txs);
    }

    #[test]
    fn test_merchant_amount_day_group() {
        let txs = vec![
            tx("tx-001", "m-1", "100", "USD", "2025-01-12T01:00:00Z"),
            tx("tx-002", "m-1", "100.00", "USD", "2025-01-12T23:00:00Z"),
        ];
        let groups = detect_duplicates(&txs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rule, DuplicateRule::MerchantAmountDay);
        assert_eq!(ids(&groups[0]), vec!["tx-001", "tx-002"]);
    }

    #[test]
    fn test_changing_any_key_part_removes_group() {
        let base = tx("tx-001", "m-1", "100", "USD", "2025-01-12T23:00:00Z");
        let variants = [
            tx("tx-002", "m-2", "100", "USD", "2025-01-12T22:00:00Z"),
            tx("tx-002", "m-1", "200", "USD", "2025-01-12T22:00:00Z"),
            tx("tx-002", "m-1", "100", "EUR", "2025-01-12T22:00:00Z"),
            tx("tx-002", "m-1", "100", "USD", "2025-01-13T01:00:00Z"),
        ];
        for other in variants {
            assert!(detect_duplicates(&[base.clone(), other]).is_empty());
        }
    }

    #[test]
    fn test_calendar_date_is_utc() {
        // Same local day at +07:00, different UTC days.
        let txs = vec![
            tx("tx-001", "m-1", "100", "USD", "2025-01-13T06:30:00+07:00"),
            tx("tx-002", "m-1", "100", "USD", "2025-01-13T07:30:00+07:00"),
        ];
        assert!(detect_duplicates(&txs).is_empty());
    }

    #[test]
    fn test_transaction_can_appear_under_both_rules() {
        let txs = vec![
            tx("tx-001", "m-1", "100", "USD", "2025-01-12T01:00:00Z"),
            tx("tx-001", "m-1", "100", "USD", "2025-01-12T02:00:00Z"),
            tx("tx-002", "m-1", "100", "USD", "2025-01-12T03:00:00Z"),
        ];
        let groups = detect_duplicates(&txs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].rule, DuplicateRule::TxId);
        assert_eq!(ids(&groups[0]), vec!["tx-001", "tx-001"]);
        assert_eq!(groups[1].rule, DuplicateRule::MerchantAmountDay);
        assert_eq!(ids(&groups[1]), vec!["tx-001", "tx-001", "tx-002"]);
    }

    #[test]
    fn test_groups_ordered_by_rule_then_first_appearance() {
        let txs = vec![
            tx("tx-010", "m-2", "200", "EUR", "2025-01-13T01:00:00Z"),
            tx("tx-020", "m-1", "100", "USD", "2025-01-12T01:00:00Z"),
            tx("tx-030", "m-9", "1", "GBP", "2025-01-12T01:00:00Z"),
            tx("tx-011", "m-2", "200", "EUR", "2025-01-13T02:00:00Z"),
            tx("tx-030", "m-9", "2", "GBP", "2025-01-12T02:00:00Z"),
            tx("tx-021", "m-1", "100", "USD", "2025-01-12T02:00:00Z"),
        ];
        let groups = detect_duplicates(&txs);
        let summary: Vec<(DuplicateRule, Vec<&str>)> =
            groups.iter().map(|g| (g.rule, ids(g))).collect();
        assert_eq!(
            summary,
            vec![
                (DuplicateRule::TxId, vec!["tx-030", "tx-030"]),
                (DuplicateRule::MerchantAmountDay, vec!["tx-010", "tx-011"]),
                (DuplicateRule::MerchantAmountDay, vec!["tx-020", "tx-021"]),
            ]
        );
    }

    #[test]
    fn test_rule_serializes_as_tag() {
        assert_eq!(serde_json::to_value(DuplicateRule::TxId).unwrap(), "TXID");
        assert_eq!(
            serde_json::to_value(DuplicateRule::MerchantAmountDay).unwrap(),
            "MERCHANT_AMOUNT_DAY"
        );
    }
}
