//! Attribute reconciliation between two systems of record.
//!
//! Given a device's attributes as seen by the source of truth (left) and by
//! an external system (right), produce one comparison per attribute key.
//!
//! # Algorithm
//!
//! 1. Walk the left keys in insertion order, then the right-only keys
//! 2. Record presence on each side
//! 3. When both sides carry the key, compare canonical encodings
//! 4. Flag keys from the ignore set
//!
//! A key missing on one side is never marked different. Callers treat
//! missing and different as separate severities.

use crate::{error, AttributeKey, AttributeRecord, AttributeValue, Error};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Comparison of a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeComparison {
    pub key: AttributeKey,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub left_value: Option<AttributeValue>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub right_value: Option<AttributeValue>,
    /// Only computed when both sides are present
    pub is_different: bool,
    pub left_missing: bool,
    pub right_missing: bool,
    pub is_ignored: bool,
}

/// An absent field is a missing value; a present `null` is `Some(Null)`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<AttributeValue>, D::Error>
where
    D: Deserializer<'de>,
{
    AttributeValue::deserialize(deserializer).map(Some)
}

/// Where an attribute stands after comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonStatus {
    Equal,
    Different,
    MissingLeft,
    MissingRight,
}

impl AttributeComparison {
    pub fn status(&self) -> ComparisonStatus {
        if self.left_missing {
            ComparisonStatus::MissingLeft
        } else if self.right_missing {
            ComparisonStatus::MissingRight
        } else if self.is_different {
            ComparisonStatus::Different
        } else {
            ComparisonStatus::Equal
        }
    }

    /// Present on both sides with equal values.
    pub fn is_in_sync(&self) -> bool {
        self.status() == ComparisonStatus::Equal
    }
}

/// Counts per status over a reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileSummary {
    pub total: usize,
    pub equal: usize,
    pub different: usize,
    pub missing_left: usize,
    pub missing_right: usize,
    /// Ignored entries are also counted in their status bucket
    pub ignored: usize,
}

impl ReconcileSummary {
    pub fn from_comparisons(comparisons: &[AttributeComparison]) -> Self {
        let mut summary = Self {
            total: comparisons.len(),
            ..Self::default()
        };

        for comparison in comparisons {
            match comparison.status() {
                ComparisonStatus::Equal => summary.equal += 1,
                ComparisonStatus::Different => summary.different += 1,
                ComparisonStatus::MissingLeft => summary.missing_left += 1,
                ComparisonStatus::MissingRight => summary.missing_right += 1,
            }
            if comparison.is_ignored {
                summary.ignored += 1;
            }
        }

        summary
    }
}

/// Comparisons plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub comparisons: Vec<AttributeComparison>,
    pub summary: ReconcileSummary,
}

impl ReconcileReport {
    /// True when every attribute outside the ignore set is in sync.
    pub fn is_in_sync(&self) -> bool {
        self.comparisons
            .iter()
            .filter(|c| !c.is_ignored)
            .all(AttributeComparison::is_in_sync)
    }

    /// Comparisons that need attention: not ignored and not in sync.
    pub fn mismatches(&self) -> impl Iterator<Item = &AttributeComparison> {
        self.comparisons
            .iter()
            .filter(|c| !c.is_ignored && !c.is_in_sync())
    }
}

/// Compares attribute records, honouring a set of ignored keys.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    ignored_keys: HashSet<AttributeKey>,
}

impl Reconciler {
    /// Create a reconciler that ignores nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one key to the ignore set.
    pub fn ignore(mut self, key: impl Into<AttributeKey>) -> Self {
        self.ignored_keys.insert(key.into());
        self
    }

    /// Add several keys to the ignore set.
    pub fn with_ignored<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<AttributeKey>,
    {
        self.ignored_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_keys.contains(key)
    }

    /// Compare two records, one entry per key in the union of their keys.
    pub fn compare(
        &self,
        left: &AttributeRecord,
        right: &AttributeRecord,
    ) -> error::Result<Vec<AttributeComparison>> {
        let mut comparisons = Vec::with_capacity(left.len() + right.len());

        for (key, left_value) in left.iter() {
            let right_value = right.get(key);
            let is_different = match right_value {
                Some(right_value) => differs(key, left_value, right_value)?,
                None => false,
            };

            comparisons.push(AttributeComparison {
                key: key.clone(),
                left_value: Some(left_value.clone()),
                right_value: right_value.cloned(),
                is_different,
                left_missing: false,
                right_missing: right_value.is_none(),
                is_ignored: self.is_ignored(key),
            });
        }

        for (key, right_value) in right.iter().filter(|(k, _)| !left.contains_key(k)) {
            comparisons.push(AttributeComparison {
                key: key.clone(),
                left_value: None,
                right_value: Some(right_value.clone()),
                is_different: false,
                left_missing: true,
                right_missing: false,
                is_ignored: self.is_ignored(key),
            });
        }

        Ok(comparisons)
    }

    /// Compare two records and summarize the outcome.
    pub fn report(
        &self,
        left: &AttributeRecord,
        right: &AttributeRecord,
    ) -> error::Result<ReconcileReport> {
        let comparisons = self.compare(left, right)?;
        let summary = ReconcileSummary::from_comparisons(&comparisons);
        Ok(ReconcileReport {
            comparisons,
            summary,
        })
    }
}

/// Compare two records with the given ignore set.
pub fn reconcile<I, K>(
    left: &AttributeRecord,
    right: &AttributeRecord,
    ignored_keys: I,
) -> error::Result<Vec<AttributeComparison>>
where
    I: IntoIterator<Item = K>,
    K: Into<AttributeKey>,
{
    Reconciler::new()
        .with_ignored(ignored_keys)
        .compare(left, right)
}

fn differs(key: &str, left: &AttributeValue, right: &AttributeValue) -> error::Result<bool> {
    let encode = |value: &AttributeValue| {
        value.canonical_string().map_err(|e| Error::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })
    };
    Ok(encode(left)? != encode(right)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> AttributeRecord {
        AttributeRecord::from_json(value).unwrap()
    }

    #[test]
    fn present_null_survives_json_round_trip() {
        let left = record(json!({"description": null}));
        let right = record(json!({}));
        let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();

        let json = serde_json::to_value(&result[0]).unwrap();
        assert_eq!(json["leftValue"], serde_json::Value::Null);
        assert!(json.get("rightValue").is_none());

        let back: AttributeComparison = serde_json::from_value(json).unwrap();
        assert_eq!(back.left_value, Some(AttributeValue::Null));
        assert_eq!(back.right_value, None);
        assert_eq!(back, result[0]);
    }

    #[test]
    fn reconcile_basic_scenario() {
        let left = record(json!({"a": 1, "b": 2}));
        let right = record(json!({"a": 1, "b": 3, "c": 4}));

        let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();

        assert_eq!(result.len(), 3);

        assert_eq!(result[0].key, "a");
        assert!(!result[0].is_different);
        assert!(!result[0].left_missing && !result[0].right_missing);

        assert_eq!(result[1].key, "b");
        assert!(result[1].is_different);
        assert_eq!(result[1].left_value, Some(AttributeValue::Int(2)));
        assert_eq!(result[1].right_value, Some(AttributeValue::Int(3)));

        assert_eq!(result[2].key, "c");
        assert!(result[2].left_missing);
        assert!(!result[2].right_missing);
        assert!(!result[2].is_different);
        assert_eq!(result[2].left_value, None);
    }

    #[test]
    fn reconcile_left_only_key() {
        let left = record(json!({"serial": "FOC123", "platform": "ios"}));
        let right = record(json!({"platform": "ios"}));

        let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();

        assert_eq!(result[0].key, "serial");
        assert!(result[0].right_missing);
        assert!(!result[0].left_missing);
        assert!(!result[0].is_different);
        assert_eq!(result[0].status(), ComparisonStatus::MissingRight);
    }

    #[test]
    fn reconcile_order_left_then_right_only() {
        let left = record(json!({"z": 1, "m": 1}));
        let right = record(json!({"q": 1, "m": 1, "a": 1}));

        let keys: Vec<_> = reconcile(&left, &right, Vec::<String>::new())
            .unwrap()
            .into_iter()
            .map(|c| c.key)
            .collect();

        assert_eq!(keys, vec!["z", "m", "q", "a"]);
    }

    #[test]
    fn reconcile_nested_structural_equality() {
        let left = record(json!({"interfaces": {"eth0": {"mtu": 1500, "up": true}}}));
        let right = record(json!({"interfaces": {"eth0": {"up": true, "mtu": 1500}}}));
        let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();
        assert!(!result[0].is_different);

        let right = record(json!({"interfaces": {"eth0": {"up": true, "mtu": 9000}}}));
        let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();
        assert!(result[0].is_different);
    }

    #[test]
    fn reconcile_marks_ignored_keys() {
        let left = record(json!({"name": "r1", "last_seen": "yesterday"}));
        let right = record(json!({"name": "r1", "last_seen": "today"}));

        let result = reconcile(&left, &right, ["last_seen"]).unwrap();

        assert!(!result[0].is_ignored);
        assert!(result[1].is_ignored);
        // Ignored keys are still compared
        assert!(result[1].is_different);
    }

    #[test]
    fn reconcile_serialization_error_names_key() {
        let left = AttributeRecord::new()
            .with("name", "r1")
            .with("load", f64::NAN);
        let right = AttributeRecord::new().with("name", "r1").with("load", 0.5);

        let err = reconcile(&left, &right, Vec::<String>::new()).unwrap_err();
        assert_eq!(err.key(), Some("load"));
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn reconcile_missing_side_is_not_serialized() {
        // A value without canonical form on one side only is reported as missing
        let left = AttributeRecord::new().with("load", f64::INFINITY);
        let right = AttributeRecord::new();

        let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();
        assert!(result[0].right_missing);
    }

    #[test]
    fn reconcile_empty_records() {
        let empty = AttributeRecord::new();
        let result = reconcile(&empty, &empty, Vec::<String>::new()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn report_summary_counts() {
        let left = record(json!({"a": 1, "b": 2, "d": 5, "ts": 1}));
        let right = record(json!({"a": 1, "b": 3, "c": 4, "ts": 2}));

        let report = Reconciler::new().ignore("ts").report(&left, &right).unwrap();

        assert_eq!(
            report.summary,
            ReconcileSummary {
                total: 5,
                equal: 1,
                different: 2,
                missing_left: 1,
                missing_right: 1,
                ignored: 1,
            }
        );
        assert!(!report.is_in_sync());

        let mismatched: Vec<_> = report.mismatches().map(|c| c.key.as_str()).collect();
        assert_eq!(mismatched, vec!["b", "d", "c"]);
    }

    #[test]
    fn report_in_sync_when_only_ignored_differ() {
        let left = record(json!({"name": "r1", "uptime": 10}));
        let right = record(json!({"name": "r1", "uptime": 99}));

        let report = Reconciler::new()
            .with_ignored(["uptime"])
            .report(&left, &right)
            .unwrap();

        assert!(report.is_in_sync());
        assert_eq!(report.mismatches().count(), 0);
    }

    #[test]
    fn comparison_serializes_camel_case() {
        let left = record(json!({"a": 1}));
        let right = AttributeRecord::new();
        let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();

        let json = serde_json::to_value(&result[0]).unwrap();
        assert_eq!(
            json,
            json!({
                "key": "a",
                "leftValue": 1,
                "isDifferent": false,
                "leftMissing": false,
                "rightMissing": true,
                "isIgnored": false
            })
        );
    }

    #[test]
    fn reconcile_deterministic() {
        let left = record(json!({"a": [1, 2], "b": {"x": null}}));
        let right = record(json!({"b": {"x": 0}, "c": "y"}));

        let mut results = Vec::new();
        for _ in 0..10 {
            results.push(reconcile(&left, &right, ["c"]).unwrap());
        }

        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeMap;

        fn arb_value() -> impl Strategy<Value = AttributeValue> {
            let leaf = prop_oneof![
                Just(AttributeValue::Null),
                any::<bool>().prop_map(AttributeValue::Bool),
                (-1000i64..1000).prop_map(AttributeValue::Int),
                "[a-z0-9]{0,6}".prop_map(AttributeValue::String),
            ];
            leaf.prop_recursive(3, 16, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(AttributeValue::List),
                    prop::collection::btree_map("[a-c]", inner, 0..3)
                        .prop_map(|m| AttributeValue::Map(m.into_iter().collect())),
                ]
            })
        }

        fn arb_record() -> impl Strategy<Value = AttributeRecord> {
            prop::collection::btree_map("[a-f]", arb_value(), 0..6)
                .prop_map(|m: BTreeMap<String, AttributeValue>| m.into_iter().collect())
        }

        proptest! {
            #[test]
            fn prop_one_entry_per_union_key(left in arb_record(), right in arb_record()) {
                let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();

                let union: HashSet<_> = left.keys().chain(right.keys()).collect();
                prop_assert_eq!(result.len(), union.len());
            }

            #[test]
            fn prop_exactly_one_presence_state(left in arb_record(), right in arb_record()) {
                for c in reconcile(&left, &right, Vec::<String>::new()).unwrap() {
                    let both = !c.left_missing && !c.right_missing;
                    let states = [both, c.left_missing, c.right_missing];
                    prop_assert_eq!(states.iter().filter(|s| **s).count(), 1);
                    if !both {
                        prop_assert!(!c.is_different);
                    }
                }
            }

            #[test]
            fn prop_identical_records_never_differ(record in arb_record()) {
                let result = reconcile(&record, &record.clone(), Vec::<String>::new()).unwrap();
                prop_assert!(result.iter().all(|c| c.is_in_sync()));
            }

            #[test]
            fn prop_nested_mutation_flips_difference(value in arb_value()) {
                let left = AttributeRecord::new().with("k", value.clone());
                let wrapped = AttributeValue::List(vec![value]);
                let right = AttributeRecord::new().with("k", wrapped);

                let result = reconcile(&left, &right, Vec::<String>::new()).unwrap();
                prop_assert!(result[0].is_different);
            }

            #[test]
            fn prop_reconcile_idempotent(left in arb_record(), right in arb_record()) {
                let first = reconcile(&left, &right, ["a"]).unwrap();
                let second = reconcile(&left, &right, ["a"]).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
