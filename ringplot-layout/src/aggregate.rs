//! Grouping rows by node (and sub-row) and reducing a value column.

use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::RingplotError;
use crate::table::Table;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Reducer {
    #[default]
    Sum,
    Mean,
}

impl Reducer {
    pub fn from_name(name: &str) -> Result<Self, RingplotError> {
        name.parse::<Self>().map_err(|_| {
            RingplotError::UnknownReducer(name.to_string(), Self::VARIANTS.join(", "))
        })
    }

    fn finish(&self, sum: f64, count: usize) -> f64 {
        match self {
            Reducer::Sum => sum,
            Reducer::Mean => sum / count as f64,
        }
    }
}

/// Key of one aggregated group: a node label, optionally refined by a second
/// key (a sub-row, or the target of a connection).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub primary: String,
    pub secondary: Option<String>,
}

impl GroupKey {
    pub fn node(label: impl Into<String>) -> Self {
        Self {
            primary: label.into(),
            secondary: None,
        }
    }

    pub fn cell(label: impl Into<String>, sublayer: Option<String>) -> Self {
        Self {
            primary: label.into(),
            secondary: sublayer,
        }
    }

    pub fn pair(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            primary: source.into(),
            secondary: Some(target.into()),
        }
    }
}

/// One reduced scalar per group, in first-appearance order of the groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    values: IndexMap<GroupKey, f64>,
}

impl Aggregation {
    pub fn get(&self, key: &GroupKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// Global `(min, max)` over all groups, `None` when empty
    pub fn extent(&self) -> Option<(f64, f64)> {
        self.values.values().fold(None, |acc, v| match acc {
            None => Some((*v, *v)),
            Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
        })
    }

    /// Merge groups whose keys map to the same new key by adding their values
    pub fn merge_keys(self, f: impl Fn(GroupKey) -> GroupKey) -> Self {
        let mut values: IndexMap<GroupKey, f64> = IndexMap::new();
        for (key, value) in self.values {
            *values.entry(f(key)).or_insert(0.0) += value;
        }
        values.retain(|key, value| {
            let finite = value.is_finite();
            if !finite {
                tracing::warn!(node = %key.primary, "merged value overflowed, dropping group");
            }
            finite
        });
        Self { values }
    }

    /// Keep only groups matching the predicate
    pub fn filter(self, f: impl Fn(&GroupKey) -> bool) -> Self {
        Self {
            values: self.values.into_iter().filter(|(k, _)| f(k)).collect(),
        }
    }
}

impl FromIterator<(GroupKey, f64)> for Aggregation {
    fn from_iter<T: IntoIterator<Item = (GroupKey, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

pub struct ValueAggregator;

impl ValueAggregator {
    /// Group rows by `primary` (and `secondary`, when given) and reduce
    /// `value_column` per group.
    ///
    /// Rows with a null key or a null/non-finite value are skipped, so a
    /// group only exists if at least one of its rows carries a value. Groups
    /// whose reduced value overflows are dropped.
    pub fn aggregate(
        data: &RecordBatch,
        primary: &str,
        secondary: Option<&str>,
        value_column: &str,
        reducer: Reducer,
    ) -> Result<Aggregation, RingplotError> {
        let table = Table::new(data);
        table.require(std::iter::once(primary).chain(secondary))?;
        let values = table.values(value_column)?;
        let primary_keys = table.labels(primary)?;
        let secondary_keys = match secondary {
            Some(column) => Some(table.labels(column)?),
            None => None,
        };

        let mut groups: IndexMap<GroupKey, (f64, usize)> = IndexMap::new();
        for (row, value) in values.iter().enumerate() {
            let (Some(value), Some(label)) = (value, &primary_keys[row]) else {
                continue;
            };
            let sublayer = match &secondary_keys {
                Some(keys) => match &keys[row] {
                    Some(key) => Some(key.clone()),
                    None => continue,
                },
                None => None,
            };
            let slot = groups
                .entry(GroupKey::cell(label.clone(), sublayer))
                .or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }

        Ok(groups
            .into_iter()
            .filter_map(|(key, (sum, count))| {
                let value = reducer.finish(sum, count);
                if value.is_finite() {
                    Some((key, value))
                } else {
                    tracing::warn!(
                        column = value_column,
                        node = %key.primary,
                        %reducer,
                        "reduced value overflowed, dropping group"
                    );
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use std::sync::Arc;

    #[test]
    fn test_reducer_names() {
        assert_eq!(Reducer::from_name("sum").unwrap(), Reducer::Sum);
        assert_eq!(Reducer::from_name("mean").unwrap(), Reducer::Mean);
        assert!(matches!(
            Reducer::from_name("median"),
            Err(RingplotError::UnknownReducer(name, expected))
                if name == "median" && expected == "sum, mean"
        ));
    }

    #[test]
    fn test_extent() {
        let agg: Aggregation = vec![
            (GroupKey::node("a"), 3.0),
            (GroupKey::node("b"), -1.0),
            (GroupKey::node("c"), 8.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(agg.extent(), Some((-1.0, 8.0)));
        assert_eq!(Aggregation::default().extent(), None);
    }

    #[test]
    fn test_merge_keys_sums() {
        let agg: Aggregation = vec![
            (GroupKey::pair("a", "b"), 1.0),
            (GroupKey::pair("b", "a"), 2.0),
        ]
        .into_iter()
        .collect();
        let merged = agg.merge_keys(|k| {
            let target = k.secondary.clone().unwrap_or_default();
            if k.primary <= target {
                k
            } else {
                GroupKey::pair(target, k.primary)
            }
        });
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(&GroupKey::pair("a", "b")), Some(3.0));
    }

    #[test]
    fn test_overflowing_groups_are_dropped() {
        let batch = RecordBatch::try_from_iter(vec![
            (
                "n",
                Arc::new(StringArray::from(vec!["a", "a", "b"])) as ArrayRef,
            ),
            (
                "v",
                Arc::new(Float64Array::from(vec![f64::MAX, f64::MAX, 1.0])) as ArrayRef,
            ),
        ])
        .unwrap();
        for reducer in [Reducer::Sum, Reducer::Mean] {
            let agg = ValueAggregator::aggregate(&batch, "n", None, "v", reducer).unwrap();
            assert_eq!(agg.len(), 1);
            assert_eq!(agg.get(&GroupKey::node("b")), Some(1.0));
        }

        let merged: Aggregation = vec![
            (GroupKey::pair("a", "b"), f64::MAX),
            (GroupKey::pair("b", "a"), f64::MAX),
        ]
        .into_iter()
        .collect();
        assert!(merged
            .merge_keys(|_| GroupKey::pair("a", "b"))
            .get(&GroupKey::pair("a", "b"))
            .is_none());
    }
}
