//! Min-max normalization of aggregated values to the unit interval.

use indexmap::IndexMap;
use ringplot_scales::numeric::linear::{LinearNumericScale, LinearNumericScaleConfig};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::aggregate::{Aggregation, GroupKey};

/// Normalized value given to every group when all aggregated values are
/// equal, so `max - min == 0`.
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
pub enum DegenerateRangePolicy {
    /// Every group maps to 1.0
    #[default]
    Max,
    /// Every group maps to 0.0, indistinguishable from missing data
    Min,
    /// Every group maps to 0.5
    Midpoint,
}

impl DegenerateRangePolicy {
    pub fn value(&self) -> f32 {
        match self {
            DegenerateRangePolicy::Max => 1.0,
            DegenerateRangePolicy::Min => 0.0,
            DegenerateRangePolicy::Midpoint => 0.5,
        }
    }
}

/// Relative values in [0, 1] per group. Unknown keys read as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedValues {
    values: IndexMap<GroupKey, f32>,
    degenerate: bool,
}

impl NormalizedValues {
    pub fn get(&self, key: &GroupKey) -> f32 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, key: &GroupKey) -> bool {
        self.values.contains_key(key)
    }

    /// Whether the degenerate range policy was applied
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, f32)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RangeNormalizer {
    policy: DegenerateRangePolicy,
}

impl RangeNormalizer {
    pub fn new(policy: DegenerateRangePolicy) -> Self {
        Self { policy }
    }

    pub fn normalize(&self, aggregation: &Aggregation) -> NormalizedValues {
        let Some((min, max)) = aggregation.extent() else {
            return NormalizedValues::default();
        };

        let scale = LinearNumericScale::new(&LinearNumericScaleConfig {
            domain: (min, max),
            range: (0.0, 1.0),
            clamp: true,
        });

        if scale.is_degenerate() {
            tracing::warn!(
                value = min,
                groups = aggregation.len(),
                policy = %self.policy,
                "all aggregated values are equal, applying degenerate range policy"
            );
            let value = self.policy.value();
            return NormalizedValues {
                values: aggregation.iter().map(|(k, _)| (k.clone(), value)).collect(),
                degenerate: true,
            };
        }

        NormalizedValues {
            values: aggregation
                .iter()
                .map(|(k, v)| (k.clone(), scale.scale(v) as f32))
                .collect(),
            degenerate: false,
        }
    }
}
