//! Options shared by every ring type.

use ringplot_common::types::Rgba;
use ringplot_scales::color::colormap::{Colormap, ColormapName};
use ringplot_scales::color::interpolate::InterpolationSpace;
use serde::{Deserialize, Serialize};

use crate::error::RingplotError;
use crate::labels::LabelConfig;
use crate::node::NEUTRAL_COLOR;
use crate::normalize::DegenerateRangePolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RingOptions {
    /// Inner radius of the ring
    pub radius: f32,
    /// Column the rows are sorted by before node order is taken.
    /// Ignored when drawing on a head layer.
    pub order_by: Option<String>,
    /// Column whose values keep nodes contiguous.
    /// Ignored when drawing on a head layer.
    pub group_by: Option<String>,
    pub show_labels: bool,
    pub colormap: ColormapName,
    pub interpolation: InterpolationSpace,
    pub degenerate_range: DegenerateRangePolicy,
    /// Fill used when the color channel is not encoded
    pub default_color: Rgba,
    pub labels: LabelConfig,
    /// Overrides the ring's default layer name
    pub name: Option<String>,
}

impl Default for RingOptions {
    fn default() -> Self {
        Self {
            radius: 5.0,
            order_by: None,
            group_by: None,
            show_labels: true,
            colormap: ColormapName::default(),
            interpolation: InterpolationSpace::default(),
            degenerate_range: DegenerateRangePolicy::default(),
            default_color: NEUTRAL_COLOR,
            labels: LabelConfig::default(),
            name: None,
        }
    }
}

impl RingOptions {
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    pub fn with_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    pub fn with_colormap(mut self, colormap: ColormapName) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn with_degenerate_range(mut self, policy: DegenerateRangePolicy) -> Self {
        self.degenerate_range = policy;
        self
    }

    pub fn colormap(&self) -> Colormap {
        Colormap::named(self.colormap).with_space(self.interpolation)
    }

    pub fn layer_name<'a>(&'a self, default: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(default)
    }

    pub fn validate(&self) -> Result<(), RingplotError> {
        ensure_non_negative("radius", self.radius)?;
        ensure_non_negative("label offset", self.labels.offset)?;
        ensure_non_negative("group label offset", self.labels.group_offset)
    }
}

/// Fail unless `value` is finite and not negative
pub(crate) fn ensure_non_negative(what: &str, value: f32) -> Result<(), RingplotError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RingplotError::InvalidConfig(format!(
            "{what} must be a finite non-negative number, got {value}"
        )))
    }
}
