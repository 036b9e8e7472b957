use ringplot_common::types::Rgba;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

use super::hex_rgb;
use super::interpolate::InterpolationSpace;
use crate::color::parse_css_color;
use crate::error::ScaleError;

const JET: [u32; 9] = [
    0x000080, 0x0000ff, 0x0080ff, 0x00ffff, 0x80ff80, 0xffff00, 0xff8000, 0xff0000, 0x800000,
];
const VIRIDIS: [u32; 9] = [
    0x440154, 0x472d7b, 0x3b528b, 0x2c728e, 0x21918c, 0x28ae80, 0x5ec962, 0xaddc30, 0xfde725,
];
const MAGMA: [u32; 9] = [
    0x000004, 0x1c1044, 0x4f127b, 0x812581, 0xb5367a, 0xe55064, 0xfb8761, 0xfec287, 0xfcfdbf,
];
const PLASMA: [u32; 9] = [
    0x0d0887, 0x4c02a1, 0x7e03a8, 0xa92395, 0xcc4778, 0xe56b5d, 0xf89540, 0xfdc527, 0xf0f921,
];
const INFERNO: [u32; 9] = [
    0x000004, 0x1f0c48, 0x550f6d, 0x88226a, 0xba3655, 0xe35933, 0xf98e09, 0xf9cb35, 0xfcffa4,
];
const GREYS: [u32; 2] = [0xffffff, 0x000000];
const REDS: [u32; 2] = [0xfff5f0, 0x67000d];
const BLUES: [u32; 2] = [0xf7fbff, 0x08306b];

/// Built-in continuous palettes
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
pub enum ColormapName {
    #[default]
    Jet,
    Viridis,
    Magma,
    Plasma,
    Inferno,
    Greys,
    Reds,
    Blues,
}

impl ColormapName {
    fn stops(&self) -> &'static [u32] {
        match self {
            ColormapName::Jet => &JET,
            ColormapName::Viridis => &VIRIDIS,
            ColormapName::Magma => &MAGMA,
            ColormapName::Plasma => &PLASMA,
            ColormapName::Inferno => &INFERNO,
            ColormapName::Greys => &GREYS,
            ColormapName::Reds => &REDS,
            ColormapName::Blues => &BLUES,
        }
    }
}

/// Continuous colormap sampling evenly spaced color stops over [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colormap {
    colors: Vec<Rgba>,
    #[serde(default)]
    space: InterpolationSpace,
}

impl Colormap {
    pub fn named(name: ColormapName) -> Self {
        Self {
            colors: name.stops().iter().map(|hex| hex_rgb(*hex)).collect(),
            space: InterpolationSpace::Srgba,
        }
    }

    pub fn from_colors(colors: Vec<Rgba>) -> Result<Self, ScaleError> {
        if colors.len() < 2 {
            return Err(ScaleError::TooFewColors(colors.len()));
        }
        Ok(Self {
            colors,
            space: InterpolationSpace::Srgba,
        })
    }

    /// Build a colormap from CSS color strings
    pub fn from_css<S: AsRef<str>>(colors: &[S]) -> Result<Self, ScaleError> {
        let colors = colors
            .iter()
            .map(|c| parse_css_color(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_colors(colors)
    }

    pub fn with_space(mut self, space: InterpolationSpace) -> Self {
        self.space = space;
        self
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Color at normalized position `t`; values outside [0, 1] are clamped and
    /// non-finite values map to transparent.
    pub fn sample(&self, t: f32) -> Rgba {
        self.sample_many(&[t])[0]
    }

    pub fn sample_many(&self, values: &[f32]) -> Vec<Rgba> {
        self.space.interpolate(&self.colors, values)
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::named(ColormapName::default())
    }
}

impl From<ColormapName> for Colormap {
    fn from(name: ColormapName) -> Self {
        Self::named(name)
    }
}

impl FromStr for Colormap {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColormapName::from_str(s)
            .map(Colormap::named)
            .map_err(|_| ScaleError::UnknownColormap(s.to_string(), ColormapName::VARIANTS.join(", ")))
    }
}
