use palette::{Hsla, IntoColor, Laba, Mix, Srgba};
use ringplot_common::types::{Rgba, TRANSPARENT};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::{Display, EnumString, VariantNames};

/// A trait for color spaces that colormap stops can be mixed in
pub trait ColorSpace:
    Mix<Scalar = f32> + Copy + IntoColor<Srgba> + Debug + Send + Sync + 'static
{
}

impl<T: Mix<Scalar = f32> + Copy + IntoColor<Srgba> + Debug + Send + Sync + 'static> ColorSpace
    for T
{
}

/// Color space used to blend between neighboring colormap stops.
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
pub enum InterpolationSpace {
    #[default]
    Srgba,
    Hsla,
    Laba,
}

impl InterpolationSpace {
    /// Interpolate over evenly spaced `colors` at each normalized value
    pub fn interpolate(&self, colors: &[Rgba], values: &[f32]) -> Vec<Rgba> {
        match self {
            InterpolationSpace::Srgba => {
                let stops: Vec<Srgba> = colors
                    .iter()
                    .map(|c| Srgba::from_components((c[0], c[1], c[2], c[3])))
                    .collect();
                interpolate_color(&stops, values)
            }
            InterpolationSpace::Hsla => {
                let stops: Vec<Hsla> = colors
                    .iter()
                    .map(|c| Srgba::from_components((c[0], c[1], c[2], c[3])).into_color())
                    .collect();
                interpolate_color(&stops, values)
            }
            InterpolationSpace::Laba => {
                let stops: Vec<Laba> = colors
                    .iter()
                    .map(|c| Srgba::from_components((c[0], c[1], c[2], c[3])).into_color())
                    .collect();
                interpolate_color(&stops, values)
            }
        }
    }
}

/// Generic helper function to interpolate colors using palette's `Mix` trait
fn interpolate_color<C: ColorSpace>(colors: &[C], values: &[f32]) -> Vec<Rgba> {
    if colors.is_empty() {
        return vec![TRANSPARENT; values.len()];
    }
    let scale_factor = (colors.len() - 1) as f32;
    values
        .iter()
        .map(|v| {
            if !v.is_finite() {
                return TRANSPARENT;
            }
            let continuous_index = (v * scale_factor).clamp(0.0, scale_factor);
            let lower_index = continuous_index.floor() as usize;
            let upper_index = continuous_index.ceil() as usize;

            let srgba_color: Srgba = if lower_index == upper_index {
                colors[lower_index].into_color()
            } else {
                let t = continuous_index - lower_index as f32;
                colors[lower_index].mix(colors[upper_index], t).into_color()
            };
            let (r, g, b, a) = srgba_color.into_components();
            [r, g, b, a]
        })
        .collect()
}
