use serde::{Deserialize, Serialize};
use strum::VariantNames;

/// Straight (not premultiplied) RGBA color with components in [0, 1].
pub type Rgba = [f32; 4];

pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Scale the alpha component of a color by `opacity`.
pub fn with_opacity(color: Rgba, opacity: f32) -> Rgba {
    [color[0], color[1], color[2], color[3] * opacity.clamp(0.0, 1.0)]
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TextBaseline {
    Alphabetic,
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}
