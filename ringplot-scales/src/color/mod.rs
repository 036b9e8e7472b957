pub mod categorical;
pub mod colormap;
pub mod interpolate;

use css_color_parser::Color;
use ringplot_common::types::Rgba;

use crate::error::ScaleError;

/// Parse any CSS color string (`"steelblue"`, `"#1f77b4"`, `"rgba(0,0,0,0.5)"`).
pub fn parse_css_color(value: &str) -> Result<Rgba, ScaleError> {
    value
        .parse::<Color>()
        .map(|color| {
            [
                color.r as f32 / 255.0,
                color.g as f32 / 255.0,
                color.b as f32 / 255.0,
                color.a,
            ]
        })
        .map_err(|_| ScaleError::InvalidColor(value.to_string()))
}

/// Convert a packed `0xRRGGBB` value into an opaque color
pub(crate) const fn hex_rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}
