use itertools::izip;
use ringplot_common::types::{FontWeight, Rgba, TextAlign, TextBaseline};
use ringplot_common::value::ScalarOrArray;
use serde::{Deserialize, Serialize};

use super::mark::SceneMark;

/// Text labels anchored at canvas positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SceneTextMark {
    pub name: String,
    pub len: u32,
    pub text: Vec<String>,
    pub position: Vec<[f32; 2]>,
    /// Clockwise rotation in degrees
    pub angle: ScalarOrArray<f32>,
    pub align: ScalarOrArray<TextAlign>,
    pub baseline: ScalarOrArray<TextBaseline>,
    pub color: ScalarOrArray<Rgba>,
    pub font_size: ScalarOrArray<f32>,
    pub font_weight: ScalarOrArray<FontWeight>,
}

/// One resolved label of a text mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub position: [f32; 2],
    pub angle: f32,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub color: Rgba,
    pub font_size: f32,
    pub font_weight: FontWeight,
}

impl SceneTextMark {
    pub fn runs(&self) -> impl Iterator<Item = TextRun<'_>> + '_ {
        let len = self.len as usize;
        izip!(
            &self.text,
            &self.position,
            self.angle.iter(len),
            self.align.iter(len),
            self.baseline.iter(len),
            self.color.iter(len),
            self.font_size.iter(len),
            self.font_weight.iter(len)
        )
        .map(
            |(text, position, angle, align, baseline, color, font_size, font_weight)| TextRun {
                text,
                position: *position,
                angle: *angle,
                align: *align,
                baseline: *baseline,
                color: *color,
                font_size: *font_size,
                font_weight: *font_weight,
            },
        )
    }
}

impl Default for SceneTextMark {
    fn default() -> Self {
        Self {
            name: "text".to_string(),
            len: 0,
            text: vec![],
            position: vec![],
            angle: ScalarOrArray::Scalar(0.0),
            align: ScalarOrArray::Scalar(TextAlign::default()),
            baseline: ScalarOrArray::Scalar(TextBaseline::default()),
            color: ScalarOrArray::Scalar([0.0, 0.0, 0.0, 1.0]),
            font_size: ScalarOrArray::Scalar(10.0),
            font_weight: ScalarOrArray::Scalar(FontWeight::default()),
        }
    }
}

impl From<SceneTextMark> for SceneMark {
    fn from(mark: SceneTextMark) -> Self {
        SceneMark::Text(mark)
    }
}
