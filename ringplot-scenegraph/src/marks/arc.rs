use itertools::izip;
use ringplot_common::types::{Rgba, TRANSPARENT};
use ringplot_common::value::ScalarOrArray;
use serde::{Deserialize, Serialize};

use super::mark::SceneMark;

/// Annular sectors around one center, one per drawn wedge.
///
/// Angles are radians clockwise from 12 o'clock, radii are canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SceneArcMark {
    pub name: String,
    pub len: u32,
    pub center: [f32; 2],
    pub start_angle: ScalarOrArray<f32>,
    pub end_angle: ScalarOrArray<f32>,
    pub inner_radius: ScalarOrArray<f32>,
    pub outer_radius: ScalarOrArray<f32>,
    pub fill: ScalarOrArray<Rgba>,
    pub stroke: ScalarOrArray<Rgba>,
    pub stroke_width: f32,
}

/// One resolved sector of an arc mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSector {
    pub start_angle: f32,
    pub end_angle: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub fill: Rgba,
    pub stroke: Rgba,
}

impl ArcSector {
    pub fn thickness(&self) -> f32 {
        self.outer_radius - self.inner_radius
    }
}

impl SceneArcMark {
    pub fn sectors(&self) -> impl Iterator<Item = ArcSector> + '_ {
        let len = self.len as usize;
        izip!(
            self.start_angle.iter(len),
            self.end_angle.iter(len),
            self.inner_radius.iter(len),
            self.outer_radius.iter(len),
            self.fill.iter(len),
            self.stroke.iter(len)
        )
        .map(
            |(start_angle, end_angle, inner_radius, outer_radius, fill, stroke)| ArcSector {
                start_angle: *start_angle,
                end_angle: *end_angle,
                inner_radius: *inner_radius,
                outer_radius: *outer_radius,
                fill: *fill,
                stroke: *stroke,
            },
        )
    }
}

impl Default for SceneArcMark {
    fn default() -> Self {
        Self {
            name: "arc".to_string(),
            len: 0,
            center: [0.0, 0.0],
            start_angle: ScalarOrArray::Scalar(0.0),
            end_angle: ScalarOrArray::Scalar(0.0),
            inner_radius: ScalarOrArray::Scalar(0.0),
            outer_radius: ScalarOrArray::Scalar(0.0),
            fill: ScalarOrArray::Scalar(TRANSPARENT),
            stroke: ScalarOrArray::Scalar(TRANSPARENT),
            stroke_width: 0.0,
        }
    }
}

impl From<SceneArcMark> for SceneMark {
    fn from(mark: SceneArcMark) -> Self {
        SceneMark::Arc(mark)
    }
}
