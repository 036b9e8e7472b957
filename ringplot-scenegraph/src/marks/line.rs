use lyon_path::{geom::point, Path};
use ringplot_common::types::Rgba;
use serde::{Deserialize, Serialize};

use super::mark::SceneMark;

/// Single stroked polyline in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SceneLineMark {
    pub name: String,
    pub points: Vec<[f32; 2]>,
    /// Whether the last point joins back to the first
    pub closed: bool,
    pub stroke: Rgba,
    pub stroke_width: f32,
}

impl SceneLineMark {
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder();
        let mut points = self.points.iter();
        let Some(first) = points.next() else {
            return builder.build();
        };
        builder.begin(point(first[0], first[1]));
        for p in points {
            builder.line_to(point(p[0], p[1]));
        }
        builder.end(self.closed);
        builder.build()
    }
}

impl Default for SceneLineMark {
    fn default() -> Self {
        Self {
            name: "line".to_string(),
            points: vec![],
            closed: false,
            stroke: [0.0, 0.0, 0.0, 1.0],
            stroke_width: 1.0,
        }
    }
}

impl From<SceneLineMark> for SceneMark {
    fn from(mark: SceneLineMark) -> Self {
        SceneMark::Line(mark)
    }
}
