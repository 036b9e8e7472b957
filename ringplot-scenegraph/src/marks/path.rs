use lyon_path::Path;
use ringplot_common::types::{Rgba, TRANSPARENT};
use ringplot_common::value::ScalarOrArray;
use serde::{Deserialize, Serialize};

use super::mark::SceneMark;

/// Filled outlines in canvas coordinates, one per chord.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenePathMark {
    pub name: String,
    pub len: u32,
    pub paths: Vec<Path>,
    pub fill: ScalarOrArray<Rgba>,
}

impl ScenePathMark {
    pub fn shapes(&self) -> impl Iterator<Item = (&Path, &Rgba)> + '_ {
        self.paths.iter().zip(self.fill.iter(self.len as usize))
    }
}

impl Default for ScenePathMark {
    fn default() -> Self {
        Self {
            name: "path".to_string(),
            len: 0,
            paths: vec![],
            fill: ScalarOrArray::Scalar(TRANSPARENT),
        }
    }
}

impl From<ScenePathMark> for SceneMark {
    fn from(mark: ScenePathMark) -> Self {
        SceneMark::Path(mark)
    }
}
