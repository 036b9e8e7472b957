use serde::{Deserialize, Serialize};

use crate::marks::arc::SceneArcMark;
use crate::marks::line::SceneLineMark;
use crate::marks::path::ScenePathMark;
use crate::marks::text::SceneTextMark;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneMark {
    Arc(SceneArcMark),
    Path(ScenePathMark),
    Line(SceneLineMark),
    Text(SceneTextMark),
}

impl SceneMark {
    pub fn name(&self) -> &str {
        match self {
            Self::Arc(mark) => &mark.name,
            Self::Path(mark) => &mark.name,
            Self::Line(mark) => &mark.name,
            Self::Text(mark) => &mark.name,
        }
    }

    /// Number of separately restylable instances. A line is one.
    pub fn len(&self) -> usize {
        match self {
            Self::Arc(mark) => mark.len as usize,
            Self::Path(mark) => mark.len as usize,
            Self::Line(_) => 1,
            Self::Text(mark) => mark.len as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
