use thiserror::Error;

use crate::surface::PatchHandle;

#[derive(Error, Debug, PartialEq)]
pub enum SurfaceError {
    #[error("Internal error: `{0}`")]
    InternalError(String),

    #[error("Patch handle does not refer to a drawn element: {0:?}")]
    InvalidPatch(PatchHandle),

    #[error("Polyline needs at least two points, got {0}")]
    DegeneratePolyline(usize),
}
