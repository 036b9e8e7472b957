//! The drawing primitives a ring layout is painted through.
//!
//! Layout code never touches marks directly. It describes wedges, chords,
//! polylines and text in polar layout units and hands them to a
//! [`DrawingSurface`], which owns the drawn output and returns a
//! [`PatchHandle`] per element for later restyling.

use ringplot_common::canvas::PolarPosition;
use ringplot_common::types::{FontWeight, Rgba, TextAlign, TextBaseline};
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// Opaque reference to an element drawn on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatchHandle {
    pub mark_index: usize,
    pub instance_index: usize,
}

/// Annular sector centered on `angle`, spanning `width` radians and
/// reaching from `inner_radius` to `inner_radius + height`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub angle: f32,
    pub width: f32,
    pub inner_radius: f32,
    pub height: f32,
    pub fill: Rgba,
    pub opacity: f32,
    pub stroke: Option<Rgba>,
}

/// Ribbon through the diagram center joining two arcs on the circle of
/// `radius`.
///
/// A directed chord narrows to a point at its target end.
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    pub source_angle: f32,
    pub source_width: f32,
    pub target_angle: f32,
    pub target_width: f32,
    pub radius: f32,
    pub fill: Rgba,
    pub opacity: f32,
    pub directed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<PolarPosition>,
    pub closed: bool,
    pub stroke: Rgba,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: PolarPosition,
    /// Clockwise rotation in radians
    pub rotation: f32,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub color: Rgba,
}

pub trait DrawingSurface {
    fn draw_wedges(
        &mut self,
        name: &str,
        wedges: &[Wedge],
    ) -> Result<Vec<PatchHandle>, SurfaceError>;

    fn draw_chords(
        &mut self,
        name: &str,
        chords: &[Chord],
    ) -> Result<Vec<PatchHandle>, SurfaceError>;

    fn draw_polyline(&mut self, name: &str, line: &Polyline)
        -> Result<PatchHandle, SurfaceError>;

    fn place_text(
        &mut self,
        name: &str,
        labels: &[TextLabel],
    ) -> Result<Vec<PatchHandle>, SurfaceError>;

    /// Change the fill (or stroke, for lines and text) of a drawn element.
    fn restyle(&mut self, patch: PatchHandle, color: Rgba, opacity: f32)
        -> Result<(), SurfaceError>;
}
