use lyon_path::{geom::point, Path};
use ringplot_common::canvas::{CanvasDimensions, PolarPosition};
use ringplot_common::types::{with_opacity, Rgba, TRANSPARENT};
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;
use crate::marks::arc::SceneArcMark;
use crate::marks::line::SceneLineMark;
use crate::marks::mark::SceneMark;
use crate::marks::path::ScenePathMark;
use crate::marks::text::SceneTextMark;
use crate::surface::{Chord, DrawingSurface, PatchHandle, Polyline, TextLabel, Wedge};

/// Line segments used to approximate one radian of chord end arc
const ARC_SEGMENTS_PER_RADIAN: f32 = 16.0;

/// In-memory scene that records every primitive drawn on it as a mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    pub marks: Vec<SceneMark>,
    pub dimensions: CanvasDimensions,
}

impl SceneGraph {
    pub fn new(dimensions: CanvasDimensions) -> Self {
        Self {
            marks: vec![],
            dimensions,
        }
    }

    pub fn width(&self) -> f32 {
        self.dimensions.size[0]
    }

    pub fn height(&self) -> f32 {
        self.dimensions.size[1]
    }

    pub fn get_mark(&self, index: usize) -> Option<&SceneMark> {
        self.marks.get(index)
    }

    /// All marks drawn under `name`, in drawing order
    pub fn marks_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SceneMark> + 'a {
        self.marks.iter().filter(move |m| m.name() == name)
    }

    fn push_mark(&mut self, mark: SceneMark) -> Vec<PatchHandle> {
        let mark_index = self.marks.len();
        let len = mark.len();
        tracing::trace!(name = mark.name(), len, "pushing mark");
        self.marks.push(mark);
        (0..len)
            .map(|instance_index| PatchHandle {
                mark_index,
                instance_index,
            })
            .collect()
    }

    fn chord_path(&self, chord: &Chord) -> Path {
        let dims = &self.dimensions;
        let center = dims.center();
        let ctrl = point(center[0], center[1]);

        let source = arc_points(
            dims,
            chord.source_angle - chord.source_width / 2.0,
            chord.source_angle + chord.source_width / 2.0,
            chord.radius,
        );
        let target_width = if chord.directed {
            0.0
        } else {
            chord.target_width
        };
        let target = arc_points(
            dims,
            chord.target_angle - target_width / 2.0,
            chord.target_angle + target_width / 2.0,
            chord.radius,
        );

        let mut builder = Path::builder();
        let mut source_iter = source.iter();
        if let Some(first) = source_iter.next() {
            builder.begin(point(first[0], first[1]));
        }
        for p in source_iter {
            builder.line_to(point(p[0], p[1]));
        }
        let mut target_iter = target.iter();
        if let Some(first) = target_iter.next() {
            builder.quadratic_bezier_to(ctrl, point(first[0], first[1]));
        }
        for p in target_iter {
            builder.line_to(point(p[0], p[1]));
        }
        if let Some(first) = source.first() {
            builder.quadratic_bezier_to(ctrl, point(first[0], first[1]));
        }
        builder.end(true);
        builder.build()
    }
}

/// Canvas points along the circle of `radius` from `start` to `end`
fn arc_points(dims: &CanvasDimensions, start: f32, end: f32, radius: f32) -> Vec<[f32; 2]> {
    let segments = (((end - start).abs() * ARC_SEGMENTS_PER_RADIAN).ceil() as usize).max(1);
    if start == end {
        return vec![dims.project(PolarPosition::new(start, radius))];
    }
    (0..=segments)
        .map(|i| {
            let angle = start + (end - start) * i as f32 / segments as f32;
            dims.project(PolarPosition::new(angle, radius))
        })
        .collect()
}

impl DrawingSurface for SceneGraph {
    fn draw_wedges(
        &mut self,
        name: &str,
        wedges: &[Wedge],
    ) -> Result<Vec<PatchHandle>, SurfaceError> {
        if wedges.is_empty() {
            return Ok(vec![]);
        }
        let scale = self.dimensions.scale;
        let mut mark = SceneArcMark {
            name: name.to_string(),
            len: wedges.len() as u32,
            center: self.dimensions.center(),
            stroke_width: if wedges.iter().any(|w| w.stroke.is_some()) {
                1.0
            } else {
                0.0
            },
            ..Default::default()
        };
        let (mut start, mut end, mut inner, mut outer, mut fill, mut stroke) =
            (vec![], vec![], vec![], vec![], vec![], vec![]);
        for w in wedges {
            start.push(w.angle - w.width / 2.0);
            end.push(w.angle + w.width / 2.0);
            inner.push(w.inner_radius * scale);
            outer.push((w.inner_radius + w.height) * scale);
            fill.push(with_opacity(w.fill, w.opacity));
            stroke.push(w.stroke.map_or(TRANSPARENT, |s| with_opacity(s, w.opacity)));
        }
        mark.start_angle = start.into();
        mark.end_angle = end.into();
        mark.inner_radius = inner.into();
        mark.outer_radius = outer.into();
        mark.fill = fill.into();
        mark.stroke = stroke.into();
        Ok(self.push_mark(mark.into()))
    }

    fn draw_chords(
        &mut self,
        name: &str,
        chords: &[Chord],
    ) -> Result<Vec<PatchHandle>, SurfaceError> {
        if chords.is_empty() {
            return Ok(vec![]);
        }
        let mark = ScenePathMark {
            name: name.to_string(),
            len: chords.len() as u32,
            paths: chords.iter().map(|c| self.chord_path(c)).collect(),
            fill: chords
                .iter()
                .map(|c| with_opacity(c.fill, c.opacity))
                .collect::<Vec<_>>()
                .into(),
        };
        Ok(self.push_mark(mark.into()))
    }

    fn draw_polyline(
        &mut self,
        name: &str,
        line: &Polyline,
    ) -> Result<PatchHandle, SurfaceError> {
        if line.points.len() < 2 {
            return Err(SurfaceError::DegeneratePolyline(line.points.len()));
        }
        let mark = SceneLineMark {
            name: name.to_string(),
            points: line
                .points
                .iter()
                .map(|p| self.dimensions.project(*p))
                .collect(),
            closed: line.closed,
            stroke: line.stroke,
            stroke_width: line.stroke_width,
        };
        self.push_mark(mark.into())
            .into_iter()
            .next()
            .ok_or_else(|| SurfaceError::InternalError("line mark produced no handle".into()))
    }

    fn place_text(
        &mut self,
        name: &str,
        labels: &[TextLabel],
    ) -> Result<Vec<PatchHandle>, SurfaceError> {
        if labels.is_empty() {
            return Ok(vec![]);
        }
        let mark = SceneTextMark {
            name: name.to_string(),
            len: labels.len() as u32,
            text: labels.iter().map(|l| l.text.clone()).collect(),
            position: labels
                .iter()
                .map(|l| self.dimensions.project(l.position))
                .collect(),
            angle: labels
                .iter()
                .map(|l| l.rotation.to_degrees())
                .collect::<Vec<_>>()
                .into(),
            align: labels.iter().map(|l| l.align).collect::<Vec<_>>().into(),
            baseline: labels.iter().map(|l| l.baseline).collect::<Vec<_>>().into(),
            color: labels.iter().map(|l| l.color).collect::<Vec<_>>().into(),
            font_size: labels.iter().map(|l| l.font_size).collect::<Vec<_>>().into(),
            font_weight: labels
                .iter()
                .map(|l| l.font_weight)
                .collect::<Vec<_>>()
                .into(),
        };
        Ok(self.push_mark(mark.into()))
    }

    fn restyle(
        &mut self,
        patch: PatchHandle,
        color: Rgba,
        opacity: f32,
    ) -> Result<(), SurfaceError> {
        let color = with_opacity(color, opacity);
        let index = patch.instance_index;
        let updated = match self.marks.get_mut(patch.mark_index) {
            Some(SceneMark::Arc(mark)) => mark.fill.set(index, mark.len as usize, color),
            Some(SceneMark::Path(mark)) => mark.fill.set(index, mark.len as usize, color),
            Some(SceneMark::Text(mark)) => mark.color.set(index, mark.len as usize, color),
            Some(SceneMark::Line(mark)) if index == 0 => {
                mark.stroke = color;
                true
            }
            _ => false,
        };
        if updated {
            Ok(())
        } else {
            Err(SurfaceError::InvalidPatch(patch))
        }
    }
}
