//! Node and group labels derived from a finished node list.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use itertools::Itertools;
use ringplot_common::types::{FontWeight, Rgba, TextAlign, TextBaseline};
use ringplot_scenegraph::surface::{DrawingSurface, TextLabel, Wedge};
use serde::{Deserialize, Serialize};

use crate::error::RingplotError;
use crate::node::{Node, PolarPosition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LabelConfig {
    /// Gap between the outer edge of the ring and node labels
    pub offset: f32,
    /// Gap between the outer edge of the ring and group brackets
    pub group_offset: f32,
    pub bracket_height: f32,
    pub font_size: f32,
    pub group_font_size: f32,
    pub color: Rgba,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            offset: 0.2,
            group_offset: 1.2,
            bracket_height: 0.05,
            font_size: 10.0,
            group_font_size: 12.0,
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Labels computed for one ring, not yet drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacedLabels {
    pub node_labels: Vec<TextLabel>,
    pub group_brackets: Vec<Wedge>,
    pub group_labels: Vec<TextLabel>,
}

impl PlacedLabels {
    pub fn is_empty(&self) -> bool {
        self.node_labels.is_empty() && self.group_labels.is_empty()
    }

    pub fn draw(&self, name: &str, surface: &mut dyn DrawingSurface) -> Result<(), RingplotError> {
        surface.place_text(&format!("{name}_labels"), &self.node_labels)?;
        surface.draw_wedges(&format!("{name}_group_brackets"), &self.group_brackets)?;
        surface.place_text(&format!("{name}_group_labels"), &self.group_labels)?;
        Ok(())
    }
}

/// Contiguous run of base nodes sharing a group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRun {
    pub group: String,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl GroupRun {
    pub fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelPlacer {
    config: LabelConfig,
}

impl LabelPlacer {
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    /// Lay out labels for the base row (`radius == ring radius`) of `nodes`.
    ///
    /// Node labels sit just outside `radius + extent` and read radially.
    /// When any base node has a group, every contiguous group run also gets a
    /// bracket spanning its angular extent and a tangential label.
    pub fn layout(&self, radius: f32, extent: f32, nodes: &[Node], node_width: f32) -> PlacedLabels {
        let base: Vec<&Node> = nodes
            .iter()
            .filter(|n| n.position.radius == radius)
            .collect();
        let outer = radius + extent;

        let node_labels = base
            .iter()
            .map(|node| {
                let (rotation, align) = radial_text(node.angle());
                TextLabel {
                    text: node.label.clone(),
                    position: PolarPosition::new(node.angle(), outer + self.config.offset),
                    rotation,
                    align,
                    baseline: TextBaseline::Middle,
                    font_size: self.config.font_size,
                    font_weight: FontWeight::Normal,
                    color: self.config.color,
                }
            })
            .collect();

        let runs = group_runs(&base, node_width);
        let bracket_radius = outer + self.config.group_offset;
        let group_brackets = runs
            .iter()
            .map(|run| Wedge {
                angle: run.mid_angle(),
                width: run.end_angle - run.start_angle,
                inner_radius: bracket_radius,
                height: self.config.bracket_height,
                fill: self.config.color,
                opacity: 1.0,
                stroke: None,
            })
            .collect();
        let group_labels = runs
            .iter()
            .map(|run| {
                let (rotation, baseline) = tangential_text(run.mid_angle());
                TextLabel {
                    text: run.group.clone(),
                    position: PolarPosition::new(
                        run.mid_angle(),
                        bracket_radius + self.config.bracket_height + self.config.offset,
                    ),
                    rotation,
                    align: TextAlign::Center,
                    baseline,
                    font_size: self.config.group_font_size,
                    font_weight: FontWeight::Bold,
                    color: self.config.color,
                }
            })
            .collect();

        PlacedLabels {
            node_labels,
            group_brackets,
            group_labels,
        }
    }

    pub fn place(
        &self,
        name: &str,
        radius: f32,
        extent: f32,
        nodes: &[Node],
        node_width: f32,
        surface: &mut dyn DrawingSurface,
    ) -> Result<PlacedLabels, RingplotError> {
        let placed = self.layout(radius, extent, nodes, node_width);
        placed.draw(name, surface)?;
        Ok(placed)
    }
}

/// Contiguous runs of grouped nodes; ungrouped nodes break runs
pub fn group_runs(base: &[&Node], node_width: f32) -> Vec<GroupRun> {
    if base.iter().all(|n| n.group.is_none()) {
        return vec![];
    }
    let chunks = base.iter().chunk_by(|n| n.group.clone());
    let runs = chunks
        .into_iter()
        .filter_map(|(group, run)| {
            let group = group?;
            let run: Vec<_> = run.collect();
            let first = run.first()?;
            let last = run.last()?;
            Some(GroupRun {
                group,
                start_angle: first.angle() - node_width / 2.0,
                end_angle: last.angle() + node_width / 2.0,
            })
        })
        .collect();
    runs
}

/// Rotation and alignment for text reading outwards from the center,
/// flipped on the left half so it is never upside down
fn radial_text(angle: f32) -> (f32, TextAlign) {
    let angle = angle.rem_euclid(TAU);
    if angle <= PI {
        (angle - FRAC_PI_2, TextAlign::Left)
    } else {
        (angle + FRAC_PI_2, TextAlign::Right)
    }
}

/// Rotation and baseline for text running along the circle, flipped on the
/// bottom half
fn tangential_text(angle: f32) -> (f32, TextBaseline) {
    let angle = angle.rem_euclid(TAU);
    if angle > FRAC_PI_2 && angle < 3.0 * FRAC_PI_2 {
        (angle - PI, TextBaseline::Top)
    } else {
        (angle, TextBaseline::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn node(label: &str, group: Option<&str>, angle: f32, radius: f32) -> Node {
        Node::new(
            label,
            group.map(str::to_string),
            None,
            PolarPosition::new(angle, radius),
            0.5,
        )
    }

    #[test]
    fn test_only_base_row_is_labelled() {
        let nodes = vec![node("a", None, 0.0, 2.0), node("a", None, 0.0, 2.5)];
        let placed = LabelPlacer::default().layout(2.0, 1.0, &nodes, 0.5);
        assert_eq!(placed.node_labels.len(), 1);
        assert_approx_eq!(f32, placed.node_labels[0].position.radius, 3.2);
        assert!(placed.group_labels.is_empty());
        assert!(placed.group_brackets.is_empty());
    }

    #[test]
    fn test_group_runs_span_members() {
        let nodes = vec![
            node("a", Some("x"), 0.0, 1.0),
            node("b", Some("x"), 0.5, 1.0),
            node("c", Some("y"), 1.0, 1.0),
            node("d", None, 1.5, 1.0),
        ];
        let placed = LabelPlacer::default().layout(1.0, 0.0, &nodes, 0.5);
        assert_eq!(placed.group_labels.len(), 2);
        assert_eq!(placed.group_labels[0].text, "x");
        assert_approx_eq!(f32, placed.group_brackets[0].width, 1.0);
        assert_approx_eq!(f32, placed.group_brackets[0].angle, 0.25);
        assert_approx_eq!(f32, placed.group_brackets[1].width, 0.5);
    }

    #[test]
    fn test_layout_leaves_nodes_untouched() {
        let nodes = vec![node("a", Some("x"), 0.0, 1.0)];
        let before = nodes.clone();
        LabelPlacer::default().layout(1.0, 0.0, &nodes, 0.5);
        assert_eq!(nodes, before);
    }

    #[test]
    fn test_place_draws_what_layout_computes() {
        use ringplot_scenegraph::marks::mark::SceneMark;
        use ringplot_scenegraph::scene_graph::SceneGraph;

        let nodes = vec![
            node("a", Some("x"), 0.0, 1.0),
            node("b", Some("x"), 0.5, 1.0),
            node("c", Some("y"), 1.0, 1.0),
        ];
        let placer = LabelPlacer::default();
        let mut scene = SceneGraph::new(Default::default());
        let placed = placer
            .place("ring", 1.0, 0.5, &nodes, 0.5, &mut scene)
            .unwrap();
        assert_eq!(placed, placer.layout(1.0, 0.5, &nodes, 0.5));
        assert_eq!(scene.marks.len(), 3);

        let Some(SceneMark::Text(labels)) = scene.marks_named("ring_labels").next() else {
            panic!("expected node labels");
        };
        assert_eq!(labels.len, 3);
        let Some(SceneMark::Arc(brackets)) = scene.marks_named("ring_group_brackets").next()
        else {
            panic!("expected group brackets");
        };
        assert_eq!(brackets.len, 2);
        let Some(SceneMark::Text(groups)) = scene.marks_named("ring_group_labels").next() else {
            panic!("expected group labels");
        };
        assert_eq!(groups.text, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_radial_text_flips_on_left_half() {
        assert_eq!(radial_text(FRAC_PI_2).1, TextAlign::Left);
        assert_eq!(radial_text(3.0 * FRAC_PI_2).1, TextAlign::Right);
        assert_approx_eq!(f32, radial_text(FRAC_PI_2).0, 0.0);
    }
}
