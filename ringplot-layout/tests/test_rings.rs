use std::f32::consts::TAU;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::record_batch::RecordBatch;
use float_cmp::assert_approx_eq;
use ringplot_common::canvas::CanvasDimensions;
use ringplot_common::types::Rgba;
use ringplot_layout::aggregate::Reducer;
use ringplot_layout::config::RingOptions;
use ringplot_layout::encode::EncodingChannel;
use ringplot_layout::error::RingplotError;
use ringplot_layout::node::NEUTRAL_COLOR;
use ringplot_layout::normalize::DegenerateRangePolicy;
use ringplot_layout::rings::{
    CategoryRing, ConnectionRing, HeatMapRing, HistogramRing, LineRing, Ring,
};
use ringplot_scenegraph::error::SurfaceError;
use ringplot_scenegraph::marks::mark::SceneMark;
use ringplot_scenegraph::scene_graph::SceneGraph;
use ringplot_scenegraph::surface::{Chord, DrawingSurface, PatchHandle, Polyline, TextLabel, Wedge};
use rstest::rstest;

fn scene() -> SceneGraph {
    SceneGraph::new(CanvasDimensions::default())
}

fn no_labels() -> RingOptions {
    RingOptions::default().with_labels(false)
}

fn histogram_batch(labels: Vec<&str>, values: Vec<f64>) -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("node", Arc::new(StringArray::from(labels)) as ArrayRef),
        ("value", Arc::new(Float64Array::from(values)) as ArrayRef),
    ])
    .unwrap()
}

/// Surface that counts calls and never draws
#[derive(Default)]
struct CountingSurface {
    calls: usize,
}

impl DrawingSurface for CountingSurface {
    fn draw_wedges(&mut self, _: &str, w: &[Wedge]) -> Result<Vec<PatchHandle>, SurfaceError> {
        self.calls += 1;
        Ok((0..w.len())
            .map(|i| PatchHandle {
                mark_index: 0,
                instance_index: i,
            })
            .collect())
    }

    fn draw_chords(&mut self, _: &str, c: &[Chord]) -> Result<Vec<PatchHandle>, SurfaceError> {
        self.calls += 1;
        Ok((0..c.len())
            .map(|i| PatchHandle {
                mark_index: 0,
                instance_index: i,
            })
            .collect())
    }

    fn draw_polyline(&mut self, _: &str, _: &Polyline) -> Result<PatchHandle, SurfaceError> {
        self.calls += 1;
        Ok(PatchHandle {
            mark_index: 0,
            instance_index: 0,
        })
    }

    fn place_text(&mut self, _: &str, _: &[TextLabel]) -> Result<Vec<PatchHandle>, SurfaceError> {
        self.calls += 1;
        Ok(vec![])
    }

    fn restyle(&mut self, _: PatchHandle, _: Rgba, _: f32) -> Result<(), SurfaceError> {
        self.calls += 1;
        Ok(())
    }
}

#[test]
fn test_histogram_three_nodes() {
    let mut scene = scene();
    let layer = HistogramRing::new("node", "value")
        .with_max_height(2.0)
        .with_options(no_labels().with_radius(4.0))
        .draw(
            &histogram_batch(vec!["A", "B", "C"], vec![10.0, 20.0, 30.0]),
            &mut scene,
            None,
        )
        .unwrap();

    assert_eq!(layer.name(), "histogram");
    assert_approx_eq!(f32, layer.extent(), 2.0);
    assert_approx_eq!(f32, layer.node_width(), TAU / 3.0);
    let relative: Vec<f32> = layer.node_list().iter().map(|n| n.relative_value).collect();
    assert_eq!(relative, vec![0.0, 0.5, 1.0]);
    let widths: f32 = layer.node_list().iter().map(|n| n.width).sum();
    assert_approx_eq!(f32, widths, TAU, epsilon = 1e-5);

    let Some(SceneMark::Arc(arc)) = scene.marks_named("histogram").next() else {
        panic!("expected an arc mark");
    };
    let scale = CanvasDimensions::default().scale;
    let heights: Vec<f32> = arc.sectors().map(|s| s.thickness() / scale).collect();
    assert_approx_eq!(f32, heights[0], 0.0);
    assert_approx_eq!(f32, heights[1], 1.0);
    assert_approx_eq!(f32, heights[2], 2.0);
}

#[test]
fn test_histogram_mean_reducer() {
    let layer = HistogramRing::new("node", "value")
        .with_reducer(Reducer::Mean)
        .with_options(no_labels())
        .draw(
            &histogram_batch(vec!["A", "A", "B", "C"], vec![0.0, 20.0, 0.0, 20.0]),
            &mut scene(),
            None,
        )
        .unwrap();
    let relative: Vec<f32> = layer.node_list().iter().map(|n| n.relative_value).collect();
    assert_eq!(relative, vec![0.5, 0.0, 1.0]);
}

#[test]
fn test_missing_values_default_to_zero() {
    let batch = RecordBatch::try_from_iter(vec![
        (
            "node",
            Arc::new(StringArray::from(vec!["A", "B", "C"])) as ArrayRef,
        ),
        (
            "value",
            Arc::new(Float64Array::from(vec![Some(5.0), None, Some(f64::NAN)])) as ArrayRef,
        ),
    ])
    .unwrap();
    let layer = HistogramRing::new("node", "value")
        .with_options(no_labels())
        .draw(&batch, &mut scene(), None)
        .unwrap();
    assert_eq!(layer.node_list().len(), 3);
    // A alone is degenerate and locked to 1, the others have no value
    let relative: Vec<f32> = layer.node_list().iter().map(|n| n.relative_value).collect();
    assert_eq!(relative, vec![1.0, 0.0, 0.0]);
}

#[rstest]
#[case(DegenerateRangePolicy::Max, 1.0)]
#[case(DegenerateRangePolicy::Min, 0.0)]
#[case(DegenerateRangePolicy::Midpoint, 0.5)]
fn test_equal_values_follow_policy(#[case] policy: DegenerateRangePolicy, #[case] expected: f32) {
    let layer = HistogramRing::new("node", "value")
        .with_options(no_labels().with_degenerate_range(policy))
        .draw(
            &histogram_batch(vec!["A", "B"], vec![7.0, 7.0]),
            &mut scene(),
            None,
        )
        .unwrap();
    for node in layer.node_list() {
        assert_approx_eq!(f32, node.relative_value, expected);
        assert!(!node.relative_value.is_nan());
    }
}

#[test]
fn test_equal_values_default_to_max() {
    let layer = HistogramRing::new("node", "value")
        .with_options(no_labels())
        .draw(
            &histogram_batch(vec!["A", "B"], vec![7.0, 7.0]),
            &mut scene(),
            None,
        )
        .unwrap();
    assert!(layer.node_list().iter().all(|n| n.relative_value == 1.0));
}

#[test]
fn test_channel_independence() {
    let batch = histogram_batch(vec!["A", "B", "C"], vec![10.0, 20.0, 30.0]);
    let mut surface = scene();
    let layer = HistogramRing::new("node", "value")
        .with_max_height(2.0)
        .with_channels([EncodingChannel::Color, EncodingChannel::Opacity])
        .with_options(no_labels())
        .draw(&batch, &mut surface, None)
        .unwrap();

    let Some(SceneMark::Arc(arc)) = surface.get_mark(0) else {
        panic!("expected an arc mark");
    };
    let scale = CanvasDimensions::default().scale;
    for sector in arc.sectors() {
        assert_approx_eq!(f32, sector.thickness() / scale, 2.0);
    }
    let opacities: Vec<f32> = layer.node_list().iter().map(|n| n.opacity).collect();
    assert_eq!(opacities, vec![0.0, 0.5, 1.0]);
    assert_ne!(layer.node_list()[0].color, NEUTRAL_COLOR);
}

#[test]
fn test_order_and_group() {
    let batch = RecordBatch::try_from_iter(vec![
        (
            "node",
            Arc::new(StringArray::from(vec!["a", "b", "c", "d"])) as ArrayRef,
        ),
        (
            "value",
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0])) as ArrayRef,
        ),
        ("rank", Arc::new(Int32Array::from(vec![4, 3, 2, 1])) as ArrayRef),
        (
            "team",
            Arc::new(StringArray::from(vec!["x", "y", "x", "y"])) as ArrayRef,
        ),
    ])
    .unwrap();

    let ordered = HistogramRing::new("node", "value")
        .with_options(no_labels().with_order_by("rank"))
        .draw(&batch, &mut scene(), None)
        .unwrap();
    let labels: Vec<&str> = ordered.node_list().iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["d", "c", "b", "a"]);

    let grouped = HistogramRing::new("node", "value")
        .with_options(no_labels().with_group_by("team"))
        .draw(&batch, &mut scene(), None)
        .unwrap();
    let groups: Vec<&str> = grouped
        .node_list()
        .iter()
        .filter_map(|n| n.group.as_deref())
        .collect();
    assert_eq!(groups, vec!["x", "x", "y", "y"]);
}

#[test]
fn test_heat_map_rows() {
    let batch = RecordBatch::try_from_iter(vec![
        ("node", Arc::new(StringArray::from(vec!["A", "A"])) as ArrayRef),
        (
            "month",
            Arc::new(StringArray::from(vec!["jan", "feb"])) as ArrayRef,
        ),
        ("value", Arc::new(Float64Array::from(vec![5.0, 15.0])) as ArrayRef),
    ])
    .unwrap();
    let mut surface = scene();
    let layer = HeatMapRing::new("node", "month", "value")
        .with_row_height(0.5)
        .with_options(no_labels().with_radius(3.0))
        .draw(&batch, &mut surface, None)
        .unwrap();

    assert_approx_eq!(f32, layer.extent(), 1.0);
    let jan = layer.cell("A", "jan").unwrap();
    let feb = layer.cell("A", "feb").unwrap();
    assert_approx_eq!(f32, jan.relative_value, 0.0);
    assert_approx_eq!(f32, feb.relative_value, 1.0);
    assert_approx_eq!(f32, jan.radius(), 3.0);
    assert_approx_eq!(f32, feb.radius(), 3.5);
    assert_eq!(layer.base_nodes().count(), 1);
    assert_eq!(surface.marks.len(), 1);
}

#[test]
fn test_head_layer_alignment_and_immutability() {
    let head_batch = histogram_batch(vec!["a", "b", "c"], vec![1.0, 2.0, 3.0]);
    let mut surface = scene();
    let head = HistogramRing::new("node", "value")
        .with_options(no_labels().with_radius(2.0))
        .draw(&head_batch, &mut surface, None)
        .unwrap();
    let snapshot = head.clone();

    let next_batch = RecordBatch::try_from_iter(vec![
        (
            "node",
            Arc::new(StringArray::from(vec!["c", "a", "z", "c"])) as ArrayRef,
        ),
        (
            "row",
            Arc::new(StringArray::from(vec!["r0", "r1", "r0", "r1"])) as ArrayRef,
        ),
        (
            "value",
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0])) as ArrayRef,
        ),
    ])
    .unwrap();
    let ring = HeatMapRing::new("node", "row", "value")
        .with_row_height(0.25)
        .with_options(no_labels().with_radius(4.0).with_order_by("value"));
    let layer = ring.draw(&next_batch, &mut surface, Some(&head)).unwrap();

    assert_eq!(head, snapshot);
    // Head order wins, z has no slot, b has no data
    let labels: Vec<&str> = layer.base_nodes().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["a", "b", "c"]);
    for node in layer.node_list() {
        let head_node = head.node(&node.label).unwrap();
        assert_approx_eq!(f32, node.angle(), head_node.angle());
    }
    assert_eq!(layer.node_list().len(), 6);
    assert_approx_eq!(f32, layer.cell("b", "r0").unwrap().relative_value, 0.0);
    assert_approx_eq!(f32, layer.node_width(), head.node_width());
}

#[test]
fn test_missing_column_fails_before_drawing() {
    let batch = histogram_batch(vec!["A"], vec![1.0]);
    let mut surface = CountingSurface::default();
    let err = HistogramRing::new("node", "count")
        .draw(&batch, &mut surface, None)
        .unwrap_err();
    assert!(matches!(
        err,
        RingplotError::ColumnNotFound(ref name, ref available)
            if name == "count" && available == "node, value"
    ));
    assert_eq!(surface.calls, 0);

    let err = HeatMapRing::new("node", "month", "value")
        .draw(&batch, &mut surface, None)
        .unwrap_err();
    assert!(matches!(err, RingplotError::ColumnNotFound(ref name, _) if name == "month"));
    assert_eq!(surface.calls, 0);
}

#[test]
fn test_non_numeric_value_column() {
    let batch = RecordBatch::try_from_iter(vec![
        ("node", Arc::new(StringArray::from(vec!["A"])) as ArrayRef),
        ("value", Arc::new(StringArray::from(vec!["high"])) as ArrayRef),
    ])
    .unwrap();
    let mut surface = CountingSurface::default();
    let err = HistogramRing::new("node", "value")
        .draw(&batch, &mut surface, None)
        .unwrap_err();
    assert!(matches!(err, RingplotError::NonNumericColumn { .. }));
    assert_eq!(surface.calls, 0);
}

#[test]
fn test_labels_are_placed_once_per_node() {
    let mut surface = scene();
    HistogramRing::new("node", "value")
        .draw(
            &histogram_batch(vec!["A", "B", "C"], vec![1.0, 2.0, 3.0]),
            &mut surface,
            None,
        )
        .unwrap();
    let Some(SceneMark::Text(text)) = surface.marks_named("histogram_labels").next() else {
        panic!("expected node labels");
    };
    assert_eq!(text.len, 3);
    assert!(surface.marks_named("histogram_group_labels").next().is_none());
}

#[test]
fn test_rings_stack_on_one_surface() {
    let batch = RecordBatch::try_from_iter(vec![
        (
            "node",
            Arc::new(StringArray::from(vec!["a", "b", "c"])) as ArrayRef,
        ),
        (
            "kind",
            Arc::new(StringArray::from(vec!["x", "x", "y"])) as ArrayRef,
        ),
        (
            "peer",
            Arc::new(StringArray::from(vec!["b", "c", "a"])) as ArrayRef,
        ),
        (
            "value",
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])) as ArrayRef,
        ),
    ])
    .unwrap();
    let mut surface = scene();
    let category = CategoryRing::new("node", "kind")
        .with_options(no_labels().with_radius(6.0))
        .draw(&batch, &mut surface, None)
        .unwrap();
    let line = LineRing::new("node", "value")
        .with_options(no_labels().with_radius(4.0))
        .draw(&batch, &mut surface, Some(&category))
        .unwrap();
    let links = ConnectionRing::new("node", "peer", "value")
        .with_options(no_labels().with_radius(3.0))
        .draw(&batch, &mut surface, Some(&line))
        .unwrap();

    assert_eq!(links.extent(), 0.0);
    assert_eq!(surface.marks.len(), 3);
    assert!(matches!(surface.marks[2], SceneMark::Path(_)));
    for (a, b) in category.node_list().iter().zip(links.node_list()) {
        assert_eq!(a.label, b.label);
        assert_approx_eq!(f32, a.angle(), b.angle());
    }
    serde_json::to_string(&surface).unwrap();
}

#[test]
fn test_restyle_through_node_patch() {
    let mut surface = scene();
    let layer = HistogramRing::new("node", "value")
        .with_options(no_labels())
        .draw(
            &histogram_batch(vec!["A", "B"], vec![1.0, 2.0]),
            &mut surface,
            None,
        )
        .unwrap();
    let patch = layer.node("B").unwrap().patch.unwrap();
    surface.restyle(patch, [1.0, 0.0, 0.0, 1.0], 1.0).unwrap();
    let Some(SceneMark::Arc(arc)) = surface.get_mark(patch.mark_index) else {
        panic!("expected an arc mark");
    };
    let fills: Vec<Rgba> = arc.sectors().map(|s| s.fill).collect();
    assert_eq!(fills, vec![NEUTRAL_COLOR, [1.0, 0.0, 0.0, 1.0]]);
}

#[test]
fn test_ring_from_json() {
    let ring: HistogramRing = serde_json::from_str(
        r#"{
            "node_column": "node",
            "value_column": "value",
            "channels": ["height", "color"],
            "colormap": "magma",
            "degenerate_range": "midpoint",
            "show_labels": false
        }"#,
    )
    .unwrap();
    let layer = ring
        .draw(
            &histogram_batch(vec!["A", "B"], vec![3.0, 3.0]),
            &mut scene(),
            None,
        )
        .unwrap();
    assert!(layer.node_list().iter().all(|n| n.relative_value == 0.5));

    let err = serde_json::from_str::<HistogramRing>(r#"{"channels": ["size"]}"#);
    assert!(err.is_err());
}

#[test]
fn test_overflowing_sum_never_yields_nan() {
    let mut surface = scene();
    let layer = HistogramRing::new("node", "value")
        .with_options(no_labels())
        .draw(
            &histogram_batch(vec!["A", "A", "B"], vec![f64::MAX, f64::MAX, 1.0]),
            &mut surface,
            None,
        )
        .unwrap();
    for node in layer.node_list() {
        assert!(node.relative_value.is_finite());
        assert!((0.0..=1.0).contains(&node.relative_value));
    }
    assert_approx_eq!(f32, layer.node("A").unwrap().relative_value, 0.0);
    assert_approx_eq!(f32, layer.node("B").unwrap().relative_value, 1.0);
    let Some(SceneMark::Arc(arc)) = surface.marks_named("histogram").next() else {
        panic!("expected an arc mark");
    };
    assert!(arc.sectors().all(|s| s.thickness().is_finite()));
}

#[test]
fn test_heat_map_without_rows_is_empty() {
    let batch = RecordBatch::try_from_iter(vec![
        ("node", Arc::new(StringArray::from(vec!["A", "B"])) as ArrayRef),
        (
            "month",
            Arc::new(StringArray::from(vec![None::<&str>, None])) as ArrayRef,
        ),
        ("value", Arc::new(Float64Array::from(vec![1.0, 2.0])) as ArrayRef),
    ])
    .unwrap();
    let layer = HeatMapRing::new("node", "month", "value")
        .draw(&batch, &mut scene(), None)
        .unwrap();
    assert!(layer.node_list().is_empty());
    assert_eq!(layer.node_width(), 0.0);

    let head = HistogramRing::new("node", "value")
        .with_options(no_labels())
        .draw(&batch, &mut scene(), None)
        .unwrap();
    let layer = HeatMapRing::new("node", "month", "value")
        .with_options(no_labels().with_radius(3.0))
        .draw(&batch, &mut scene(), Some(&head))
        .unwrap();
    assert!(layer.node_list().is_empty());
    assert_eq!(layer.node_width(), 0.0);
}

#[test]
fn test_grouped_ring_draws_brackets_and_group_labels() {
    let batch = RecordBatch::try_from_iter(vec![
        (
            "node",
            Arc::new(StringArray::from(vec!["a", "b", "c"])) as ArrayRef,
        ),
        (
            "team",
            Arc::new(StringArray::from(vec!["x", "y", "x"])) as ArrayRef,
        ),
        (
            "value",
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])) as ArrayRef,
        ),
    ])
    .unwrap();
    let mut surface = scene();
    HistogramRing::new("node", "value")
        .with_options(RingOptions::default().with_group_by("team"))
        .draw(&batch, &mut surface, None)
        .unwrap();

    let Some(SceneMark::Arc(brackets)) = surface.marks_named("histogram_group_brackets").next()
    else {
        panic!("expected group brackets");
    };
    assert_eq!(brackets.len, 2);
    let Some(SceneMark::Text(groups)) = surface.marks_named("histogram_group_labels").next()
    else {
        panic!("expected group labels");
    };
    assert_eq!(groups.text, vec!["x".to_string(), "y".to_string()]);
}
