//! Ring types and the pipeline they share.
//!
//! Every ring lays out its nodes (a fresh partition, or the head layer's
//! slots), aggregates and normalizes its values, encodes them, lays out its
//! labels, and only then paints on the surface.

pub mod category;
pub mod connection;
pub mod heatmap;
pub mod histogram;
pub mod line;

use arrow::record_batch::RecordBatch;
use ringplot_scenegraph::surface::{DrawingSurface, PatchHandle, Wedge};

use crate::config::RingOptions;
use crate::error::RingplotError;
use crate::extend::{ExtendOptions, LayerExtender};
use crate::labels::{LabelPlacer, PlacedLabels};
use crate::layer::CircLayer;
use crate::node::Node;
use crate::partition::{NodePartitioner, PartitionOptions};

pub use category::CategoryRing;
pub use connection::{ChordLink, ConnectionRing};
pub use heatmap::HeatMapRing;
pub use histogram::HistogramRing;
pub use line::LineRing;

pub trait Ring {
    /// Default layer name of the ring type
    fn kind(&self) -> &'static str;

    /// Lay out and paint the ring.
    ///
    /// With a head layer the ring reuses its angular slots, otherwise the
    /// circle is partitioned from `data`. Nothing is drawn unless the whole
    /// ring could be computed.
    fn draw(
        &self,
        data: &RecordBatch,
        surface: &mut dyn DrawingSurface,
        head_layer: Option<&CircLayer>,
    ) -> Result<CircLayer, RingplotError>;
}

/// Nodes of a ring plus their slot width
pub(crate) struct NodeLayout {
    pub nodes: Vec<Node>,
    pub node_width: f32,
}

/// Sub-row column and the radial step between rows
pub(crate) type Sublayers<'a> = Option<(&'a str, f32)>;

pub(crate) fn layout_nodes(
    data: &RecordBatch,
    node_column: &str,
    options: &RingOptions,
    sublayers: Sublayers,
    head_layer: Option<&CircLayer>,
) -> Result<NodeLayout, RingplotError> {
    match head_layer {
        Some(head) => {
            warn_ignored_ordering(options, head);
            let mut extend = ExtendOptions::new(node_column, options.radius);
            if let Some((column, increment)) = sublayers {
                extend = extend.with_sublayers(column, increment);
            }
            let nodes = LayerExtender::extend(head.node_list(), data, &extend)?;
            let node_width = if nodes.is_empty() { 0.0 } else { head.node_width() };
            Ok(NodeLayout { nodes, node_width })
        }
        None => {
            let mut partition = PartitionOptions::new(node_column, options.radius);
            if let Some(order_by) = &options.order_by {
                partition = partition.with_order_by(order_by);
            }
            if let Some(group_by) = &options.group_by {
                partition = partition.with_group_by(group_by);
            }
            if let Some((column, increment)) = sublayers {
                partition = partition.with_sublayers(column, increment);
            }
            let partition = NodePartitioner::build(data, &partition)?;
            Ok(NodeLayout {
                nodes: partition.nodes,
                node_width: partition.node_width,
            })
        }
    }
}

pub(crate) fn warn_ignored_ordering(options: &RingOptions, head: &CircLayer) {
    if options.order_by.is_some() || options.group_by.is_some() {
        tracing::warn!(
            head = head.name(),
            order_by = ?options.order_by,
            group_by = ?options.group_by,
            "drawing on a head layer, ordering and grouping options are ignored"
        );
    }
}

/// Labels for the ring, or nothing when labels are switched off
pub(crate) fn layout_labels(
    options: &RingOptions,
    extent: f32,
    nodes: &[Node],
    node_width: f32,
) -> Option<PlacedLabels> {
    options.show_labels.then(|| {
        LabelPlacer::new(options.labels.clone()).layout(options.radius, extent, nodes, node_width)
    })
}

/// Paint one wedge per drawn node and the ring's labels, recording each
/// node's patch. `drawn` pairs node indices with their wedges.
pub(crate) fn paint_wedges(
    surface: &mut dyn DrawingSurface,
    name: &str,
    nodes: &mut [Node],
    drawn: Vec<(usize, Wedge)>,
    labels: Option<&PlacedLabels>,
) -> Result<(), RingplotError> {
    let (indices, wedges): (Vec<usize>, Vec<Wedge>) = drawn.into_iter().unzip();
    let patches = surface.draw_wedges(name, &wedges)?;
    assign_patches(nodes, &indices, patches);
    if let Some(labels) = labels {
        labels.draw(name, surface)?;
    }
    Ok(())
}

fn assign_patches(nodes: &mut [Node], indices: &[usize], patches: Vec<PatchHandle>) {
    for (index, patch) in indices.iter().zip(patches) {
        if let Some(node) = nodes.get_mut(*index) {
            node.patch = Some(patch);
        }
    }
}
