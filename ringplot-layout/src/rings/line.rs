use arrow::record_batch::RecordBatch;
use ringplot_common::types::Rgba;
use ringplot_scenegraph::surface::{DrawingSurface, Polyline};
use serde::{Deserialize, Serialize};

use crate::aggregate::{GroupKey, Reducer, ValueAggregator};
use crate::config::{ensure_non_negative, RingOptions};
use crate::encode::{AttributeEncoder, ChannelSet, EncodingChannel};
use crate::error::RingplotError;
use crate::layer::CircLayer;
use crate::node::PolarPosition;
use crate::normalize::RangeNormalizer;

use super::{layout_labels, layout_nodes, Ring};

/// Closed line through every node at `radius + height`, the height encoding
/// the node's aggregated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LineRing {
    pub node_column: String,
    pub value_column: String,
    pub max_height: f32,
    pub reducer: Reducer,
    pub channels: ChannelSet,
    pub stroke: Rgba,
    pub stroke_width: f32,
    #[serde(flatten)]
    pub options: RingOptions,
}

impl Default for LineRing {
    fn default() -> Self {
        Self {
            node_column: "node".to_string(),
            value_column: "value".to_string(),
            max_height: 1.0,
            reducer: Reducer::Sum,
            channels: ChannelSet::from([EncodingChannel::Height]),
            stroke: [0.0, 0.0, 0.0, 1.0],
            stroke_width: 1.0,
            options: RingOptions::default(),
        }
    }
}

impl LineRing {
    pub fn new(node_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            node_column: node_column.into(),
            value_column: value_column.into(),
            ..Default::default()
        }
    }

    pub fn with_max_height(mut self, max_height: f32) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_stroke(mut self, stroke: Rgba, stroke_width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = stroke_width;
        self
    }

    pub fn with_options(mut self, options: RingOptions) -> Self {
        self.options = options;
        self
    }
}

impl Ring for LineRing {
    fn kind(&self) -> &'static str {
        "line"
    }

    #[tracing::instrument(
        skip_all,
        fields(ring = self.kind(), node = %self.node_column, value = %self.value_column)
    )]
    fn draw(
        &self,
        data: &RecordBatch,
        surface: &mut dyn DrawingSurface,
        head_layer: Option<&CircLayer>,
    ) -> Result<CircLayer, RingplotError> {
        self.channels
            .ensure_within(ChannelSet::from([EncodingChannel::Height]), "line")?;
        self.options.validate()?;
        ensure_non_negative("max height", self.max_height)?;
        ensure_non_negative("stroke width", self.stroke_width)?;

        let mut layout = layout_nodes(data, &self.node_column, &self.options, None, head_layer)?;
        let aggregation =
            ValueAggregator::aggregate(data, &self.node_column, None, &self.value_column, self.reducer)?;
        let relative = RangeNormalizer::new(self.options.degenerate_range).normalize(&aggregation);

        let colormap = self.options.colormap();
        let encoder = AttributeEncoder::new(self.channels, self.max_height, &colormap)
            .with_default_color(self.stroke);

        let points: Vec<PolarPosition> = layout
            .nodes
            .iter_mut()
            .map(|node| {
                node.relative_value = relative.get(&GroupKey::node(node.label.as_str()));
                let height = encoder.encode(node);
                PolarPosition::new(node.angle(), node.radius() + height)
            })
            .collect();
        let labels = layout_labels(&self.options, self.max_height, &layout.nodes, layout.node_width);

        let name = self.options.layer_name(self.kind());
        if points.len() < 2 {
            tracing::debug!(points = points.len(), "too few nodes for a line");
        } else {
            let patch = surface.draw_polyline(
                name,
                &Polyline {
                    points,
                    closed: true,
                    stroke: self.stroke,
                    stroke_width: self.stroke_width,
                },
            )?;
            for node in layout.nodes.iter_mut() {
                node.patch = Some(patch);
            }
        }
        if let Some(labels) = &labels {
            labels.draw(name, surface)?;
        }

        Ok(CircLayer::new(
            name,
            self.options.radius,
            self.max_height,
            layout.nodes,
            layout.node_width,
        ))
    }
}
