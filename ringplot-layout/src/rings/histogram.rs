use arrow::record_batch::RecordBatch;
use ringplot_scenegraph::surface::{DrawingSurface, Wedge};
use serde::{Deserialize, Serialize};

use crate::aggregate::{GroupKey, Reducer, ValueAggregator};
use crate::config::{ensure_non_negative, RingOptions};
use crate::encode::{AttributeEncoder, ChannelSet, EncodingChannel};
use crate::error::RingplotError;
use crate::layer::CircLayer;
use crate::normalize::RangeNormalizer;

use super::{layout_labels, layout_nodes, paint_wedges, Ring};

/// One bar per node whose height, color and opacity encode the node's
/// aggregated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HistogramRing {
    pub node_column: String,
    pub value_column: String,
    /// Bar height at relative value 1, also the ring's extent
    pub max_height: f32,
    pub reducer: Reducer,
    pub channels: ChannelSet,
    #[serde(flatten)]
    pub options: RingOptions,
}

impl Default for HistogramRing {
    fn default() -> Self {
        Self {
            node_column: "node".to_string(),
            value_column: "value".to_string(),
            max_height: 1.0,
            reducer: Reducer::Sum,
            channels: ChannelSet::from([EncodingChannel::Height]),
            options: RingOptions::default(),
        }
    }
}

impl HistogramRing {
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

    pub fn with_channels(mut self, channels: impl Into<ChannelSet>) -> Self {
        self.channels = channels.into();
        self
    }

    pub fn with_options(mut self, options: RingOptions) -> Self {
        self.options = options;
        self
    }
}

impl Ring for HistogramRing {
    fn kind(&self) -> &'static str {
        "histogram"
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
        self.options.validate()?;
        ensure_non_negative("max height", self.max_height)?;

        let mut layout = layout_nodes(data, &self.node_column, &self.options, None, head_layer)?;
        let aggregation =
            ValueAggregator::aggregate(data, &self.node_column, None, &self.value_column, self.reducer)?;
        let relative = RangeNormalizer::new(self.options.degenerate_range).normalize(&aggregation);

        let colormap = self.options.colormap();
        let encoder = AttributeEncoder::new(self.channels, self.max_height, &colormap)
            .with_default_color(self.options.default_color);

        let mut wedges = Vec::with_capacity(layout.nodes.len());
        for (i, node) in layout.nodes.iter_mut().enumerate() {
            node.relative_value = relative.get(&GroupKey::node(node.label.as_str()));
            let height = encoder.encode(node);
            wedges.push((
                i,
                Wedge {
                    angle: node.angle(),
                    width: node.width,
                    inner_radius: node.radius(),
                    height,
                    fill: node.color,
                    opacity: node.opacity,
                    stroke: None,
                },
            ));
        }
        let labels = layout_labels(&self.options, self.max_height, &layout.nodes, layout.node_width);

        let name = self.options.layer_name(self.kind());
        paint_wedges(surface, name, &mut layout.nodes, wedges, labels.as_ref())?;
        Ok(CircLayer::new(
            name,
            self.options.radius,
            self.max_height,
            layout.nodes,
            layout.node_width,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use ringplot_common::canvas::CanvasDimensions;
    use ringplot_scenegraph::scene_graph::SceneGraph;

    #[test]
    fn test_json_config_defaults() {
        let ring: HistogramRing = serde_json::from_str(
            r#"{"node_column": "who", "value_column": "n", "radius": 3.0, "reducer": "mean"}"#,
        )
        .unwrap();
        assert_eq!(ring.node_column, "who");
        assert_eq!(ring.reducer, Reducer::Mean);
        assert_approx_eq!(f32, ring.options.radius, 3.0);
        assert!(ring.channels.contains(EncodingChannel::Height));
        assert_approx_eq!(f32, ring.max_height, 1.0);
    }

    #[test]
    fn test_negative_height_fails_before_drawing() {
        let batch = RecordBatch::new_empty(std::sync::Arc::new(arrow::datatypes::Schema::empty()));
        let mut scene = SceneGraph::new(CanvasDimensions::default());
        let err = HistogramRing::new("node", "value")
            .with_max_height(-1.0)
            .draw(&batch, &mut scene, None)
            .unwrap_err();
        assert!(matches!(err, RingplotError::InvalidConfig(_)));
        assert!(scene.marks.is_empty());
    }
}
