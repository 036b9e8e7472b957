use arrow::record_batch::RecordBatch;
use indexmap::IndexSet;
use ringplot_scenegraph::surface::{DrawingSurface, Wedge};
use serde::{Deserialize, Serialize};

use crate::aggregate::{GroupKey, Reducer, ValueAggregator};
use crate::config::{ensure_non_negative, RingOptions};
use crate::encode::{AttributeEncoder, ChannelSet, EncodingChannel};
use crate::error::RingplotError;
use crate::layer::CircLayer;
use crate::normalize::RangeNormalizer;

use super::{layout_labels, layout_nodes, paint_wedges, Ring};

/// Concentric rows of cells, one row per distinct sub-row value, each cell
/// colored by the value aggregated for its node and row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HeatMapRing {
    pub node_column: String,
    pub sublayer_column: String,
    pub value_column: String,
    pub row_height: f32,
    pub channels: ChannelSet,
    #[serde(flatten)]
    pub options: RingOptions,
}

impl Default for HeatMapRing {
    fn default() -> Self {
        Self {
            node_column: "node".to_string(),
            sublayer_column: "sublayer".to_string(),
            value_column: "value".to_string(),
            row_height: 0.5,
            channels: ChannelSet::from([EncodingChannel::Color]),
            options: RingOptions::default(),
        }
    }
}

impl HeatMapRing {
    pub fn new(
        node_column: impl Into<String>,
        sublayer_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            node_column: node_column.into(),
            sublayer_column: sublayer_column.into(),
            value_column: value_column.into(),
            ..Default::default()
        }
    }

    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
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

    fn supported_channels() -> ChannelSet {
        ChannelSet::from([EncodingChannel::Color, EncodingChannel::Opacity])
    }
}

impl Ring for HeatMapRing {
    fn kind(&self) -> &'static str {
        "heat_map"
    }

    #[tracing::instrument(
        skip_all,
        fields(ring = self.kind(), node = %self.node_column, sublayer = %self.sublayer_column)
    )]
    fn draw(
        &self,
        data: &RecordBatch,
        surface: &mut dyn DrawingSurface,
        head_layer: Option<&CircLayer>,
    ) -> Result<CircLayer, RingplotError> {
        self.channels
            .ensure_within(Self::supported_channels(), "heat map")?;
        self.options.validate()?;
        ensure_non_negative("row height", self.row_height)?;

        let mut layout = layout_nodes(
            data,
            &self.node_column,
            &self.options,
            Some((self.sublayer_column.as_str(), self.row_height)),
            head_layer,
        )?;
        let aggregation = ValueAggregator::aggregate(
            data,
            &self.node_column,
            Some(&self.sublayer_column),
            &self.value_column,
            Reducer::Sum,
        )?;
        let relative = RangeNormalizer::new(self.options.degenerate_range).normalize(&aggregation);

        let colormap = self.options.colormap();
        let encoder = AttributeEncoder::new(self.channels, self.row_height, &colormap)
            .with_default_color(self.options.default_color);

        let mut cells = Vec::with_capacity(layout.nodes.len());
        for (i, node) in layout.nodes.iter_mut().enumerate() {
            let key = GroupKey::cell(node.label.as_str(), node.sublayer.clone());
            node.relative_value = relative.get(&key);
            let height = encoder.encode(node);
            cells.push((
                i,
                Wedge {
                    angle: node.angle(),
                    width: node.width,
                    inner_radius: node.radius(),
                    height,
                    fill: node.color,
                    opacity: node.opacity,
                    stroke: Some(node.color),
                },
            ));
        }

        let rows: IndexSet<&str> = layout
            .nodes
            .iter()
            .filter_map(|n| n.sublayer.as_deref())
            .collect();
        let extent = rows.len() as f32 * self.row_height;
        let labels = layout_labels(&self.options, extent, &layout.nodes, layout.node_width);

        let name = self.options.layer_name(self.kind());
        paint_wedges(surface, name, &mut layout.nodes, cells, labels.as_ref())?;
        Ok(CircLayer::new(
            name,
            self.options.radius,
            extent,
            layout.nodes,
            layout.node_width,
        ))
    }
}
