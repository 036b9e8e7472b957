use arrow::record_batch::RecordBatch;
use indexmap::{IndexMap, IndexSet};
use ringplot_common::types::Rgba;
use ringplot_scales::color::categorical::CategoricalPalette;
use ringplot_scales::color::parse_css_color;
use ringplot_scenegraph::surface::{DrawingSurface, Wedge};
use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, RingOptions};
use crate::encode::ChannelSet;
use crate::error::RingplotError;
use crate::extend::{ExtendOptions, LayerExtender};
use crate::layer::CircLayer;
use crate::partition::{NodePartitioner, PartitionOptions};
use crate::table::Table;

use super::{layout_labels, paint_wedges, warn_ignored_ordering, NodeLayout, Ring};

/// Band of wedges colored by the category each node belongs to.
///
/// A fresh partition keeps every category's nodes contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CategoryRing {
    pub node_column: String,
    pub category_column: String,
    pub height: f32,
    /// CSS colors, matched by position to the category order
    pub group_colors: Option<Vec<String>>,
    /// Categories listed first, in this order. Others follow in order of
    /// first appearance.
    pub group_order: Option<Vec<String>>,
    /// Only the empty set is accepted
    pub channels: ChannelSet,
    #[serde(flatten)]
    pub options: RingOptions,
}

impl Default for CategoryRing {
    fn default() -> Self {
        Self {
            node_column: "node".to_string(),
            category_column: "category".to_string(),
            height: 0.5,
            group_colors: None,
            group_order: None,
            channels: ChannelSet::empty(),
            options: RingOptions::default(),
        }
    }
}

impl CategoryRing {
    pub fn new(node_column: impl Into<String>, category_column: impl Into<String>) -> Self {
        Self {
            node_column: node_column.into(),
            category_column: category_column.into(),
            ..Default::default()
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_group_colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.group_colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_group_order<S: Into<String>>(mut self, order: impl IntoIterator<Item = S>) -> Self {
        self.group_order = Some(order.into_iter().map(Into::into).collect());
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

    fn parsed_colors(&self) -> Result<Vec<Rgba>, RingplotError> {
        self.group_colors
            .iter()
            .flatten()
            .map(|c| parse_css_color(c).map_err(RingplotError::from))
            .collect()
    }

    fn layout(
        &self,
        data: &RecordBatch,
        head_layer: Option<&CircLayer>,
    ) -> Result<NodeLayout, RingplotError> {
        match head_layer {
            Some(head) => {
                warn_ignored_ordering(&self.options, head);
                let extend = ExtendOptions::new(&self.node_column, self.options.radius);
                Ok(NodeLayout {
                    nodes: LayerExtender::extend(head.node_list(), data, &extend)?,
                    node_width: head.node_width(),
                })
            }
            None => {
                let mut partition = PartitionOptions::new(&self.node_column, self.options.radius)
                    .with_group_by(&self.category_column);
                if let Some(order_by) = &self.options.order_by {
                    partition = partition.with_order_by(order_by);
                }
                if let Some(order) = &self.group_order {
                    partition = partition.with_group_order(order.clone());
                }
                if self.options.group_by.is_some() {
                    tracing::warn!("category rings group by their category column, group_by is ignored");
                }
                let partition = NodePartitioner::build(data, &partition)?;
                Ok(NodeLayout {
                    nodes: partition.nodes,
                    node_width: partition.node_width,
                })
            }
        }
    }

    /// Color per category: explicit order first, then first appearance
    fn category_colors(
        &self,
        categories: &IndexMap<String, String>,
        explicit: &[Rgba],
    ) -> IndexMap<String, Rgba> {
        let appearance: IndexSet<&String> = categories.values().collect();
        let mut order: IndexSet<&String> = IndexSet::new();
        if let Some(group_order) = &self.group_order {
            order.extend(group_order.iter().filter(|g| appearance.contains(g)));
        }
        order.extend(appearance.iter().copied());

        let palette = CategoricalPalette::default();
        order
            .into_iter()
            .enumerate()
            .map(|(i, category)| {
                let color = explicit.get(i).copied().unwrap_or_else(|| palette.color(i));
                (category.clone(), color)
            })
            .collect()
    }
}

impl Ring for CategoryRing {
    fn kind(&self) -> &'static str {
        "category"
    }

    #[tracing::instrument(
        skip_all,
        fields(ring = self.kind(), node = %self.node_column, category = %self.category_column)
    )]
    fn draw(
        &self,
        data: &RecordBatch,
        surface: &mut dyn DrawingSurface,
        head_layer: Option<&CircLayer>,
    ) -> Result<CircLayer, RingplotError> {
        self.channels.ensure_within(ChannelSet::empty(), "category")?;
        self.options.validate()?;
        ensure_non_negative("height", self.height)?;
        let explicit = self.parsed_colors()?;

        let table = Table::new(data);
        table.require([self.node_column.as_str(), self.category_column.as_str()])?;
        let mut layout = self.layout(data, head_layer)?;

        // First category seen for each node
        let rows = table.row_order(self.options.order_by.as_deref())?;
        let labels = table.labels(&self.node_column)?;
        let values = table.labels(&self.category_column)?;
        let mut categories: IndexMap<String, String> = IndexMap::new();
        for row in rows {
            if let (Some(label), Some(category)) = (&labels[row], &values[row]) {
                categories
                    .entry(label.clone())
                    .or_insert_with(|| category.clone());
            }
        }
        let colors = self.category_colors(&categories, &explicit);

        let mut wedges = Vec::with_capacity(layout.nodes.len());
        for (i, node) in layout.nodes.iter_mut().enumerate() {
            let Some(category) = categories.get(&node.label) else {
                node.group = None;
                continue;
            };
            node.group = Some(category.clone());
            node.relative_value = 1.0;
            if let Some(color) = colors.get(category) {
                node.color = *color;
            }
            wedges.push((
                i,
                Wedge {
                    angle: node.angle(),
                    width: node.width,
                    inner_radius: node.radius(),
                    height: self.height,
                    fill: node.color,
                    opacity: node.opacity,
                    stroke: None,
                },
            ));
        }
        let labels = layout_labels(&self.options, self.height, &layout.nodes, layout.node_width);

        let name = self.options.layer_name(self.kind());
        paint_wedges(surface, name, &mut layout.nodes, wedges, labels.as_ref())?;
        Ok(CircLayer::new(
            name,
            self.options.radius,
            self.height,
            layout.nodes,
            layout.node_width,
        ))
    }
}
