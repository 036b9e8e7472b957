use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use ringplot_scenegraph::surface::{Chord, DrawingSurface, PatchHandle};
use serde::{Deserialize, Serialize};

use crate::aggregate::{GroupKey, Reducer, ValueAggregator};
use crate::config::RingOptions;
use crate::encode::{AttributeEncoder, ChannelSet, EncodingChannel};
use crate::error::RingplotError;
use crate::extend::{ExtendOptions, LayerExtender};
use crate::layer::CircLayer;
use crate::node::Node;
use crate::normalize::RangeNormalizer;
use crate::partition::{NodePartitioner, PartitionOptions};
use crate::table::Table;

use super::{layout_labels, warn_ignored_ordering, Ring};

/// Chords between nodes, one per connected pair, weighted by the summed
/// value of the pair's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConnectionRing {
    pub source_column: String,
    pub target_column: String,
    pub value_column: String,
    /// Keep `(a, b)` and `(b, a)` apart and draw chords narrowing towards
    /// their target
    pub causality: bool,
    pub channels: ChannelSet,
    #[serde(flatten)]
    pub options: RingOptions,
}

impl Default for ConnectionRing {
    fn default() -> Self {
        Self {
            source_column: "source".to_string(),
            target_column: "target".to_string(),
            value_column: "value".to_string(),
            causality: false,
            channels: ChannelSet::from([EncodingChannel::Color]),
            options: RingOptions::default(),
        }
    }
}

/// One drawn connection
#[derive(Debug, Clone, PartialEq)]
pub struct ChordLink {
    pub source: String,
    pub target: String,
    pub relative_value: f32,
    pub chord: Chord,
    pub patch: Option<PatchHandle>,
}

/// Nodes and chords of a connection ring, before drawing
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionLayout {
    pub nodes: Vec<Node>,
    pub node_width: f32,
    pub links: Vec<ChordLink>,
}

impl ConnectionRing {
    pub fn new(
        source_column: impl Into<String>,
        target_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
            value_column: value_column.into(),
            ..Default::default()
        }
    }

    pub fn with_causality(mut self, causality: bool) -> Self {
        self.causality = causality;
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

    fn validate(&self) -> Result<(), RingplotError> {
        self.channels
            .ensure_within(Self::supported_channels(), "connection")?;
        self.options.validate()
    }

    /// Nodes over the union of sources and targets, interleaved in row
    /// order so each row contributes its source then its target.
    fn partition(&self, table: &Table, data: &RecordBatch) -> Result<(Vec<Node>, f32), RingplotError> {
        let mut options = PartitionOptions::new(&self.source_column, self.options.radius);
        if let Some(order_by) = &self.options.order_by {
            options = options.with_order_by(order_by);
        }
        if let Some(group_by) = &self.options.group_by {
            options = options.with_group_by(group_by);
        }
        table.require(
            self.options
                .order_by
                .as_deref()
                .into_iter()
                .chain(self.options.group_by.as_deref()),
        )?;

        let rows = table.row_order(self.options.order_by.as_deref())?;
        let sources = table.labels(&self.source_column)?;
        let targets = table.labels(&self.target_column)?;
        let groups = match &self.options.group_by {
            Some(group_by) => Some(table.labels(group_by)?),
            None => None,
        };

        // The row's group describes its source
        let mut entries = Vec::with_capacity(rows.len() * 2);
        for row in rows {
            if let Some(source) = &sources[row] {
                let group = groups.as_ref().and_then(|g| g[row].clone());
                entries.push((source.clone(), group));
            }
            if let Some(target) = &targets[row] {
                entries.push((target.clone(), None));
            }
        }
        tracing::trace!(rows = data.num_rows(), entries = entries.len(), "connection entries");
        let partition = NodePartitioner::from_entries(entries, &options, None);
        Ok((partition.nodes, partition.node_width))
    }

    /// Lay out nodes and chords without touching a surface.
    pub fn layout_chords(
        &self,
        data: &RecordBatch,
        head_layer: Option<&CircLayer>,
    ) -> Result<ConnectionLayout, RingplotError> {
        self.validate()?;
        let table = Table::new(data);
        table.require([self.source_column.as_str(), self.target_column.as_str()])?;

        let (nodes, node_width) = match head_layer {
            Some(head) => {
                warn_ignored_ordering(&self.options, head);
                let extend = ExtendOptions::new(&self.source_column, self.options.radius);
                (
                    LayerExtender::extend(head.node_list(), data, &extend)?,
                    head.node_width(),
                )
            }
            None => self.partition(&table, data)?,
        };

        let index: IndexMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.label.as_str(), i))
            .collect();

        let aggregation = ValueAggregator::aggregate(
            data,
            &self.source_column,
            Some(&self.target_column),
            &self.value_column,
            Reducer::Sum,
        )?;
        let total = aggregation.len();
        let aggregation = aggregation.filter(|key| match &key.secondary {
            Some(target) => {
                key.primary != *target
                    && index.contains_key(key.primary.as_str())
                    && index.contains_key(target.as_str())
            }
            None => false,
        });
        if aggregation.len() < total {
            tracing::debug!(
                dropped = total - aggregation.len(),
                "skipped self connections and connections outside the partition"
            );
        }

        let aggregation = if self.causality {
            aggregation
        } else {
            aggregation.merge_keys(|key| {
                let target = key.secondary.clone().unwrap_or_default();
                let source_index = index.get(key.primary.as_str()).copied().unwrap_or(0);
                let target_index = index.get(target.as_str()).copied().unwrap_or(0);
                if target_index < source_index {
                    GroupKey::pair(target, key.primary)
                } else {
                    key
                }
            })
        };
        let relative = RangeNormalizer::new(self.options.degenerate_range).normalize(&aggregation);

        // Each node's arc is shared evenly by the chords ending on it
        let mut degree = vec![0usize; nodes.len()];
        let pairs: Vec<(usize, usize, f32)> = relative
            .iter()
            .filter_map(|(key, value)| {
                let source = *index.get(key.primary.as_str())?;
                let target = *index.get(key.secondary.as_deref()?)?;
                Some((source, target, value))
            })
            .collect();
        for (source, target, _) in &pairs {
            degree[*source] += 1;
            degree[*target] += 1;
        }

        let colormap = self.options.colormap();
        let encoder = AttributeEncoder::new(self.channels, 0.0, &colormap)
            .with_default_color(self.options.default_color);

        let mut used = vec![0usize; nodes.len()];
        let mut slot = |i: usize| {
            let node = &nodes[i];
            let width = node.width / degree[i].max(1) as f32;
            let angle = node.angle() - node.width / 2.0 + (used[i] as f32 + 0.5) * width;
            used[i] += 1;
            (angle, width)
        };

        let links = pairs
            .iter()
            .map(|(source, target, value)| {
                let (source_angle, source_width) = slot(*source);
                let (target_angle, target_width) = slot(*target);
                ChordLink {
                    source: nodes[*source].label.clone(),
                    target: nodes[*target].label.clone(),
                    relative_value: *value,
                    chord: Chord {
                        source_angle,
                        source_width,
                        target_angle,
                        target_width,
                        radius: self.options.radius,
                        fill: encoder.color(*value),
                        opacity: encoder.opacity(*value),
                        directed: self.causality,
                    },
                    patch: None,
                }
            })
            .collect();

        Ok(ConnectionLayout {
            nodes,
            node_width,
            links,
        })
    }
}

impl Ring for ConnectionRing {
    fn kind(&self) -> &'static str {
        "connection"
    }

    #[tracing::instrument(
        skip_all,
        fields(ring = self.kind(), source = %self.source_column, target = %self.target_column)
    )]
    fn draw(
        &self,
        data: &RecordBatch,
        surface: &mut dyn DrawingSurface,
        head_layer: Option<&CircLayer>,
    ) -> Result<CircLayer, RingplotError> {
        let mut layout = self.layout_chords(data, head_layer)?;
        let labels = layout_labels(&self.options, 0.0, &layout.nodes, layout.node_width);

        let name = self.options.layer_name(self.kind());
        let chords: Vec<Chord> = layout.links.iter().map(|l| l.chord.clone()).collect();
        let patches = surface.draw_chords(name, &chords)?;
        for (link, patch) in layout.links.iter_mut().zip(patches) {
            link.patch = Some(patch);
        }
        if let Some(labels) = &labels {
            labels.draw(name, surface)?;
        }
        tracing::debug!(chords = layout.links.len(), "drew connections");

        Ok(CircLayer::new(
            name,
            self.options.radius,
            0.0,
            layout.nodes,
            layout.node_width,
        ))
    }
}
