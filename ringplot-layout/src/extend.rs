//! Additional rings on a head layer's angular partition.

use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;

use crate::error::RingplotError;
use crate::node::Node;
use crate::partition::distinct_in_order;
use crate::table::Table;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendOptions {
    pub node_column: String,
    pub radius: f32,
    pub sublayer_column: Option<String>,
    pub radius_increment: f32,
}

impl ExtendOptions {
    pub fn new(node_column: impl Into<String>, radius: f32) -> Self {
        Self {
            node_column: node_column.into(),
            radius,
            ..Default::default()
        }
    }

    pub fn with_sublayers(mut self, column: impl Into<String>, radius_increment: f32) -> Self {
        self.sublayer_column = Some(column.into());
        self.radius_increment = radius_increment;
        self
    }
}

pub struct LayerExtender;

impl LayerExtender {
    /// Re-derive the head layer's nodes at a new radius.
    ///
    /// Every distinct head label keeps its angle and width. Labels only found
    /// in `data` have no slot and are dropped.
    pub fn extend(
        head_nodes: &[Node],
        data: &RecordBatch,
        options: &ExtendOptions,
    ) -> Result<Vec<Node>, RingplotError> {
        let table = Table::new(data);
        table.require(
            std::iter::once(options.node_column.as_str())
                .chain(options.sublayer_column.as_deref()),
        )?;

        let mut slots: IndexMap<&str, &Node> = IndexMap::new();
        for node in head_nodes {
            slots.entry(node.label.as_str()).or_insert(node);
        }

        let data_labels = distinct_in_order(table.labels(&options.node_column)?);
        let dropped = data_labels
            .iter()
            .filter(|l| !slots.contains_key(l.as_str()))
            .count();
        if dropped > 0 {
            tracing::debug!(
                column = %options.node_column,
                dropped,
                "labels without a slot in the head layer"
            );
        }

        let sublayers: Vec<Option<String>> = match &options.sublayer_column {
            Some(column) => distinct_in_order(table.labels(column)?)
                .into_iter()
                .map(Some)
                .collect(),
            None => vec![None],
        };
        if sublayers.is_empty() {
            tracing::debug!(column = ?options.sublayer_column, "no sub-rows to extend");
            return Ok(vec![]);
        }

        let mut nodes = Vec::with_capacity(slots.len() * sublayers.len());
        for head in slots.values() {
            for (k, sublayer) in sublayers.iter().enumerate() {
                let radius = options.radius + k as f32 * options.radius_increment;
                nodes.push(head.rederive(radius, sublayer.clone()));
            }
        }
        Ok(nodes)
    }
}
