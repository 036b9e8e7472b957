//! Even angular partition of the circle over a node column.

use std::f64::consts::TAU;

use arrow::record_batch::RecordBatch;
use indexmap::{IndexMap, IndexSet};

use crate::error::RingplotError;
use crate::node::{Node, PolarPosition};
use crate::table::Table;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionOptions {
    pub node_column: String,
    pub radius: f32,
    pub order_by: Option<String>,
    pub group_by: Option<String>,
    /// Explicit group order; unlisted groups follow in first-appearance order
    pub group_order: Option<Vec<String>>,
    pub sublayer_column: Option<String>,
    pub radius_increment: f32,
}

impl PartitionOptions {
    pub fn new(node_column: impl Into<String>, radius: f32) -> Self {
        Self {
            node_column: node_column.into(),
            radius,
            ..Default::default()
        }
    }

    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    pub fn with_group_order(mut self, order: Vec<String>) -> Self {
        self.group_order = Some(order);
        self
    }

    pub fn with_sublayers(mut self, column: impl Into<String>, radius_increment: f32) -> Self {
        self.sublayer_column = Some(column.into());
        self.radius_increment = radius_increment;
        self
    }
}

/// Ordered node list plus the uniform angular width of its slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub nodes: Vec<Node>,
    pub node_width: f32,
}

pub struct NodePartitioner;

impl NodePartitioner {
    /// Partition the circle into one slot per distinct value of the node
    /// column.
    pub fn build(data: &RecordBatch, options: &PartitionOptions) -> Result<Partition, RingplotError> {
        let table = Table::new(data);
        table.require(
            std::iter::once(options.node_column.as_str())
                .chain(options.order_by.as_deref())
                .chain(options.group_by.as_deref())
                .chain(options.sublayer_column.as_deref()),
        )?;

        let rows = table.row_order(options.order_by.as_deref())?;
        let labels = table.labels(&options.node_column)?;
        let groups = match &options.group_by {
            Some(group_by) => Some(table.labels(group_by)?),
            None => None,
        };

        let entries = rows.iter().filter_map(|row| {
            let label = labels[*row].clone()?;
            let group = groups.as_ref().and_then(|g| g[*row].clone());
            Some((label, group))
        });

        let sublayers = match &options.sublayer_column {
            Some(column) => {
                let values = table.labels(column)?;
                Some(distinct_in_order(rows.iter().map(|row| values[*row].clone())))
            }
            None => None,
        };

        Ok(Self::from_entries(entries, options, sublayers.as_ref()))
    }

    /// Partition over already ordered `(label, group)` entries.
    ///
    /// Used directly by rings whose node set spans more than one column.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Option<String>)>,
        options: &PartitionOptions,
        sublayers: Option<&IndexSet<String>>,
    ) -> Partition {
        // First group value seen for each label
        let mut distinct: IndexMap<String, Option<String>> = IndexMap::new();
        for (label, group) in entries {
            let slot = distinct.entry(label).or_insert(None);
            if slot.is_none() {
                *slot = group;
            }
        }

        let ordered = if options.group_by.is_some() {
            group_contiguous(distinct, options.group_order.as_deref())
        } else {
            distinct.into_iter().collect()
        };

        let rows: Vec<Option<&String>> = match sublayers {
            Some(sublayers) => sublayers.iter().map(Some).collect(),
            None => vec![None],
        };

        let n = ordered.len();
        if n == 0 || rows.is_empty() {
            tracing::debug!(
                column = %options.node_column,
                nodes = n,
                rows = rows.len(),
                "no nodes to partition"
            );
            return Partition {
                nodes: vec![],
                node_width: 0.0,
            };
        }
        let node_width = (TAU / n as f64) as f32;

        let mut nodes = Vec::with_capacity(n * rows.len());
        for (i, (label, group)) in ordered.into_iter().enumerate() {
            let angle = (i as f64 * TAU / n as f64) as f32;
            for (k, sublayer) in rows.iter().enumerate() {
                let radius = options.radius + k as f32 * options.radius_increment;
                nodes.push(Node::new(
                    label.clone(),
                    group.clone(),
                    sublayer.cloned(),
                    PolarPosition::new(angle, radius),
                    node_width,
                ));
            }
        }

        tracing::debug!(
            column = %options.node_column,
            nodes = n,
            rows = rows.len(),
            "partitioned circle"
        );
        Partition { nodes, node_width }
    }
}

/// Distinct non-null values in first-appearance order
pub(crate) fn distinct_in_order(values: impl IntoIterator<Item = Option<String>>) -> IndexSet<String> {
    values.into_iter().flatten().collect()
}

/// Reorder labels so each group's members are contiguous, keeping the
/// relative order of labels within a group. Ungrouped labels go last.
fn group_contiguous(
    labels: IndexMap<String, Option<String>>,
    group_order: Option<&[String]>,
) -> Vec<(String, Option<String>)> {
    let appearance: IndexSet<&String> = labels.values().flatten().collect();
    let mut order: IndexSet<&String> = IndexSet::new();
    if let Some(explicit) = group_order {
        order.extend(explicit.iter().filter(|g| appearance.contains(g)));
    }
    order.extend(appearance.iter().copied());

    let mut ordered: Vec<(String, Option<String>)> = Vec::with_capacity(labels.len());
    for group in &order {
        ordered.extend(
            labels
                .iter()
                .filter(|(_, g)| g.as_ref() == Some(*group))
                .map(|(l, g)| (l.clone(), g.clone())),
        );
    }
    ordered.extend(
        labels
            .iter()
            .filter(|(_, g)| g.is_none())
            .map(|(l, g)| (l.clone(), g.clone())),
    );
    ordered
}
