use crate::node::Node;

/// Summary of one completed ring.
///
/// Returned by every ring draw and accepted by the next ring as its head
/// layer, so later rings reuse this ring's angular partition.
#[derive(Debug, Clone, PartialEq)]
pub struct CircLayer {
    name: String,
    radius: f32,
    extent: f32,
    node_list: Vec<Node>,
    node_width: f32,
}

impl CircLayer {
    pub fn new(
        name: impl Into<String>,
        radius: f32,
        extent: f32,
        node_list: Vec<Node>,
        node_width: f32,
    ) -> Self {
        Self {
            name: name.into(),
            radius,
            extent,
            node_list,
            node_width,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inner radius of the ring
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Radial extent of the ring beyond its inner radius
    pub fn extent(&self) -> f32 {
        self.extent
    }

    pub fn node_list(&self) -> &[Node] {
        &self.node_list
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn is_empty(&self) -> bool {
        self.node_list.is_empty()
    }

    /// Nodes on the ring's base row, one per label
    pub fn base_nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_list
            .iter()
            .filter(move |n| n.position.radius == self.radius)
    }

    /// First node carrying `label`
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.node_list.iter().find(|n| n.label == label)
    }

    /// Node for `label` on the given sub-row
    pub fn cell(&self, label: &str, sublayer: &str) -> Option<&Node> {
        self.node_list
            .iter()
            .find(|n| n.label == label && n.sublayer.as_deref() == Some(sublayer))
    }
}
