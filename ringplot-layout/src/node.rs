pub use ringplot_common::canvas::PolarPosition;
use ringplot_common::types::Rgba;
use ringplot_scenegraph::surface::PatchHandle;

/// Fill used for nodes whose color channel is not data driven
pub const NEUTRAL_COLOR: Rgba = [0.6, 0.6, 0.6, 1.0];

/// One angular slot on one ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub group: Option<String>,
    pub sublayer: Option<String>,
    /// Slot center and the radius the node's element starts at
    pub position: PolarPosition,
    /// Angular width of the slot in radians
    pub width: f32,
    pub relative_value: f32,
    pub color: Rgba,
    pub opacity: f32,
    pub patch: Option<PatchHandle>,
}

impl Node {
    pub fn new(
        label: impl Into<String>,
        group: Option<String>,
        sublayer: Option<String>,
        position: PolarPosition,
        width: f32,
    ) -> Self {
        Self {
            label: label.into(),
            group,
            sublayer,
            position,
            width,
            relative_value: 0.0,
            color: NEUTRAL_COLOR,
            opacity: 1.0,
            patch: None,
        }
    }

    pub fn angle(&self) -> f32 {
        self.position.angle
    }

    pub fn radius(&self) -> f32 {
        self.position.radius
    }

    /// Copy of this node's angular slot at another radius, with visual fields
    /// reset. The source node is left untouched.
    pub fn rederive(&self, radius: f32, sublayer: Option<String>) -> Self {
        Self::new(
            self.label.clone(),
            self.group.clone(),
            sublayer,
            PolarPosition::new(self.position.angle, radius),
            self.width,
        )
    }
}
