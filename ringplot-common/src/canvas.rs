use serde::{Deserialize, Serialize};

/// Position in the diagram's polar layout space.
///
/// Angles are in radians, measured clockwise from 12 o'clock. Radii are in
/// layout units.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarPosition {
    pub angle: f32,
    pub radius: f32,
}

impl PolarPosition {
    pub fn new(angle: f32, radius: f32) -> Self {
        Self { angle, radius }
    }
}

/// Square area a circular diagram is projected onto.
///
/// The diagram center sits in the middle of the canvas and `scale` converts
/// layout units (the radii passed to rings) into canvas units.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDimensions {
    pub size: [f32; 2],
    pub scale: f32,
}

impl CanvasDimensions {
    pub fn center(&self) -> [f32; 2] {
        [self.size[0] / 2.0, self.size[1] / 2.0]
    }

    /// Project a polar layout position into canvas coordinates (y grows
    /// downwards, as in the arc mark).
    pub fn project(&self, position: PolarPosition) -> [f32; 2] {
        let [cx, cy] = self.center();
        let r = position.radius * self.scale;
        [cx + r * position.angle.sin(), cy - r * position.angle.cos()]
    }
}

impl Default for CanvasDimensions {
    fn default() -> Self {
        Self {
            size: [400.0, 400.0],
            scale: 20.0,
        }
    }
}
