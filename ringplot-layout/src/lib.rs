//! Layout and value encoding for circos-style circular diagrams.
//!
//! A diagram is a stack of concentric rings. Each ring partitions the circle
//! into one angular slot per node, aggregates and normalizes a value per
//! node, encodes it onto height, color and opacity, and paints the result on
//! a [`DrawingSurface`](ringplot_scenegraph::surface::DrawingSurface). Every
//! ring returns a [`CircLayer`](layer::CircLayer) that later rings can take
//! as their head layer to reuse the same angular partition.

pub mod aggregate;
pub mod config;
pub mod encode;
pub mod error;
pub mod extend;
pub mod labels;
pub mod layer;
pub mod node;
pub mod normalize;
pub mod partition;
pub mod rings;
pub mod table;
