pub mod arc;
pub mod line;
pub mod mark;
pub mod path;
pub mod text;
