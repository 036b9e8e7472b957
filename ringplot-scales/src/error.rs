#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("Unknown colormap `{0}`, expected one of: {1}")]
    UnknownColormap(String, String),

    #[error("Invalid CSS color: `{0}`")]
    InvalidColor(String),

    #[error("A colormap needs at least two colors, got {0}")]
    TooFewColors(usize),
}
