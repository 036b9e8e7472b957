use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use ringplot_scales::error::ScaleError;
use ringplot_scenegraph::error::SurfaceError;
use thiserror::Error;

use crate::encode::EncodingChannel;

#[derive(Error, Debug)]
pub enum RingplotError {
    #[error("Unknown reducer `{0}`, expected one of: {1}")]
    UnknownReducer(String, String),

    #[error("Unknown encoding channel `{0}`, expected one of: {1}")]
    UnknownChannel(String, String),

    #[error("The {ring} ring does not support the `{channel}` encoding channel")]
    UnsupportedChannel {
        ring: &'static str,
        channel: EncodingChannel,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Column `{0}` not found, available columns: {1}")]
    ColumnNotFound(String, String),

    #[error("Column `{column}` has non-numeric type {data_type}")]
    NonNumericColumn { column: String, data_type: DataType },

    #[error("Scale error: {0}")]
    Scale(#[from] ScaleError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}
