use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("Failed to load PDF: {0}")]
    DocumentDecode(String),

    #[error("Failed to decode signature image: {0}")]
    ImageDecode(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Failed to write PDF: {0}")]
    Write(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
