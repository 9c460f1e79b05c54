//! Error types for the docdeck-core library.

use thiserror::Error;

/// Main error type for the docdeck library.
#[derive(Error, Debug)]
pub enum DocdeckError {
    /// Extracted element could not be converted.
    #[error("element error: {0}")]
    Element(#[from] ElementError),

    /// Page layout or deck rendering error.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// An external collaborator (LLM, captioning, retrieval) failed.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while converting extraction records into elements.
#[derive(Error, Debug)]
pub enum ElementError {
    /// The record carries no coordinates block.
    #[error("element {id} has no coordinates")]
    MissingCoordinates { id: String },

    /// The coordinates block has fewer than four corner points.
    #[error("element {id} has {count} corner points, expected 4")]
    IncompletePoints { id: String, count: usize },
}

/// Errors related to page layout and deck output.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Page pixel dimensions must be positive to derive a scale.
    #[error("invalid page layout size {width}x{height} on page {page}")]
    InvalidPageSize { page: u32, width: f64, height: f64 },

    /// Canvas dimensions must be positive.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    /// Writing the rendered deck failed.
    #[error("failed to write deck: {0}")]
    Write(String),
}

/// Errors surfaced by external collaborators.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Language-model completion failed.
    #[error("completion failed: {0}")]
    Completion(String),

    /// Image captioning failed.
    #[error("captioning failed: {0}")]
    Captioning(String),

    /// Passage retrieval failed.
    #[error("retrieval failed: {0}")]
    Retrieval(String),
}

/// Result type for the docdeck library.
pub type Result<T> = std::result::Result<T, DocdeckError>;
