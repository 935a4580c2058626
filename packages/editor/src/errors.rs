//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid video source: {0}. Use a watch URL, youtu.be link, or embed code")]
    InvalidVideoSource(String),

    #[error("Text range {start}..{end} is outside the document ({length} characters)")]
    SelectionOutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
