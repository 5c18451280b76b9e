//! Error types for the pagecells library.

use std::io;
use thiserror::Error;

/// Result type alias for pagecells operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting layout cells.
///
/// Only [`Error::GlyphAccess`] ever ends the processing of a document.
/// Segmentation and ordering failures are recovered inside the page pipeline
/// by the fallback strategies, and block emission failures only skip a block.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The glyph geometry of a document (or one of its pages) cannot be read.
    #[error("Glyph access failed: {0}")]
    GlyphAccess(String),

    /// The statistical block segmentation could not produce a result.
    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    /// The precedence graph could not be resolved into a total order.
    #[error("Reading order failed: {0}")]
    Ordering(String),

    /// A single block could not be turned into a cell.
    #[error("Block {index} could not be emitted: {reason}")]
    BlockEmission {
        /// Position of the block in the page's reading order
        index: usize,
        /// What was wrong with the block
        reason: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
