//! Error types for conquest-map
//!
//! Invalid input and missing resources are reported as typed variants.
//! Every mutation validates before it writes, so an `Err` means the
//! registry and the mask files are unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while editing or rendering a map
#[derive(Debug, Error)]
pub enum MapError {
    /// A required file or directory does not exist
    #[error("missing resource: {}", path.display())]
    MissingResource { path: PathBuf },

    /// Keys that are not present in the registry
    #[error("unknown region keys: {keys:?}")]
    InvalidKeys { keys: Vec<u32> },

    /// Merge needs at least two distinct keys
    #[error("at least two distinct regions are required, got {count}")]
    TooFewKeys { count: usize },

    /// The requested strategy or operation is not implemented
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Refusing to overwrite an existing map directory
    #[error("{} already exists, overwrite is not supported", path.display())]
    AlreadyExists { path: PathBuf },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry (de)serialization error
    #[error("registry format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image read or write failed
    #[error("image I/O error: {0}")]
    Image(#[from] conquest_io::IoError),

    /// Segmentation or labeling failed
    #[error("region error: {0}")]
    Region(#[from] conquest_region::RegionError),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] conquest_core::Error),

    /// A background task panicked or was cancelled
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type for map operations
pub type MapResult<T> = Result<T, MapError>;
