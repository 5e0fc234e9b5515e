//! Error types for conquest-region

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during segmentation and labeling
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] conquest_core::Error),

    /// Image read or write failed
    #[error("image I/O error: {0}")]
    Io(#[from] conquest_io::IoError),

    /// Filesystem error outside image codecs (creating directories)
    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),

    /// A required input file does not exist
    #[error("missing resource: {}", path.display())]
    MissingResource { path: PathBuf },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
