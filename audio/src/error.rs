use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by audio loading and normalization.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported audio format \"{ext}\": {}", path.display())]
    UnsupportedFormat { path: PathBuf, ext: String },

    #[error("conversion failed for {}: {detail}", path.display())]
    Conversion { path: PathBuf, detail: String },
}
