//! CLI error types.

use std::path::PathBuf;

use md2html_config::ConfigError;
use md2html_s3::UploadError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Validation(String),
}

impl CliError {
    /// Attach the offending path to an I/O error.
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
