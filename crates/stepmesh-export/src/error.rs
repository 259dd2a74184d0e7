//! Error type for the export pipeline.

use std::path::PathBuf;

use stepmesh_classcad::CadError;
use stepmesh_core::error::AppError;
use thiserror::Error;

/// Everything that can end an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested input path does not exist.
    #[error("{path} does not exist")]
    InputNotFound {
        /// Absolute path that was looked up.
        path: PathBuf,
    },

    /// The input path exists but is not a regular file.
    #[error("{path} is not a file")]
    InputNotAFile {
        /// Absolute path that was looked up.
        path: PathBuf,
    },

    /// No output file name can be derived from the input path.
    #[error("Cannot derive an output file name from: {path}")]
    NoFileName {
        /// The offending input path.
        path: PathBuf,
    },

    /// The ClassCAD server or session failed.
    #[error(transparent)]
    Cad(#[from] CadError),

    /// Local filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::InputNotFound { .. } => AppError::not_found(err.to_string()),
            ExportError::InputNotAFile { .. } | ExportError::NoFileName { .. } => {
                AppError::validation(err.to_string())
            }
            ExportError::Cad(e) => e.into(),
            ExportError::Io(e) => e.into(),
            ExportError::Json(e) => e.into(),
        }
    }
}
