//! Convenience result type alias for stepmesh.

use crate::error::AppError;

/// A specialized `Result` type for stepmesh operations.
pub type AppResult<T> = Result<T, AppError>;
