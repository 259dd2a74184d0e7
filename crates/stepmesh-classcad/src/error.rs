//! Unified error type for ClassCAD client operations.
//!
//! Transport, protocol and session-state failures are consolidated into a
//! single `CadError` enum that maps cleanly to `stepmesh_core::AppError`.

use stepmesh_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Unified error type for all ClassCAD client operations.
#[derive(Debug, Error)]
pub enum CadError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The server could not be reached or the connection broke.
    #[error("{operation} request failed: {source}")]
    Transport {
        /// Remote operation being attempted.
        operation: &'static str,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    Server {
        /// Remote operation being attempted.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The server's response body did not match the expected shape.
    #[error("{operation} returned an unreadable response: {source}")]
    Decode {
        /// Remote operation being attempted.
        operation: &'static str,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// `load` produced no model references, so there is nothing to tessellate.
    #[error("Server loaded no model references from the {format} data")]
    EmptyLoadResult {
        /// Wire tag of the format that was loaded.
        format: &'static str,
    },

    /// An operation was attempted on a session that was already destroyed.
    #[error("Session {session_id} is already closed")]
    SessionClosed {
        /// Server-side session identifier.
        session_id: String,
    },
}

impl From<CadError> for AppError {
    fn from(err: CadError) -> Self {
        let kind = match &err {
            CadError::Decode { .. } => ErrorKind::Serialization,
            CadError::SessionClosed { .. } => ErrorKind::Session,
            CadError::ClientBuild(_) => ErrorKind::Configuration,
            CadError::Transport { .. }
            | CadError::Server { .. }
            | CadError::EmptyLoadResult { .. } => ErrorKind::ExternalService,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_maps_to_external_service() {
        let err = CadError::Server {
            operation: "load",
            status: 500,
            body: "kernel panic".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::ExternalService);
        assert!(app.message.contains("status 500"));
        assert!(app.message.contains("kernel panic"));
    }

    #[test]
    fn test_empty_load_result_message() {
        let err = CadError::EmptyLoadResult { format: "stp" };
        assert_eq!(
            err.to_string(),
            "Server loaded no model references from the stp data"
        );
    }

    #[test]
    fn test_session_closed_maps_to_session() {
        let app: AppError = CadError::SessionClosed {
            session_id: "abc".to_string(),
        }
        .into();
        assert_eq!(app.kind, ErrorKind::Session);
    }
}
