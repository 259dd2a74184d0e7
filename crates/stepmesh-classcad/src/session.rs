//! Connector and session traits for pluggable ClassCAD transports.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::CadError;
use crate::models::{BufferGeometry, FormatType, ModelId};

/// Process-wide entry point to a ClassCAD server.
///
/// Constructed once from configuration; every unit of work obtains its own
/// [`CadSession`] from it.
#[async_trait]
pub trait CadConnector: Send + Sync + std::fmt::Debug + 'static {
    /// Server address this connector talks to.
    fn endpoint(&self) -> &str;

    /// Open a fresh session (a new modelling history on the server).
    async fn open_session(&self) -> Result<Box<dyn CadSession>, CadError>;
}

/// One live modelling history on the server.
///
/// A session must be released with [`CadSession::destroy`]; calls after that
/// fail with [`CadError::SessionClosed`].
#[async_trait]
pub trait CadSession: Send + Sync + std::fmt::Debug {
    /// Server-side session identifier.
    fn id(&self) -> &str;

    /// Upload model data and parse it. Returns the references of the
    /// top-level objects created.
    async fn load(&self, data: Bytes, format: FormatType) -> Result<Vec<ModelId>, CadError>;

    /// Tessellate a loaded model, one buffer geometry per mesh.
    async fn create_buffer_geometry(&self, id: &ModelId)
    -> Result<Vec<BufferGeometry>, CadError>;

    /// Release the session on the server.
    async fn destroy(&self) -> Result<(), CadError>;
}
