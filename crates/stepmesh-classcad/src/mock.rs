//! In-memory connector for development and testing.
//!
//! Simulates a ClassCAD server without any network traffic and records every
//! call so tests can assert on ordering and arguments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::CadError;
use crate::models::{BufferGeometry, FormatType, ModelId};
use crate::session::{CadConnector, CadSession};

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `open_session`
    OpenSession,
    /// `load` with the payload size
    Load {
        /// Format tag passed in.
        format: FormatType,
        /// Number of bytes uploaded.
        bytes: usize,
    },
    /// `create_buffer_geometry` with the requested id
    CreateBufferGeometry(ModelId),
    /// `destroy` of the given session
    Destroy(String),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<MockCall>,
    load_ids: Vec<ModelId>,
    geometries: HashMap<ModelId, Vec<BufferGeometry>>,
    load_failure: Option<(u16, String)>,
    geometry_failure: Option<(u16, String)>,
    destroy_failure: Option<(u16, String)>,
}

/// Mock connector. Clones share state, so a test can keep one handle and
/// give another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
    next_session: Arc<AtomicU64>,
}

impl MockConnector {
    /// Create a mock whose `load` returns no references.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the references returned by `load`.
    pub fn with_load_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().load_ids = ids.into_iter().map(|s| ModelId(s.into())).collect();
        self
    }

    /// Set the geometries returned for a reference.
    pub fn with_geometries(self, id: &str, geometries: Vec<BufferGeometry>) -> Self {
        self.lock().geometries.insert(ModelId::from(id), geometries);
        self
    }

    /// Make `load` fail with a server error.
    pub fn failing_load(self, status: u16, body: &str) -> Self {
        self.lock().load_failure = Some((status, body.to_string()));
        self
    }

    /// Make `create_buffer_geometry` fail with a server error.
    pub fn failing_geometry(self, status: u16, body: &str) -> Self {
        self.lock().geometry_failure = Some((status, body.to_string()));
        self
    }

    /// Make `destroy` fail with a server error. The session is still marked
    /// closed and the call is still recorded.
    pub fn failing_destroy(self, status: u16, body: &str) -> Self {
        self.lock().destroy_failure = Some((status, body.to_string()));
        self
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CadConnector for MockConnector {
    fn endpoint(&self) -> &str {
        "mock://classcad"
    }

    async fn open_session(&self) -> Result<Box<dyn CadSession>, CadError> {
        self.lock().calls.push(MockCall::OpenSession);
        let n = self.next_session.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(MockSession {
            id: format!("mock-session-{n}"),
            connector: self.clone(),
            closed: Mutex::new(false),
        }))
    }
}

/// Session handed out by [`MockConnector`].
#[derive(Debug)]
pub struct MockSession {
    id: String,
    connector: MockConnector,
    closed: Mutex<bool>,
}

impl MockSession {
    fn ensure_open(&self) -> Result<(), CadError> {
        if *self.closed.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(CadError::SessionClosed {
                session_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CadSession for MockSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn load(&self, data: Bytes, format: FormatType) -> Result<Vec<ModelId>, CadError> {
        self.ensure_open()?;
        let mut state = self.connector.lock();
        state.calls.push(MockCall::Load {
            format,
            bytes: data.len(),
        });
        if let Some((status, body)) = &state.load_failure {
            return Err(CadError::Server {
                operation: "load",
                status: *status,
                body: body.clone(),
            });
        }
        Ok(state.load_ids.clone())
    }

    async fn create_buffer_geometry(
        &self,
        id: &ModelId,
    ) -> Result<Vec<BufferGeometry>, CadError> {
        self.ensure_open()?;
        let mut state = self.connector.lock();
        state.calls.push(MockCall::CreateBufferGeometry(id.clone()));
        if let Some((status, body)) = &state.geometry_failure {
            return Err(CadError::Server {
                operation: "createBufferGeometry",
                status: *status,
                body: body.clone(),
            });
        }
        Ok(state.geometries.get(id).cloned().unwrap_or_default())
    }

    async fn destroy(&self) -> Result<(), CadError> {
        let mut closed = self.closed.lock().unwrap_or_else(|e| e.into_inner());
        if *closed {
            return Ok(());
        }
        *closed = true;

        let mut state = self.connector.lock();
        state.calls.push(MockCall::Destroy(self.id.clone()));
        if let Some((status, body)) = &state.destroy_failure {
            return Err(CadError::Server {
                operation: "destroy",
                status: *status,
                body: body.clone(),
            });
        }
        Ok(())
    }
}
