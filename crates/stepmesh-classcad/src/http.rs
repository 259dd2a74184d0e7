//! HTTP binding of the ClassCAD session API.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | open | `POST {base}/api/sessions` |
//! | load | `POST {base}/api/sessions/{sid}/load?format=stp` (raw bytes) |
//! | tessellate | `POST {base}/api/sessions/{sid}/buffer-geometry` (`{"id": ..}`) |
//! | destroy | `DELETE {base}/api/sessions/{sid}` |

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stepmesh_core::config::classcad::ClassCadConfig;

use crate::error::CadError;
use crate::models::{BufferGeometry, FormatType, ModelId};
use crate::session::{CadConnector, CadSession};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenSessionResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    #[serde(default)]
    ids: Option<Vec<ModelId>>,
}

#[derive(Debug, Serialize)]
struct BufferGeometryRequest<'a> {
    id: &'a ModelId,
}

/// Connector speaking JSON over HTTP to a ClassCAD server.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: String,
    http: reqwest::Client,
}

impl HttpConnector {
    /// Build the connector from configuration. No network traffic happens
    /// until a session is opened.
    pub fn new(config: &ClassCadConfig) -> Result<Self, CadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(CadError::ClientBuild)?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl CadConnector for HttpConnector {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn open_session(&self) -> Result<Box<dyn CadSession>, CadError> {
        const OP: &str = "open session";

        let resp = self
            .http
            .post(format!("{}/api/sessions", self.base_url))
            .send()
            .await
            .map_err(|source| CadError::Transport { operation: OP, source })?;

        let body: OpenSessionResponse = check_status(OP, resp)
            .await?
            .json()
            .await
            .map_err(|source| CadError::Decode { operation: OP, source })?;

        info!(session_id = %body.session_id, "ClassCAD session opened");

        Ok(Box::new(HttpSession {
            url: format!("{}/api/sessions/{}", self.base_url, body.session_id),
            id: body.session_id,
            http: self.http.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Session handle returned by [`HttpConnector`].
#[derive(Debug)]
pub struct HttpSession {
    id: String,
    url: String,
    http: reqwest::Client,
    closed: AtomicBool,
}

impl HttpSession {
    fn ensure_open(&self) -> Result<(), CadError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CadError::SessionClosed {
                session_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CadSession for HttpSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn load(&self, data: Bytes, format: FormatType) -> Result<Vec<ModelId>, CadError> {
        const OP: &str = "load";
        self.ensure_open()?;

        debug!(session_id = %self.id, bytes = data.len(), %format, "Uploading model");

        let resp = self
            .http
            .post(format!("{}/load?format={}", self.url, format.as_str()))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|source| CadError::Transport { operation: OP, source })?;

        let body: LoadResponse = check_status(OP, resp)
            .await?
            .json()
            .await
            .map_err(|source| CadError::Decode { operation: OP, source })?;

        Ok(body.ids.unwrap_or_default())
    }

    async fn create_buffer_geometry(
        &self,
        id: &ModelId,
    ) -> Result<Vec<BufferGeometry>, CadError> {
        const OP: &str = "createBufferGeometry";
        self.ensure_open()?;

        let resp = self
            .http
            .post(format!("{}/buffer-geometry", self.url))
            .json(&BufferGeometryRequest { id })
            .send()
            .await
            .map_err(|source| CadError::Transport { operation: OP, source })?;

        let geometries: Option<Vec<BufferGeometry>> = check_status(OP, resp)
            .await?
            .json()
            .await
            .map_err(|source| CadError::Decode { operation: OP, source })?;

        Ok(geometries.unwrap_or_default())
    }

    async fn destroy(&self) -> Result<(), CadError> {
        const OP: &str = "destroy";
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let resp = self
            .http
            .delete(&self.url)
            .send()
            .await
            .map_err(|source| CadError::Transport { operation: OP, source })?;
        check_status(OP, resp).await?;

        info!(session_id = %self.id, "ClassCAD session destroyed");
        Ok(())
    }
}

/// Turn a non-success response into [`CadError::Server`].
async fn check_status(
    operation: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, CadError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    Err(CadError::Server {
        operation,
        status: status.as_u16(),
        body: body.chars().take(2000).collect(),
    })
}
