//! ClassCAD server connection configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where and how to reach the remote ClassCAD geometry server.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct ClassCadConfig {
    /// Base URL of the server, e.g. `http://localhost:9091`.
    #[serde(default = "default_url")]
    #[validate(url)]
    pub url: String,

    /// Per-request timeout in seconds. Unset means wait indefinitely.
    #[serde(default)]
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for ClassCadConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_seconds: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:9091".to_string()
}
