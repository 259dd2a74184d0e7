//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Full filter directives, e.g. `"stepmesh_export=debug,info"`.
    /// Filled from `RUST_LOG` (process environment or `.env`) and preferred
    /// over `level` when set.
    #[serde(default)]
    pub filter: Option<String>,
    /// Log format: `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            filter: None,
            format: default_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether structured JSON lines were requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    /// Directives for the subscriber's filter.
    pub fn directives(&self) -> &str {
        self.filter
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(&self.level)
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}
