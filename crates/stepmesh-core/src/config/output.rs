//! Output document configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name of the sample model processed when no input is given.
pub const DEFAULT_SAMPLE_FILE: &str = "as1_ac_214.stp";

/// Where the geometry JSON is written and how it is formatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `<input-file-name>.json`.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Indent the JSON document (development mode).
    #[serde(default)]
    pub pretty: bool,
    /// Model processed when no input path is supplied.
    #[serde(default = "default_sample_file")]
    pub sample_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            pretty: false,
            sample_file: default_sample_file(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".temp")
}

fn default_sample_file() -> PathBuf {
    PathBuf::from("res").join(DEFAULT_SAMPLE_FILE)
}
