//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use stepmesh_core::config::{AppConfig, ConfigOverrides, ConfigSources};
use stepmesh_core::AppResult;

/// Upload a STEP model to a ClassCAD server and write its mesh geometry
/// (positions, normals, indices) as JSON.
#[derive(Debug, Parser)]
#[command(name = "stepmesh", version, about, long_about = None)]
pub struct Cli {
    /// STEP file to process; the bundled sample model when omitted
    pub input: Option<PathBuf>,

    /// Additional configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory receiving `<input-file-name>.json`
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// ClassCAD server URL (overrides CLASSCAD_URL)
    #[arg(long)]
    pub server_url: Option<String>,
}

impl Cli {
    /// Configuration sources for this invocation, anchored at the
    /// repository root.
    pub fn config_sources(&self) -> ConfigSources {
        let mut sources = ConfigSources::from_process(env!("CARGO_MANIFEST_DIR"));
        sources.config_file = self.config.clone();
        sources.overrides = ConfigOverrides {
            server_url: self.server_url.clone(),
            out_dir: self.out_dir.clone(),
            pretty: self.pretty,
        };
        sources
    }

    /// Load the configuration for this invocation.
    pub fn load_config(&self) -> AppResult<AppConfig> {
        AppConfig::load(&self.config_sources())
    }
}
