//! Application configuration schemas.
//!
//! The configuration is assembled once at startup via the `config` crate
//! and passed down explicitly. Sources, later ones winning:
//!
//! 1. built-in defaults anchored at the repository root,
//! 2. `config/default.toml` (optional),
//! 3. an explicit `--config` file,
//! 4. `STEPMESH__<SECTION>__<KEY>` environment variables,
//! 5. the conventional `CLASSCAD_URL`, `RUST_LOG` and `NODE_ENV` variables,
//! 6. command-line overrides.
//!
//! A `.env` file in the working directory is merged underneath the
//! process environment before steps 4 and 5 are evaluated.

pub mod classcad;
pub mod logging;
pub mod output;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::classcad::ClassCadConfig;
use self::logging::LoggingConfig;
use self::output::{DEFAULT_SAMPLE_FILE, OutputConfig};

use crate::error::AppError;
use crate::result::AppResult;

/// Environment variable naming the ClassCAD server.
pub const CLASSCAD_URL_VAR: &str = "CLASSCAD_URL";

/// Environment variable holding tracing filter directives.
pub const RUST_LOG_VAR: &str = "RUST_LOG";

/// Environment variable selecting development mode.
pub const NODE_ENV_VAR: &str = "NODE_ENV";

/// Value of [`NODE_ENV_VAR`] that enables pretty-printed output.
pub const DEVELOPMENT_MODE: &str = "development";

/// Prefix for structured environment overrides.
const ENV_PREFIX: &str = "STEPMESH";

/// Root application configuration.
#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote CAD server settings.
    #[serde(default)]
    #[validate(nested)]
    pub classcad: ClassCadConfig,
    /// Output document settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `classcad.url`.
    pub server_url: Option<String>,
    /// Replaces `output.dir`.
    pub out_dir: Option<PathBuf>,
    /// Forces `output.pretty = true` when set.
    pub pretty: bool,
}

/// Everything [`AppConfig::load`] reads from.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// Repository root; anchors `config/default`, `.temp` and `res/`.
    pub root: PathBuf,
    /// Additional configuration file, required to exist when set.
    pub config_file: Option<PathBuf>,
    /// `KEY=value` file merged underneath the process environment.
    pub dotenv_file: PathBuf,
    /// Snapshot of the process environment.
    pub environment: HashMap<String, String>,
    /// Command-line overrides.
    pub overrides: ConfigOverrides,
}

impl ConfigSources {
    /// Sources for a normal process start: the real environment and a
    /// `.env` file in the current directory.
    pub fn from_process(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_file: None,
            dotenv_file: PathBuf::from(".env"),
            environment: std::env::vars().collect(),
            overrides: ConfigOverrides::default(),
        }
    }

    /// Process environment layered over the `.env` file.
    fn merged_environment(&self) -> AppResult<HashMap<String, String>> {
        let mut merged = read_dotenv(&self.dotenv_file)?;
        merged.extend(self.environment.clone());
        Ok(merged)
    }
}

impl AppConfig {
    /// Build, deserialize and validate the configuration.
    pub fn load(sources: &ConfigSources) -> AppResult<Self> {
        let env = sources.merged_environment()?;
        let root = &sources.root;

        let mut builder = config::Config::builder()
            .set_default("output.dir", path_value(&root.join(".temp")))?
            .set_default(
                "output.sample_file",
                path_value(&root.join("res").join(DEFAULT_SAMPLE_FILE)),
            )?
            .add_source(config::File::from(root.join("config").join("default")).required(false));

        if let Some(file) = &sources.config_file {
            builder = builder.add_source(config::File::from(file.as_path()).required(true));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone().into_iter().collect())),
            )
            .set_override_option("classcad.url", env.get(CLASSCAD_URL_VAR).cloned())?
            .set_override_option("logging.filter", env.get(RUST_LOG_VAR).cloned())?;

        if env.get(NODE_ENV_VAR).map(String::as_str) == Some(DEVELOPMENT_MODE) {
            builder = builder.set_override("output.pretty", true)?;
        }

        let overrides = &sources.overrides;
        builder = builder
            .set_override_option("classcad.url", overrides.server_url.clone())?
            .set_override_option("output.dir", overrides.out_dir.as_deref().map(path_value))?;
        if overrides.pretty {
            builder = builder.set_override("output.pretty", true)?;
        }

        let config: Self = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Read a dotenv-style file. A missing file yields no variables.
fn read_dotenv(path: &Path) -> AppResult<HashMap<String, String>> {
    if !path.is_file() {
        return Ok(HashMap::new());
    }

    let values: HashMap<String, String> = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Ini))
        .build()?
        .try_deserialize()?;

    tracing::debug!(path = %path.display(), count = values.len(), "Loaded dotenv file");

    Ok(values
        .into_iter()
        .map(|(k, v)| (k.to_uppercase(), v))
        .collect())
}
