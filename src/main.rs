//! stepmesh: export the mesh geometry of a STEP model through a ClassCAD
//! server.
//!
//! Entry point that loads configuration, sets up logging and runs one
//! export.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use stepmesh_classcad::HttpConnector;
use stepmesh_core::config::AppConfig;
use stepmesh_core::AppResult;
use stepmesh_export::{ExportPipeline, ExportRequest};

mod cli;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(&cli, config).await {
        tracing::error!(kind = %e.kind, "Export failed: {}", e.message);
        output::print_error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(config.logging.directives())
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

/// Connect once, export once.
async fn run(cli: &Cli, config: AppConfig) -> AppResult<()> {
    tracing::info!(url = %config.classcad.url, "ClassCAD server");

    let connector = HttpConnector::new(&config.classcad)?;
    let pipeline = ExportPipeline::new(Arc::new(connector), config.output);

    let report = pipeline
        .run(ExportRequest {
            input: cli.input.clone(),
        })
        .await?;

    output::print_success(&format!(
        "Exported {} mesh(es) from '{}'",
        report.mesh_count,
        report.input.display()
    ));
    output::print_kv("Output", &report.output.display().to_string());
    output::print_kv("Size", &format!("{} bytes", report.bytes_written));
    output::print_kv("Elapsed", &format!("{} ms", report.elapsed.as_millis()));
    output::print_kv("Run", &report.run_id.to_string());

    Ok(())
}
