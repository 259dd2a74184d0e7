//! Export pipeline: one STEP file in, one mesh geometry JSON document out.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use stepmesh_classcad::{CadConnector, CadSession, FormatType, MeshGeometry, extract_geometry};
use stepmesh_core::config::output::OutputConfig;

use crate::error::ExportError;
use crate::filesystem::FsUtils;

/// Stage of a single run. Runs only move forward; any error ends in
/// [`RunState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing done yet.
    Idle,
    /// Picking and checking the input file.
    ResolvingFile,
    /// Creating the output directory and removing stale output.
    PreparingOutput,
    /// Opening a ClassCAD session.
    Connecting,
    /// Session is open.
    SessionOpen,
    /// Uploading and tessellating.
    Extracting,
    /// Rendering the JSON document.
    Serializing,
    /// Writing the document to disk.
    Writing,
    /// Session released after a successful run.
    SessionClosed,
    /// The run ended with an error.
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ResolvingFile => "resolving-file",
            Self::PreparingOutput => "preparing-output",
            Self::Connecting => "connecting",
            Self::SessionOpen => "session-open",
            Self::Extracting => "extracting",
            Self::Serializing => "serializing",
            Self::Writing => "writing",
            Self::SessionClosed => "session-closed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What to export.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    /// STEP file to process; the configured sample file when `None`.
    pub input: Option<PathBuf>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// Absolute path of the processed file.
    pub input: PathBuf,
    /// Path of the written document.
    pub output: PathBuf,
    /// Number of mesh records written.
    pub mesh_count: usize,
    /// Size of the written document.
    pub bytes_written: u64,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

/// The export pipeline.
#[derive(Debug, Clone)]
pub struct ExportPipeline {
    /// Process-wide ClassCAD connector.
    connector: Arc<dyn CadConnector>,
    /// Output location and formatting.
    output: OutputConfig,
}

impl ExportPipeline {
    /// Create a new pipeline.
    pub fn new(connector: Arc<dyn CadConnector>, output: OutputConfig) -> Self {
        Self { connector, output }
    }

    /// Execute one export run.
    #[instrument(skip(self, request), fields(run_id))]
    pub async fn run(&self, request: ExportRequest) -> Result<ExportReport, ExportError> {
        let run_id = Uuid::now_v7();
        tracing::Span::current().record("run_id", run_id.to_string());
        enter(RunState::Idle);

        let result = self.run_stages(run_id, request).await;

        if let Err(e) = &result {
            debug!(state = %RunState::Failed, error = %e, "Export run failed");
        }
        result
    }

    async fn run_stages(
        &self,
        run_id: Uuid,
        request: ExportRequest,
    ) -> Result<ExportReport, ExportError> {
        let started = Instant::now();

        enter(RunState::ResolvingFile);
        let input = FsUtils::resolve_target(request.input.as_deref(), &self.output.sample_file)?;
        let output = FsUtils::output_path_for(&self.output.dir, &input)?;

        enter(RunState::PreparingOutput);
        FsUtils::prepare_output_dir(&self.output.dir).await?;
        FsUtils::remove_stale_output(&output).await?;

        info!(file = %input.display(), "process file");
        if FormatType::from_path(&input).is_none() {
            warn!(
                file = %input.display(),
                "Input has no STEP extension, uploading as stp anyway"
            );
        }

        enter(RunState::Connecting);
        let session = self.connector.open_session().await?;
        enter(RunState::SessionOpen);

        let outcome = self.process_in_session(session.as_ref(), &input, &output).await;

        // Release the session on every path; a failed release never hides
        // the outcome of the run.
        if let Err(e) = session.destroy().await {
            warn!(
                session_id = session.id(),
                error = %e,
                "Failed to destroy ClassCAD session"
            );
        }

        let (mesh_count, bytes_written) = outcome?;
        enter(RunState::SessionClosed);

        Ok(ExportReport {
            run_id,
            input,
            output,
            mesh_count,
            bytes_written,
            elapsed: started.elapsed(),
        })
    }

    /// Read, extract, serialize and write while the session is open.
    async fn process_in_session(
        &self,
        session: &dyn CadSession,
        input: &Path,
        output: &Path,
    ) -> Result<(usize, u64), ExportError> {
        enter(RunState::Extracting);
        let data = Bytes::from(tokio::fs::read(input).await?);
        let meshes = extract_geometry(data, FormatType::Stp, session).await?;

        enter(RunState::Serializing);
        let document = render_document(&meshes, self.output.pretty)?;

        enter(RunState::Writing);
        let written = FsUtils::write_document(output, &document).await?;
        info!(file = %output.display(), meshes = meshes.len(), "output file");

        Ok((meshes.len(), written))
    }
}

/// Serialize the records: indented when `pretty`, a single line otherwise.
pub fn render_document(meshes: &[MeshGeometry], pretty: bool) -> Result<Vec<u8>, ExportError> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(meshes)?
    } else {
        serde_json::to_vec(meshes)?
    };
    Ok(bytes)
}

fn enter(state: RunState) {
    debug!(%state, "Export state");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meshes() -> Vec<MeshGeometry> {
        vec![MeshGeometry {
            position: Some("0,1,2".to_string()),
            normal: Some("0,0,1".to_string()),
            index: None,
        }]
    }

    #[test]
    fn test_render_compact_is_single_line() {
        let doc = render_document(&sample_meshes(), false).expect("render");
        let text = String::from_utf8(doc).expect("utf8");
        assert_eq!(text, r#"[{"position":"0,1,2","normal":"0,0,1"}]"#);
    }

    #[test]
    fn test_render_pretty_is_indented() {
        let doc = render_document(&sample_meshes(), true).expect("render");
        let text = String::from_utf8(doc).expect("utf8");
        assert!(text.lines().count() > 1);
        assert!(text.contains("\n    \"position\": \"0,1,2\""));
    }

    #[test]
    fn test_render_empty_document() {
        let doc = render_document(&[], false).expect("render");
        assert_eq!(doc, b"[]");
    }

    #[test]
    fn test_state_names() {
        assert_eq!(RunState::SessionClosed.to_string(), "session-closed");
        assert_eq!(RunState::ResolvingFile.to_string(), "resolving-file");
    }
}
