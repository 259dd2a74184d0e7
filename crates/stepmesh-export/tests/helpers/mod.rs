//! Shared test helpers for export integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use stepmesh_classcad::BufferGeometry;
use stepmesh_classcad::mock::MockConnector;
use stepmesh_core::config::output::OutputConfig;
use stepmesh_export::ExportPipeline;
use tempfile::TempDir;

/// Minimal STEP payload; the mock server never parses it.
pub const STEP_BODY: &str = "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\nENDSEC;\nEND-ISO-10303-21;\n";

/// Scratch workspace with a sample model and an output directory.
pub struct TestEnv {
    /// Owns the temporary directory for the lifetime of the test.
    pub temp: TempDir,
    /// Output settings pointing into `temp`.
    pub output: OutputConfig,
}

impl TestEnv {
    /// Create a workspace with `res/as1_ac_214.stp` in place.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let sample_file = temp.path().join("res").join("as1_ac_214.stp");
        std::fs::create_dir_all(sample_file.parent().expect("parent")).expect("mkdir res");
        std::fs::write(&sample_file, STEP_BODY).expect("write sample");

        let output = OutputConfig {
            dir: temp.path().join(".temp"),
            pretty: false,
            sample_file,
        };
        Self { temp, output }
    }

    /// Write an input model and return its path.
    pub fn write_input(&self, name: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        std::fs::write(&path, STEP_BODY).expect("write input");
        path
    }

    /// Pipeline over `connector` with this environment's output settings.
    pub fn pipeline(&self, connector: &MockConnector) -> ExportPipeline {
        ExportPipeline::new(Arc::new(connector.clone()), self.output.clone())
    }

    /// Same as [`pipeline`](Self::pipeline) with pretty printing switched on.
    pub fn pretty_pipeline(&self, connector: &MockConnector) -> ExportPipeline {
        let mut output = self.output.clone();
        output.pretty = true;
        ExportPipeline::new(Arc::new(connector.clone()), output)
    }
}

/// Mock answering `load` with `["id1"]` and one complete triangle.
pub fn scenario_connector() -> MockConnector {
    MockConnector::new().with_load_ids(["id1"]).with_geometries(
        "id1",
        vec![BufferGeometry::new(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 1.0, 2.0],
        )],
    )
}

/// Read a written document as text.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read output")
}
