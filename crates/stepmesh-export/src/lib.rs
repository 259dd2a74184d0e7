//! # stepmesh-export
//!
//! Turns one STEP file into a mesh geometry JSON document: resolves the
//! input, prepares the output location, runs geometry extraction inside a
//! ClassCAD session that is always released, and writes the result.

pub mod error;
pub mod filesystem;
pub mod pipeline;

pub use error::ExportError;
pub use pipeline::{ExportPipeline, ExportReport, ExportRequest, RunState};
