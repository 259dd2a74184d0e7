//! # stepmesh-classcad
//!
//! Client side of the ClassCAD geometry server.
//!
//! Connectivity is split in two phases: a [`CadConnector`] is built once per
//! process from configuration, and hands out [`CadSession`]s scoped to a
//! single task. [`extract_geometry`] drives a session to load a model and
//! returns its tessellated meshes as plain [`MeshGeometry`] records.

pub mod error;
pub mod extract;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
pub mod session;
pub mod timing;

pub use error::CadError;
pub use extract::extract_geometry;
pub use http::HttpConnector;
pub use models::{BufferGeometry, FormatType, MeshGeometry, ModelId};
pub use session::{CadConnector, CadSession};
pub use timing::Timing;
