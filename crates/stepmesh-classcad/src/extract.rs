//! Geometry extraction: load a model in a session and flatten the meshes of
//! its first top-level object.

use bytes::Bytes;
use tracing::{debug, instrument};

use crate::error::CadError;
use crate::models::{FormatType, MeshGeometry};
use crate::session::CadSession;
use crate::timing::Timing;

/// Load `data` into `session` and return one record per mesh of the first
/// model reference the server produced.
///
/// Further references are ignored. An empty load result is an error, and
/// no tessellation is requested in that case. Remote failures are returned
/// unmodified; nothing is retried.
#[instrument(skip(data, session), fields(session_id = session.id(), bytes = data.len()))]
pub async fn extract_geometry(
    data: Bytes,
    format: FormatType,
    session: &dyn CadSession,
) -> Result<Vec<MeshGeometry>, CadError> {
    let mut timing = Timing::start();

    let ids = session.load(data, format).await?;
    timing.dump("api.load");

    let Some(first) = ids.first() else {
        return Err(CadError::EmptyLoadResult {
            format: format.as_str(),
        });
    };
    if ids.len() > 1 {
        debug!(
            ignored = ids.len() - 1,
            "Load produced several objects, tessellating only the first"
        );
    }

    let geometries = session.create_buffer_geometry(first).await?;
    timing.dump("api.createBufferGeometry");

    Ok(geometries.iter().map(MeshGeometry::from).collect())
}
