//! Domain models: input formats, model references, buffer geometry as the
//! server sends it, and the flattened mesh record written to disk.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Content type of an uploaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    /// ISO 10303-21 STEP exchange file.
    #[default]
    Stp,
}

impl FormatType {
    /// File extensions recognized as STEP.
    const STEP_EXTENSIONS: &'static [&'static str] = &["stp", "step", "p21"];

    /// Tag sent to the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stp => "stp",
        }
    }

    /// Guess the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::STEP_EXTENSIONS
            .contains(&ext.as_str())
            .then_some(Self::Stp)
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side reference to a loaded model. Only valid inside the session
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire shape of a tessellated mesh
// ---------------------------------------------------------------------------

/// A typed numeric array as sent by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferAttribute {
    /// Flat element values.
    #[serde(default)]
    pub array: Option<Vec<f64>>,
}

impl BufferAttribute {
    /// Wrap a value list.
    pub fn new(array: Vec<f64>) -> Self {
        Self { array: Some(array) }
    }
}

/// Named vertex attributes of a buffer geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryAttributes {
    /// Vertex positions, `x, y, z` per vertex.
    #[serde(default)]
    pub position: Option<BufferAttribute>,
    /// Vertex normals, `nx, ny, nz` per vertex.
    #[serde(default)]
    pub normal: Option<BufferAttribute>,
}

/// One tessellated mesh. Every level may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferGeometry {
    /// Vertex attributes.
    #[serde(default)]
    pub attributes: Option<GeometryAttributes>,
    /// Triangle index list.
    #[serde(default)]
    pub index: Option<BufferAttribute>,
}

impl BufferGeometry {
    /// Geometry with all three arrays present.
    pub fn new(position: Vec<f64>, normal: Vec<f64>, index: Vec<f64>) -> Self {
        Self {
            attributes: Some(GeometryAttributes {
                position: Some(BufferAttribute::new(position)),
                normal: Some(BufferAttribute::new(normal)),
            }),
            index: Some(BufferAttribute::new(index)),
        }
    }

    fn position(&self) -> Option<&[f64]> {
        self.attributes
            .as_ref()?
            .position
            .as_ref()?
            .array
            .as_deref()
    }

    fn normal(&self) -> Option<&[f64]> {
        self.attributes.as_ref()?.normal.as_ref()?.array.as_deref()
    }

    fn index(&self) -> Option<&[f64]> {
        self.index.as_ref()?.array.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Output record
// ---------------------------------------------------------------------------

/// Flattened mesh written to the output document. Each field holds the
/// comma-separated values of the corresponding array; a field the server
/// omitted is left out of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshGeometry {
    /// Flattened vertex coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Flattened vertex normals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    /// Triangle indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl From<&BufferGeometry> for MeshGeometry {
    fn from(geometry: &BufferGeometry) -> Self {
        Self {
            position: geometry.position().map(join_numbers),
            normal: geometry.normal().map(join_numbers),
            index: geometry.index().map(join_numbers),
        }
    }
}

/// Join values with `,` using [`format_number`].
pub fn join_numbers(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format_number(*value));
    }
    out
}

/// Render a number the way ECMAScript `Number#toString` does.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_matches_ecmascript() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_join_numbers() {
        assert_eq!(join_numbers(&[0.0, 1.0, 2.0]), "0,1,2");
        assert_eq!(join_numbers(&[-1.5, 0.25]), "-1.5,0.25");
        assert_eq!(join_numbers(&[]), "");
    }

    #[test]
    fn test_mesh_from_complete_geometry() {
        let geometry = BufferGeometry::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 1.0], vec![0.0, 1.0, 2.0]);
        let mesh = MeshGeometry::from(&geometry);
        assert_eq!(mesh.position.as_deref(), Some("0,1,2"));
        assert_eq!(mesh.normal.as_deref(), Some("0,0,1"));
        assert_eq!(mesh.index.as_deref(), Some("0,1,2"));
    }

    #[test]
    fn test_mesh_from_partial_geometry() {
        let geometry: BufferGeometry = serde_json::from_str(
            r#"{"attributes":{"position":{"array":[1,2,3]},"normal":{}}}"#,
        )
        .expect("parse");
        let mesh = MeshGeometry::from(&geometry);
        assert_eq!(mesh.position.as_deref(), Some("1,2,3"));
        assert!(mesh.normal.is_none());
        assert!(mesh.index.is_none());
    }

    #[test]
    fn test_mesh_omits_missing_fields() {
        let mesh = MeshGeometry {
            position: Some("0".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&mesh).expect("serialize");
        assert_eq!(json, r#"{"position":"0"}"#);

        let json = serde_json::to_string(&MeshGeometry::default()).expect("serialize");
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_partial_wire_geometry_renders_only_present_keys() {
        let geometries: Vec<BufferGeometry> =
            serde_json::from_str(r#"[{"attributes":{"position":{"array":[1,2,3]}}}]"#)
                .expect("parse");
        let meshes: Vec<MeshGeometry> = geometries.iter().map(MeshGeometry::from).collect();

        let json = serde_json::to_string(&meshes).expect("serialize");
        assert_eq!(json, r#"[{"position":"1,2,3"}]"#);
    }

    #[test]
    fn test_format_type_from_path() {
        assert_eq!(FormatType::from_path(Path::new("a/b.STEP")), Some(FormatType::Stp));
        assert_eq!(FormatType::from_path(Path::new("model.stp")), Some(FormatType::Stp));
        assert_eq!(FormatType::from_path(Path::new("model.igs")), None);
        assert_eq!(FormatType::from_path(Path::new("noext")), None);
        assert_eq!(FormatType::Stp.to_string(), "stp");
    }
}
