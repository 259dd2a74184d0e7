//! Filesystem utilities for the export pipeline.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::ExportError;

/// Filesystem utility functions.
pub struct FsUtils;

impl FsUtils {
    /// Extension appended to the input file name to form the output name.
    pub const OUTPUT_EXTENSION: &'static str = "json";

    /// Pick the file to process: `requested` resolved against the current
    /// directory, or `fallback` when nothing was requested. The result must
    /// be an existing regular file.
    pub fn resolve_target(
        requested: Option<&Path>,
        fallback: &Path,
    ) -> Result<PathBuf, ExportError> {
        let path = std::path::absolute(requested.unwrap_or(fallback))?;

        if !path.exists() {
            return Err(ExportError::InputNotFound { path });
        }
        if !path.is_file() {
            return Err(ExportError::InputNotAFile { path });
        }
        Ok(path)
    }

    /// `<output_dir>/<file name of input>.json`; the input extension is kept.
    pub fn output_path_for(output_dir: &Path, input: &Path) -> Result<PathBuf, ExportError> {
        let name = input
            .file_name()
            .ok_or_else(|| ExportError::NoFileName {
                path: input.to_path_buf(),
            })?
            .to_string_lossy();

        Ok(output_dir.join(format!("{name}.{}", Self::OUTPUT_EXTENSION)))
    }

    /// Create the output directory and its parents. Existing directories are
    /// left alone.
    pub async fn prepare_output_dir(output_dir: &Path) -> Result<(), ExportError> {
        tokio::fs::create_dir_all(output_dir).await?;
        Ok(())
    }

    /// Delete a previous output so the next write is never merged with stale
    /// content. Returns whether a file was removed.
    pub async fn remove_stale_output(output: &Path) -> Result<bool, ExportError> {
        match tokio::fs::remove_file(output).await {
            Ok(()) => {
                tracing::debug!(file = %output.display(), "Removed previous output");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ExportError::Io(e)),
        }
    }

    /// Write the document and flush it to disk before returning.
    pub async fn write_document(output: &Path, document: &[u8]) -> Result<u64, ExportError> {
        let mut file = tokio::fs::File::create(output).await?;
        file.write_all(document).await?;
        file.sync_all().await?;
        Ok(document.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_keeps_input_extension() {
        let out = FsUtils::output_path_for(Path::new("/work/.temp"), Path::new("/models/as1.stp"))
            .expect("path");
        assert_eq!(out, PathBuf::from("/work/.temp/as1.stp.json"));
    }

    #[test]
    fn test_output_path_without_file_name() {
        let err = FsUtils::output_path_for(Path::new("/work"), Path::new("/"))
            .expect_err("no file name");
        assert!(matches!(err, ExportError::NoFileName { .. }));
    }

    #[test]
    fn test_resolve_target_rejects_missing_and_directories() {
        let temp = tempfile::tempdir().expect("tempdir");

        let missing = temp.path().join("missing.stp");
        let err = FsUtils::resolve_target(Some(&missing), Path::new("unused"))
            .expect_err("missing");
        assert!(matches!(err, ExportError::InputNotFound { ref path } if *path == missing));

        let err = FsUtils::resolve_target(Some(temp.path()), Path::new("unused"))
            .expect_err("directory");
        assert!(matches!(err, ExportError::InputNotAFile { .. }));
    }

    #[test]
    fn test_resolve_target_uses_fallback() {
        let temp = tempfile::tempdir().expect("tempdir");
        let sample = temp.path().join("sample.stp");
        std::fs::write(&sample, "ISO-10303-21;").expect("write");

        let resolved = FsUtils::resolve_target(None, &sample).expect("resolve");
        assert_eq!(resolved, sample);
    }

    #[tokio::test]
    async fn test_prepare_and_remove_are_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("a").join("b");

        FsUtils::prepare_output_dir(&dir).await.expect("first");
        FsUtils::prepare_output_dir(&dir).await.expect("second");
        assert!(dir.is_dir());

        let output = dir.join("x.stp.json");
        assert!(!FsUtils::remove_stale_output(&output).await.expect("absent"));

        std::fs::write(&output, "old").expect("write");
        assert!(FsUtils::remove_stale_output(&output).await.expect("present"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_write_document_reports_size() {
        let temp = tempfile::tempdir().expect("tempdir");
        let output = temp.path().join("doc.json");

        let written = FsUtils::write_document(&output, b"[]").await.expect("write");
        assert_eq!(written, 2);
        assert_eq!(std::fs::read_to_string(&output).expect("read"), "[]");
    }
}
