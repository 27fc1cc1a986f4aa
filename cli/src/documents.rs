//! Reading upload files from disk.

use std::path::{Path, PathBuf};

use conductor::RawDocument;

use crate::CliError;

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads each file as text; `source` is the file name. Files that are not valid
/// UTF-8 are rejected; file-type checks are left to the service.
pub fn read_documents(paths: &[PathBuf]) -> Result<Vec<RawDocument>, CliError> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            let content =
                String::from_utf8(bytes).map_err(|_| CliError::NotUtf8 { path: path.clone() })?;
            Ok(RawDocument {
                source: source_name(path),
                content,
            })
        })
        .collect()
}
