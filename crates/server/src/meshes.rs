//! Mesh files in the data directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use shared::{BBox, LoadError, Mesh};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshFileError {
    #[error("invalid mesh file name '{0}'")]
    BadName(String),

    #[error("mesh file '{0}' not found")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] LoadError),
}

/// Validated summary of one data file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub file: String,
    pub rank: u32,
    pub nodes: usize,
    pub zones: usize,
    pub bbox: BBox,
}

/// File names of all `*.json` files in `dir`, sorted.
pub async fn list(dir: &Path) -> Result<Vec<String>, MeshFileError> {
    let io_err = |source| MeshFileError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".json") && entry.path().is_file() {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Load and validate `file` from `dir`.
pub async fn summary(dir: &Path, file: &str) -> Result<MeshSummary, MeshFileError> {
    if !is_plain_json_name(file) {
        return Err(MeshFileError::BadName(file.to_string()));
    }
    let path = dir.join(file);
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => MeshFileError::NotFound(file.to_string()),
            _ => MeshFileError::Io { path, source },
        })?;
    let mesh = Mesh::from_json(file, &text)?;
    Ok(MeshSummary {
        file: file.to_string(),
        rank: mesh.rank(),
        nodes: mesh.node_count(),
        zones: mesh.zones().len(),
        bbox: mesh.bbox(),
    })
}

/// Rejects anything that could escape the data directory.
fn is_plain_json_name(file: &str) -> bool {
    file.ends_with(".json")
        && !file.starts_with('.')
        && !file.contains(['/', '\\'])
        && !file.contains("..")
}
