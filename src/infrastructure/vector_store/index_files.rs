//! On-disk layout of a persisted index directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::domain::entities::{ChunkPreview, ContentChunk};
use crate::domain::repositories::VectorIndexError;
use crate::domain::value_objects::IndexSource;

pub const FORMAT_VERSION: u32 = 1;
pub const INDEX_FILE: &str = "index.json";
pub const DOCSTORE_FILE: &str = "docstore.json";
pub const CHUNKS_METADATA_FILE: &str = "chunks_metadata.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub format_version: u32,
    pub model_name: String,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
    pub source: IndexSource,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk_id: usize,
    pub vector: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexFile {
    pub manifest: IndexManifest,
    pub entries: Vec<IndexEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocStoreFile {
    pub chunks: Vec<ContentChunk>,
}

pub async fn write_index_dir(
    dir: &Path,
    index: &IndexFile,
    docstore: &DocStoreFile,
) -> Result<(), VectorIndexError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| VectorIndexError::IoError(format!("{}: {}", dir.display(), e)))?;

    let previews: Vec<ChunkPreview> = docstore.chunks.iter().map(ChunkPreview::from).collect();

    write_json(&dir.join(INDEX_FILE), serde_json::to_vec(index)).await?;
    write_json(&dir.join(DOCSTORE_FILE), serde_json::to_vec(docstore)).await?;
    write_json(
        &dir.join(CHUNKS_METADATA_FILE),
        serde_json::to_vec_pretty(&previews),
    )
    .await?;

    Ok(())
}

pub async fn read_index_dir(dir: &Path) -> Result<(IndexFile, DocStoreFile), VectorIndexError> {
    let index_path = dir.join(INDEX_FILE);
    if !tokio::fs::try_exists(&index_path).await.unwrap_or(false) {
        return Err(VectorIndexError::IndexNotFound(dir.display().to_string()));
    }

    let index: IndexFile = read_json(&index_path).await?;
    let docstore: DocStoreFile = read_json(&dir.join(DOCSTORE_FILE)).await?;
    Ok((index, docstore))
}

async fn write_json(path: &Path, bytes: serde_json::Result<Vec<u8>>) -> Result<(), VectorIndexError> {
    let bytes = bytes.map_err(|e| VectorIndexError::Corrupted(e.to_string()))?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| VectorIndexError::IoError(format!("{}: {}", path.display(), e)))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, VectorIndexError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| VectorIndexError::IoError(format!("{}: {}", path.display(), e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| VectorIndexError::Corrupted(format!("{}: {}", path.display(), e)))
}
