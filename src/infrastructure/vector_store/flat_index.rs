use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::index_files::{
    DocStoreFile, FORMAT_VERSION, IndexEntry, IndexFile, IndexManifest, read_index_dir,
    write_index_dir,
};
use crate::domain::entities::{ContentChunk, RetrievedChunk};
use crate::domain::repositories::{VectorIndex, VectorIndexError};
use crate::domain::value_objects::IndexSource;

#[derive(Default)]
struct IndexState {
    dimension: Option<usize>,
    entries: Vec<IndexEntry>,
    chunks: BTreeMap<usize, ContentChunk>,
    source: Option<IndexSource>,
}

/// Exact nearest-neighbour index. Every query is scored against every entry.
pub struct FlatIndex {
    model_name: String,
    state: RwLock<IndexState>,
}

impl FlatIndex {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Loads a directory written by [`VectorIndex::persist`], checking it for consistency.
    pub async fn load(dir: &Path) -> Result<Self, VectorIndexError> {
        let (index, docstore) = read_index_dir(dir).await?;
        let manifest = index.manifest;

        if manifest.format_version != FORMAT_VERSION {
            return Err(VectorIndexError::Corrupted(format!(
                "unsupported format version {} (expected {})",
                manifest.format_version, FORMAT_VERSION
            )));
        }
        if index.entries.len() != manifest.entry_count {
            return Err(VectorIndexError::Corrupted(format!(
                "manifest lists {} entries but {} were found",
                manifest.entry_count,
                index.entries.len()
            )));
        }
        if docstore.chunks.len() != index.entries.len() {
            return Err(VectorIndexError::Corrupted(format!(
                "{} vectors but {} stored chunks",
                index.entries.len(),
                docstore.chunks.len()
            )));
        }

        let chunks: BTreeMap<usize, ContentChunk> = docstore
            .chunks
            .into_iter()
            .map(|chunk| (chunk.chunk_id(), chunk))
            .collect();

        for entry in &index.entries {
            if entry.vector.len() != manifest.dimension {
                return Err(VectorIndexError::DimensionMismatch {
                    expected: manifest.dimension,
                    actual: entry.vector.len(),
                });
            }
            if !chunks.contains_key(&entry.chunk_id) {
                return Err(VectorIndexError::Corrupted(format!(
                    "entry for chunk {} has no stored text",
                    entry.chunk_id
                )));
            }
        }

        info!(
            "Loaded index from {} ({} vectors, dimension {}, model {})",
            dir.display(),
            index.entries.len(),
            manifest.dimension,
            manifest.model_name
        );

        Ok(Self {
            model_name: manifest.model_name,
            state: RwLock::new(IndexState {
                dimension: Some(manifest.dimension),
                entries: index.entries,
                chunks,
                source: Some(manifest.source),
            }),
        })
    }

    /// Errors when the index was built with a different embedding model than `configured`.
    pub fn ensure_model(&self, configured: &str) -> Result<(), VectorIndexError> {
        if self.model_name != configured {
            return Err(VectorIndexError::ModelMismatch {
                index_model: self.model_name.clone(),
                configured: configured.to_string(),
            });
        }
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for FlatIndex {
    async fn add_batch(
        &self,
        chunks: &[ContentChunk],
        vectors: Vec<Vec<f32>>,
    ) -> Result<(), VectorIndexError> {
        if chunks.len() != vectors.len() {
            return Err(VectorIndexError::LengthMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }

        let mut state = self.state.write().await;

        // Validate the whole batch before touching state.
        let mut expected = state.dimension;
        let mut seen = std::collections::HashSet::new();
        for (chunk, vector) in chunks.iter().zip(&vectors) {
            let dim = *expected.get_or_insert(vector.len());
            if vector.len() != dim || dim == 0 {
                return Err(VectorIndexError::DimensionMismatch {
                    expected: dim,
                    actual: vector.len(),
                });
            }
            if state.chunks.contains_key(&chunk.chunk_id()) || !seen.insert(chunk.chunk_id()) {
                return Err(VectorIndexError::DuplicateEntry(chunk.chunk_id()));
            }
        }

        state.dimension = expected;
        for (chunk, vector) in chunks.iter().zip(vectors) {
            state.entries.push(IndexEntry {
                chunk_id: chunk.chunk_id(),
                vector,
            });
            state.chunks.insert(chunk.chunk_id(), chunk.clone());
        }

        debug!("Index now holds {} vectors", state.entries.len());
        Ok(())
    }

    async fn similarity_search(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorIndexError> {
        let state = self.state.read().await;
        if limit == 0 || state.entries.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dim) = state.dimension {
            if query_vector.len() != dim {
                return Err(VectorIndexError::DimensionMismatch {
                    expected: dim,
                    actual: query_vector.len(),
                });
            }
        }

        let mut scored: Vec<(usize, f32)> = state
            .entries
            .iter()
            .map(|entry| (entry.chunk_id, cosine_similarity(query_vector, &entry.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(chunk_id, similarity_score)| {
                state
                    .chunks
                    .get(&chunk_id)
                    .cloned()
                    .map(|chunk| RetrievedChunk {
                        chunk,
                        similarity_score,
                    })
                    .ok_or_else(|| {
                        VectorIndexError::Corrupted(format!("missing text for chunk {}", chunk_id))
                    })
            })
            .collect()
    }

    async fn count(&self) -> Result<usize, VectorIndexError> {
        Ok(self.state.read().await.entries.len())
    }

    async fn dimension(&self) -> Option<usize> {
        self.state.read().await.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn source(&self) -> Option<IndexSource> {
        self.state.read().await.source.clone()
    }

    async fn persist(&self, dir: &Path, source: &IndexSource) -> Result<(), VectorIndexError> {
        let mut state = self.state.write().await;
        let dimension = state.dimension.ok_or_else(|| {
            VectorIndexError::Corrupted("cannot persist an empty index".to_string())
        })?;

        let index = IndexFile {
            manifest: IndexManifest {
                format_version: FORMAT_VERSION,
                model_name: self.model_name.clone(),
                dimension,
                created_at: Utc::now(),
                source: source.clone(),
                entry_count: state.entries.len(),
            },
            entries: state.entries.clone(),
        };
        let docstore = DocStoreFile {
            chunks: state.chunks.values().cloned().collect(),
        };

        write_index_dir(dir, &index, &docstore).await?;
        state.source = Some(source.clone());

        info!(
            "Saved {} vectors to {}",
            index.manifest.entry_count,
            dir.display()
        );
        Ok(())
    }
}
