//! Persistent vector index over document chunks
//!
//! The index is a single JSON file (`index.json`) inside the configured index
//! directory: a metadata header describing how it was built followed by every
//! chunk with its embedding. Once loaded it is never mutated, so it can be
//! shared between requests behind an `Arc` without locking.

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::INDEX_FILE_NAME;
use crate::embeddings::Embedder;
use crate::errors::RabotError;
use crate::errors::Result;
use crate::models::RetrievedChunk;

/// How an index was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub embedding_model: String,
    pub dimension: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// SHA-256 of the extracted document text
    pub source_sha256: String,
    pub chunk_count: usize,
    pub built_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Chunking parameters and source fingerprint recorded with a new index
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub source_sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    metadata: IndexMetadata,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed every chunk and assemble an index
    ///
    /// # Errors
    /// - No chunks to index
    /// - Embedding failures, or embeddings of inconsistent length
    pub async fn build(chunks: Vec<String>, embedder: &dyn Embedder, info: BuildInfo) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RabotError::IndexError(
                "no text chunks to index (is the document empty?)".to_string(),
            ));
        }

        info!(
            "Embedding {} chunks with {}",
            chunks.len(),
            embedder.model_name()
        );
        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RabotError::EmbeddingError(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimension = embeddings.first().map_or(0, Vec::len);
        if dimension == 0 || embeddings.iter().any(|e| e.len() != dimension) {
            return Err(RabotError::EmbeddingError(
                "embedder returned vectors of inconsistent dimension".to_string(),
            ));
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| IndexEntry { text, embedding })
            .collect();

        let metadata = IndexMetadata {
            embedding_model: embedder.model_name().to_string(),
            dimension,
            chunk_size: info.chunk_size,
            chunk_overlap: info.chunk_overlap,
            source_sha256: info.source_sha256,
            chunk_count: entries.len(),
            built_at: Utc::now(),
        };

        Ok(Self { metadata, entries })
    }

    /// Path of the index file inside `dir`
    #[must_use]
    pub fn file_path(dir: &Path) -> PathBuf {
        dir.join(INDEX_FILE_NAME)
    }

    /// Whether a persisted index exists in `dir`
    #[must_use]
    pub fn exists(dir: &Path) -> bool {
        Self::file_path(dir).is_file()
    }

    /// Write the index to `dir`, replacing any previous one
    ///
    /// The file is written next to the target and renamed into place, so a
    /// reader never sees a half-written index.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = Self::file_path(dir);
        let tmp_path = dir.join(format!("{INDEX_FILE_NAME}.tmp"));

        {
            let writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(writer, self)?;
        }
        std::fs::rename(&tmp_path, &path)?;

        info!(
            "Saved vector index with {} chunks to {}",
            self.entries.len(),
            path.display()
        );
        Ok(path)
    }

    /// Load the index persisted in `dir`
    ///
    /// # Errors
    /// - `IndexNotFound` when no index has been built
    /// - `IndexError` when the file is inconsistent with its own metadata
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::file_path(dir);
        if !path.is_file() {
            return Err(RabotError::IndexNotFound(dir.to_path_buf()));
        }

        let reader = BufReader::new(File::open(&path)?);
        let index: Self = serde_json::from_reader(reader)
            .map_err(|e| RabotError::IndexError(format!("{}: {e}", path.display())))?;

        if let Some(bad) = index
            .entries
            .iter()
            .position(|e| e.embedding.len() != index.metadata.dimension)
        {
            return Err(RabotError::IndexError(format!(
                "entry {bad} has {} dimensions, index declares {}",
                index.entries[bad].embedding.len(),
                index.metadata.dimension
            )));
        }

        debug!(
            "Loaded vector index: {} chunks, model {}",
            index.entries.len(),
            index.metadata.embedding_model
        );
        Ok(index)
    }

    /// Warn when the index was built with a different embedding model
    pub fn check_model(&self, model_name: &str) {
        if self.metadata.embedding_model != model_name {
            warn!(
                "Vector index was built with '{}' but queries use '{}'; rebuild with `rabot index --force`",
                self.metadata.embedding_model, model_name
            );
        }
    }

    /// The `k` chunks most similar to `query`, best first
    ///
    /// Ties keep index order. Fewer than `k` results are returned when the
    /// index is smaller than `k`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if query.len() != self.metadata.dimension {
            return Err(RabotError::IndexError(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.metadata.dimension
            )));
        }

        let mut scored: Vec<RetrievedChunk> = self
            .entries
            .iter()
            .map(|entry| RetrievedChunk {
                text: entry.text.clone(),
                score: cosine_similarity(&entry.embedding, query),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    #[must_use]
    pub const fn metadata(&self) -> &IndexMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity; 0.0 if either vector has zero magnitude
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Hex SHA-256 of `text`
#[must_use]
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
