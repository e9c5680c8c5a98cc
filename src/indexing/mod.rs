//! Offline indexing: document → chunks → embeddings → persisted vector index

pub mod document;
pub mod splitter;

use std::path::PathBuf;
use std::sync::Arc;

pub use document::extract_docx_text;
pub use document::load_document;
pub use splitter::RecursiveCharacterSplitter;
pub use splitter::TextSplitter;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::create_embedder;
use crate::embeddings::Embedder;
use crate::errors::RabotError;
use crate::errors::Result;
use crate::vector_store::sha256_hex;
use crate::vector_store::BuildInfo;
use crate::vector_store::VectorIndex;

/// Summary of a completed indexing run
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub document_path: PathBuf,
    pub index_path: PathBuf,
    pub characters: usize,
    pub chunk_count: usize,
    pub dimension: usize,
    pub embedding_model: String,
    pub source_sha256: String,
}

pub struct Indexer {
    config: AppConfig,
    embedder: Arc<dyn Embedder>,
    splitter: RecursiveCharacterSplitter,
}

impl Indexer {
    /// Build an indexer with the embedder selected by the configuration
    ///
    /// The embedder is created on the blocking pool since the local provider
    /// may download and load model weights.
    pub async fn load(config: &AppConfig) -> Result<Self> {
        config.validate_indexing()?;
        let embedder_config = config.clone();
        let embedder = tokio::task::spawn_blocking(move || create_embedder(&embedder_config))
            .await
            .map_err(|e| RabotError::EmbeddingError(format!("embedder initialisation panicked: {e}")))??;
        Self::new(config, embedder)
    }

    pub fn new(config: &AppConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let splitter = RecursiveCharacterSplitter::new(config.chunk_size(), config.chunk_overlap())?;
        Ok(Self {
            config: config.clone(),
            embedder,
            splitter,
        })
    }

    /// Whether an index already exists at the configured location
    #[must_use]
    pub fn index_exists(&self) -> bool {
        VectorIndex::exists(self.config.index_dir())
    }

    /// Split and embed `text` into an in-memory index
    pub async fn build_from_text(&self, text: &str) -> Result<VectorIndex> {
        let chunks = self.splitter.split_text(text);
        info!("Split document into {} chunks", chunks.len());

        VectorIndex::build(
            chunks,
            self.embedder.as_ref(),
            BuildInfo {
                chunk_size: self.splitter.chunk_size(),
                chunk_overlap: self.splitter.chunk_overlap(),
                source_sha256: sha256_hex(text),
            },
        )
        .await
    }

    /// Load the configured document, index it and persist the result,
    /// replacing any existing index
    pub async fn run(&self) -> Result<IndexReport> {
        let document_path = self.config.document_path().to_path_buf();
        info!("Indexing {}", document_path.display());

        let text = load_document(&document_path)?;
        let index = self.build_from_text(&text).await?;
        let index_path = index.save(self.config.index_dir())?;

        let metadata = index.metadata();
        Ok(IndexReport {
            document_path,
            index_path,
            characters: text.chars().count(),
            chunk_count: metadata.chunk_count,
            dimension: metadata.dimension,
            embedding_model: metadata.embedding_model.clone(),
            source_sha256: metadata.source_sha256.clone(),
        })
    }
}
