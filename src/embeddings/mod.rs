//! Embeddings generation module
//!
//! Text is turned into vectors by one of several providers, selected by
//! `embeddings.provider`:
//! - `local`: a sentence-transformer run in-process with candle (default)
//! - `openai`: any OpenAI-compatible `/embeddings` endpoint
//! - `ollama`: a local Ollama server
//! - `hash`: deterministic feature hashing, no model required
//!
//! # Examples
//!
//! ```rust,no_run
//! use rabot::config::AppConfig;
//! use rabot::embeddings::create_embedder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let embedder = create_embedder(&config)?;
//!
//!     let embedding = embedder.embed("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod hashing;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
pub use client::EmbeddingClient;
pub use client::RemoteProvider;
pub use hashing::HashEmbedder;
pub use local::LocalEmbedder;
use tracing::info;

use crate::config::AppConfig;
use crate::config::EmbeddingProviderKind;
use crate::errors::Result;

/// Maximum number of texts sent in one batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Turns text into a fixed-length vector
///
/// The same implementation (and model) must be used for indexing and for
/// queries, otherwise similarity scores are meaningless.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, preserving order
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Identifier stored alongside the index
    fn model_name(&self) -> &str;
}

/// Build the embedder selected by the configuration
///
/// # Errors
/// - `local` provider without the `local-embeddings` feature
/// - Model download or load failures
/// - HTTP client build errors
pub fn create_embedder(config: &AppConfig) -> Result<Arc<dyn Embedder>> {
    let embeddings = &config.embeddings;
    info!(
        "Using {} embeddings (model: {})",
        embeddings.provider, embeddings.model
    );

    let embedder: Arc<dyn Embedder> = match embeddings.provider {
        EmbeddingProviderKind::Local => Arc::new(LocalEmbedder::new(&embeddings.model)?),
        EmbeddingProviderKind::OpenAI => Arc::new(EmbeddingClient::new(
            RemoteProvider::OpenAI,
            embeddings.model.clone(),
            embeddings.endpoint.clone(),
            embeddings.api_key.clone(),
        )?),
        EmbeddingProviderKind::Ollama => Arc::new(EmbeddingClient::new(
            RemoteProvider::Ollama,
            embeddings.model.clone(),
            embeddings.endpoint.clone(),
            None,
        )?),
        EmbeddingProviderKind::Hash => Arc::new(HashEmbedder::new(embeddings.dimension)),
    };

    Ok(embedder)
}
