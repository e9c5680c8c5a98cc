//! Similarity search over the loaded vector index

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::models::RetrievedChunk;
use crate::vector_store::VectorIndex;

/// Embeds questions and looks up the nearest chunks
#[derive(Clone)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever returning `top_k` chunks per question
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        index.check_model(embedder.model_name());
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// The `top_k` most similar chunks, best first
    ///
    /// # Errors
    /// - Embedding failures
    /// - Query dimension not matching the index
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedChunk>> {
        debug!("Performing semantic search: {}", question);
        let query_embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&query_embedding, self.top_k)?;
        debug!(
            "Retrieved {} chunks (best score {:?})",
            results.len(),
            results.first().map(|r| r.score)
        );
        Ok(results)
    }
}
