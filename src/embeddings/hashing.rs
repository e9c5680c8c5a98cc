//! Deterministic feature-hashing embedder
//!
//! Lowercased alphanumeric tokens are hashed into a fixed number of buckets
//! with a signed count, then the vector is L2-normalised. Texts sharing words
//! end up close under cosine similarity. Needs no network or model weights,
//! which makes it the provider used by tests and offline setups.

use std::hash::Hasher;

use async_trait::async_trait;
use twox_hash::XxHash64;

use super::Embedder;
use crate::errors::Result;

/// Name recorded in index metadata for hash embeddings
pub const HASH_MODEL_NAME: &str = "feature-hash";

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
    model_name: String,
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            model_name: format!("{HASH_MODEL_NAME}-{dimension}"),
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.to_lowercase().as_bytes());
            let hash = hasher.finish();

            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
