//! In-process sentence-transformer embeddings
//!
//! Runs a BERT-family model (all-MiniLM-L6-v2 by default) on the CPU with
//! candle. Weights are fetched from the HuggingFace hub on first use and cached
//! by `hf-hub`. Only compiled with the `local-embeddings` feature; without it
//! the provider reports a configuration error.

#[cfg(feature = "local-embeddings")]
use std::sync::Arc;

#[cfg(feature = "local-embeddings")]
use async_trait::async_trait;
#[cfg(feature = "local-embeddings")]
use candle_core::DType;
#[cfg(feature = "local-embeddings")]
use candle_core::Device;
#[cfg(feature = "local-embeddings")]
use candle_core::Tensor;
#[cfg(feature = "local-embeddings")]
use candle_nn::VarBuilder;
#[cfg(feature = "local-embeddings")]
use candle_transformers::models::bert::BertModel;
#[cfg(feature = "local-embeddings")]
use candle_transformers::models::bert::Config;
#[cfg(feature = "local-embeddings")]
use hf_hub::api::sync::Api;
#[cfg(feature = "local-embeddings")]
use tokenizers::Tokenizer;
#[cfg(feature = "local-embeddings")]
use tokenizers::TruncationParams;
#[cfg(feature = "local-embeddings")]
use tracing::debug;
#[cfg(feature = "local-embeddings")]
use tracing::info;

#[cfg(feature = "local-embeddings")]
use super::Embedder;
use crate::errors::RabotError;
use crate::errors::Result;

/// Longest token sequence fed to the model; MiniLM was trained on 256
pub const MAX_SEQUENCE_LENGTH: usize = 256;

/// Inference runs on tokio's blocking pool, so the weights are shared
#[cfg(feature = "local-embeddings")]
pub struct LocalEmbedder {
    model: Arc<SentenceModel>,
    model_name: String,
}

#[cfg(feature = "local-embeddings")]
struct SentenceModel {
    bert: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

#[cfg(feature = "local-embeddings")]
impl LocalEmbedder {
    /// Download (or reuse the cached copy of) `model_name` and load it on the CPU
    pub fn new(model_name: &str) -> Result<Self> {
        info!("Loading local embedding model: {}", model_name);
        let device = Device::Cpu;

        let api = Api::new().map_err(embedding_error)?;
        let repo = api.model(model_name.to_string());
        let config_path = repo.get("config.json").map_err(embedding_error)?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(embedding_error)?;
        let weights_path = repo.get("model.safetensors").map_err(embedding_error)?;

        let config: Config = serde_json::from_str(&std::fs::read_to_string(&config_path)?)
            .map_err(|e| RabotError::EmbeddingError(format!("Failed to parse config: {e}")))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| RabotError::EmbeddingError(format!("Failed to load tokenizer: {e}")))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(embedding_error)?;

        let weights = candle_core::safetensors::load(&weights_path, &device).map_err(embedding_error)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)
            .map_err(|e| RabotError::EmbeddingError(format!("Failed to load model: {e}")))?;

        info!("Local embedding model ready: {}", model_name);
        Ok(Self {
            model: Arc::new(SentenceModel {
                bert: model,
                tokenizer,
                device,
            }),
            model_name: model_name.to_string(),
        })
    }

    /// Run `job` against the model without holding up an async worker
    async fn run_blocking<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SentenceModel) -> Result<T> + Send + 'static,
    {
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || job(model.as_ref()))
            .await
            .map_err(|e| RabotError::EmbeddingError(format!("local embedding task failed: {e}")))?
    }
}

#[cfg(feature = "local-embeddings")]
impl SentenceModel {
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self.tokenizer.encode(text, true).map_err(embedding_error)?;
        debug!("Embedding {} tokens", encoding.get_ids().len());
        self.forward(encoding.get_ids(), encoding.get_attention_mask())
            .map_err(embedding_error)
    }

    /// Mean-pool the last hidden state over real tokens, then L2-normalise
    fn forward(&self, ids: &[u32], attention_mask: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let mask = Tensor::new(attention_mask, &self.device)?.unsqueeze(0)?;

        let hidden = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&mask))?;

        let mask = mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?;

        let norm = pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
        pooled.broadcast_div(&norm)?.squeeze(0)?.to_vec1::<f32>()
    }
}

#[cfg(feature = "local-embeddings")]
#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.to_string();
        self.run_blocking(move |model| model.embed_one(&text)).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let texts: Vec<String> = texts.iter().map(|t| (*t).to_string()).collect();
        self.run_blocking(move |model| texts.iter().map(|text| model.embed_one(text)).collect())
            .await
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(feature = "local-embeddings")]
fn embedding_error(e: impl std::fmt::Display) -> RabotError {
    RabotError::EmbeddingError(e.to_string())
}

/// Stand-in used when the crate is built without `local-embeddings`
#[cfg(not(feature = "local-embeddings"))]
pub struct LocalEmbedder;

#[cfg(not(feature = "local-embeddings"))]
impl LocalEmbedder {
    pub fn new(_model_name: &str) -> Result<Self> {
        Err(feature_disabled())
    }
}

#[cfg(not(feature = "local-embeddings"))]
#[async_trait::async_trait]
impl super::Embedder for LocalEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(feature_disabled())
    }

    fn model_name(&self) -> &str {
        "unavailable"
    }
}

#[cfg(not(feature = "local-embeddings"))]
fn feature_disabled() -> RabotError {
    RabotError::ConfigError(
        "The local embedding provider requires the `local-embeddings` feature. \
         Rebuild with it enabled or set embeddings.provider to openai, ollama or hash"
            .to_string(),
    )
}
