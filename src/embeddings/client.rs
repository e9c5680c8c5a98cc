//! HTTP embedding clients (OpenAI-compatible and Ollama)

use async_trait::async_trait;
use futures::stream;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Embedder;
use super::MAX_BATCH_SIZE;
use crate::errors::RabotError;
use crate::errors::Result;

/// Remote embedding APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteProvider {
    /// `OpenAI` embeddings API, `POST {endpoint}/embeddings`
    OpenAI,
    /// Ollama, `POST {endpoint}/api/embeddings`
    Ollama,
}

/// Ollama has no batch endpoint; this many single requests run at once
const OLLAMA_CONCURRENCY: usize = 8;

/// Client for generating embeddings over HTTP
pub struct EmbeddingClient {
    provider: RemoteProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(
        provider: RemoteProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| RabotError::HttpError(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    #[must_use]
    pub const fn provider(&self) -> RemoteProvider {
        self.provider
    }

    /// POST `body` as JSON to `{endpoint}{path}` and decode the JSON reply
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.endpoint);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RabotError::EmbeddingError(format!(
                "{:?} embeddings request to {url} failed ({status}): {detail}",
                self.provider
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RabotError::EmbeddingError(format!("unreadable embeddings response: {e}")))
    }

    /// One `/embeddings` call for up to [`MAX_BATCH_SIZE`] texts, in input order
    async fn embed_openai(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if self.api_key.is_none() {
            return Err(RabotError::ConfigError(
                "embeddings.api_key is required for the openai provider".to_string(),
            ));
        }
        debug!("Requesting {} OpenAI embeddings", texts.len());

        let mut reply: OpenAIEmbeddings = self
            .post_json(
                "/embeddings",
                &OpenAIRequest {
                    model: &self.model,
                    input: texts,
                },
            )
            .await?;

        if reply.data.len() != texts.len() {
            return Err(RabotError::EmbeddingError(format!(
                "asked for {} embeddings, received {}",
                texts.len(),
                reply.data.len()
            )));
        }
        reply.data.sort_by_key(|item| item.index);
        Ok(reply.data.into_iter().map(|item| item.embedding).collect())
    }

    async fn embed_ollama(&self, text: &str) -> Result<Vec<f32>> {
        let reply: OllamaEmbedding = self
            .post_json(
                "/api/embeddings",
                &OllamaRequest {
                    model: &self.model,
                    prompt: text,
                },
            )
            .await?;
        Ok(reply.embedding)
    }
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct OpenAIEmbeddings {
    data: Vec<OpenAIEmbedding>,
}

#[derive(Deserialize)]
struct OpenAIEmbedding {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbedding {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            RemoteProvider::OpenAI => self
                .embed_openai(&[text])
                .await?
                .pop()
                .ok_or_else(|| RabotError::EmbeddingError("empty embeddings response".to_string())),
            RemoteProvider::Ollama => self.embed_ollama(text).await,
        }
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        match self.provider {
            RemoteProvider::OpenAI => {
                let mut embeddings = Vec::with_capacity(texts.len());
                for batch in texts.chunks(MAX_BATCH_SIZE) {
                    embeddings.extend(self.embed_openai(batch).await?);
                }
                Ok(embeddings)
            }
            RemoteProvider::Ollama => {
                let requests: Vec<_> = texts.iter().map(|text| self.embed_ollama(text)).collect();
                // `buffered` keeps the input order
                let results: Vec<Result<Vec<f32>>> = stream::iter(requests)
                    .buffered(OLLAMA_CONCURRENCY)
                    .collect()
                    .await;

                results.into_iter().collect()
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
