//! Query orchestration: validate → retrieve and answer → record

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::create_embedder;
use crate::embeddings::Embedder;
use crate::errors::RabotError;
use crate::errors::Result;
use crate::llm::LanguageModel;
use crate::llm::LlmService;
use crate::llm::ProfilePrompts;
use crate::models::QueryResult;
use crate::models::QueryStats;
use crate::rag::ProfileAnswerer;
use crate::rag::QuestionValidator;
use crate::rag::Retriever;
use crate::vector_store::IndexMetadata;
use crate::vector_store::VectorIndex;

/// Entry point for answering questions
///
/// Holds the read-only index and models, plus the in-memory history of every
/// processed question. The history lives as long as the process.
pub struct Orchestrator {
    system_name: String,
    validator: QuestionValidator,
    answerer: ProfileAnswerer,
    index: Arc<VectorIndex>,
    history: RwLock<Vec<QueryResult>>,
}

impl Orchestrator {
    /// Load the persisted index and connect the models
    ///
    /// # Errors
    /// - `MissingApiKey` or other configuration errors
    /// - `IndexNotFound` when the offline indexer has not been run
    /// - Embedding model load failures
    pub async fn load(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let index = Arc::new(VectorIndex::load(config.index_dir())?);
        info!(
            "Loaded vector index: {} chunks, {} dimensions",
            index.len(),
            index.metadata().dimension
        );

        // Model loading may download weights; keep it off the async workers
        let embedder_config = config.clone();
        let embedder = tokio::task::spawn_blocking(move || create_embedder(&embedder_config))
            .await
            .map_err(|e| RabotError::EmbeddingError(format!("embedder initialisation panicked: {e}")))??;

        let llm: Arc<dyn LanguageModel> = Arc::new(LlmService::new(config)?);
        info!("Using language model {}", llm.model_name());

        Ok(Self::from_parts(config, index, embedder, llm))
    }

    /// Assemble an orchestrator from already constructed parts
    pub fn from_parts(
        config: &AppConfig,
        index: Arc<VectorIndex>,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        let prompts = ProfilePrompts::new(config.subject_name());
        let retriever = Retriever::new(index.clone(), embedder, config.top_k());

        Self {
            system_name: config.system_name().to_string(),
            validator: QuestionValidator::new(llm.clone(), prompts.clone()),
            answerer: ProfileAnswerer::new(retriever, llm, prompts),
            index,
            history: RwLock::new(Vec::new()),
        }
    }

    /// Validate, answer, timestamp and record one question
    ///
    /// # Errors
    /// Transport failures from either model call. Nothing is recorded then.
    pub async fn process_query(&self, question: &str) -> Result<QueryResult> {
        info!("Processing query: {}", question);

        let validation = self.validator.validate(question).await?;
        let retrieval = self.answerer.answer(question, &validation).await?;

        let result = QueryResult {
            query: question.to_string(),
            success: retrieval.success,
            validation,
            retrieval,
            timestamp: Utc::now(),
        };

        self.history.write().await.push(result.clone());
        Ok(result)
    }

    /// All processed queries, oldest first
    pub async fn history(&self) -> Vec<QueryResult> {
        self.history.read().await.clone()
    }

    /// Empty the history, returning how many entries were removed
    pub async fn clear_history(&self) -> usize {
        let mut history = self.history.write().await;
        let removed = history.len();
        history.clear();
        info!("Query history cleared ({} entries)", removed);
        removed
    }

    pub async fn stats(&self) -> QueryStats {
        QueryStats::from_history(&self.history.read().await, &self.system_name)
    }

    #[must_use]
    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    #[must_use]
    pub fn index_metadata(&self) -> &IndexMetadata {
        self.index.metadata()
    }
}
