use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Prefix for environment overrides, e.g. `RABOT__RAG__TOP_K=5`
pub const ENV_PREFIX: &str = "RABOT";

/// Provider-specific variable accepted as the LLM key when no `RABOT__LLM__API_KEY` is set
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Config file looked up (as `config.toml`) in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// File name of the serialized index inside `storage.index_dir`
pub const INDEX_FILE_NAME: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Name the assistant speaks as
    pub subject_name: String,
    pub system_name: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            subject_name: "Ravikumar".to_string(),
            system_name: "Ravikumar HR Assistant".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: "logs".to_string(),
            file_output: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.3,
            max_tokens: 256,
            timeout_secs: 60,
        }
    }
}

/// Backend used to turn text into vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Sentence-transformer weights run in-process
    Local,
    #[serde(rename = "openai")]
    OpenAI,
    Ollama,
    /// Deterministic feature hashing, no model download
    Hash,
}

impl std::fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
            Self::Hash => "hash",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    pub provider: EmbeddingProviderKind,
    pub model: String,
    /// Only used by the `openai` and `ollama` providers
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Only used by the `hash` provider
    pub dimension: usize,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Local,
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            dimension: 384,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Source document (.docx, .txt or .md)
    pub document_path: PathBuf,
    pub index_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("data/Ravi_Total.docx"),
            index_dir: PathBuf::from("vector_store/index"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub profile: ProfileConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub embeddings: EmbeddingsConfig,
    pub rag: RagConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml` (if present) and the environment
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of `config.toml` when given.
    ///
    /// Layers, later wins: built-in defaults, the file, `RABOT__SECTION__KEY`
    /// variables. A `.env` file in the working directory is read first.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        builder = match path {
            Some(path) => builder.add_source(::config::File::from(path).required(true)),
            None => builder.add_source(::config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let mut config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.apply_api_key_fallback(std::env::var(GROQ_API_KEY_VAR).ok());
        Ok(config)
    }

    /// Use `key` as the LLM key unless one is already configured
    pub fn apply_api_key_fallback(&mut self, key: Option<String>) {
        if self.llm.api_key.trim().is_empty() {
            if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
                self.llm.api_key = key;
            }
        }
    }

    /// Full check used before answering questions
    pub fn validate(&self) -> crate::Result<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(crate::RabotError::MissingApiKey);
        }
        url::Url::parse(&self.llm.endpoint).map_err(|e| {
            crate::RabotError::ConfigError(format!(
                "llm.endpoint '{}' is not a valid URL: {e}",
                self.llm.endpoint
            ))
        })?;
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::RabotError::ConfigError(format!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(crate::RabotError::ConfigError(
                "llm.max_tokens must be greater than 0".to_string(),
            ));
        }
        self.validate_indexing()
    }

    /// Check the settings the offline indexer depends on (no LLM key needed)
    pub fn validate_indexing(&self) -> crate::Result<()> {
        if self.rag.chunk_size == 0 {
            return Err(crate::RabotError::ConfigError(
                "rag.chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(crate::RabotError::ConfigError(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(crate::RabotError::ConfigError(
                "rag.top_k must be at least 1".to_string(),
            ));
        }
        match self.embeddings.provider {
            EmbeddingProviderKind::OpenAI | EmbeddingProviderKind::Ollama => {
                url::Url::parse(&self.embeddings.endpoint).map_err(|e| {
                    crate::RabotError::ConfigError(format!(
                        "embeddings.endpoint '{}' is not a valid URL: {e}",
                        self.embeddings.endpoint
                    ))
                })?;
            }
            EmbeddingProviderKind::Hash if self.embeddings.dimension == 0 => {
                return Err(crate::RabotError::ConfigError(
                    "embeddings.dimension must be greater than 0".to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    /// Get profile subject name
    pub fn subject_name(&self) -> &str {
        &self.profile.subject_name
    }

    /// Get system display name
    pub fn system_name(&self) -> &str {
        &self.profile.system_name
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.api_key
    }

    /// Get LLM key with everything but the last four characters hidden
    pub fn masked_llm_key(&self) -> String {
        let key = self.llm.api_key.trim();
        if key.is_empty() {
            return "(not set)".to_string();
        }
        let visible: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{visible}")
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> EmbeddingProviderKind {
        self.embeddings.provider
    }

    /// Get chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.rag.chunk_size
    }

    /// Get overlap between consecutive chunks in characters
    pub fn chunk_overlap(&self) -> usize {
        self.rag.chunk_overlap
    }

    /// Get number of chunks retrieved per question
    pub fn top_k(&self) -> usize {
        self.rag.top_k
    }

    /// Get source document path
    pub fn document_path(&self) -> &Path {
        &self.storage.document_path
    }

    /// Get index directory
    pub fn index_dir(&self) -> &Path {
        &self.storage.index_dir
    }

    /// Get path of the serialized index file
    pub fn index_file(&self) -> PathBuf {
        self.storage.index_dir.join(INDEX_FILE_NAME)
    }
}
