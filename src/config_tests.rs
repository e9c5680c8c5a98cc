//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::*;
    use crate::RabotError;

    /// The `config` crate picks the file format from the extension
    fn toml_file() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.llm.api_key = "gsk_test_key_1234".to_string();
        config
    }

    // ====== Default Value Tests ======

    #[test]
    fn test_rag_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.chunk_size(), 500);
        assert_eq!(config.chunk_overlap(), 100);
        assert_eq!(config.top_k(), 3);
    }

    #[test]
    fn test_llm_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.llm_model(), "llama-3.1-8b-instant");
        assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.llm.max_tokens, 256);
        assert!(config.llm_key().is_empty());
    }

    #[test]
    fn test_embedding_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.embedding_provider(), EmbeddingProviderKind::Local);
        assert_eq!(
            config.embedding_model(),
            "sentence-transformers/all-MiniLM-L6-v2"
        );
    }

    #[test]
    fn test_index_file_lives_in_index_dir() {
        let config = AppConfig::default();
        assert_eq!(
            config.index_file(),
            std::path::Path::new("vector_store/index").join(INDEX_FILE_NAME)
        );
    }

    // ====== TOML Parsing Tests ======

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = toml_file();
        writeln!(
            file,
            r#"
[profile]
subject_name = "Ada"

[rag]
top_k = 5

[embeddings]
provider = "hash"
dimension = 64
"#
        )
        .unwrap();

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.subject_name(), "Ada");
        assert_eq!(config.top_k(), 5);
        assert_eq!(config.chunk_size(), 500);
        assert_eq!(config.embedding_provider(), EmbeddingProviderKind::Hash);
        assert_eq!(config.embeddings.dimension, 64);
        assert_eq!(config.llm_model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_openai_provider_name() {
        let config: AppConfig = toml::from_str("[embeddings]\nprovider = \"openai\"\n").unwrap();
        assert_eq!(config.embedding_provider(), EmbeddingProviderKind::OpenAI);
        assert_eq!(config.embedding_provider().to_string(), "openai");
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let result = AppConfig::load_from(Some(std::path::Path::new("/nonexistent/rabot/config.toml")));
        assert!(matches!(result, Err(RabotError::Config(_))));
        assert!(result.unwrap_err().is_startup_fatal());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = toml_file();
        writeln!(file, "[rag\ntop_k = ").unwrap();
        let result = AppConfig::load_from(Some(file.path()));
        assert!(matches!(result, Err(RabotError::Config(_))));
    }

    // ====== API Key Tests ======

    #[test]
    fn test_api_key_fallback_applies_when_unset() {
        let mut config = AppConfig::default();
        config.apply_api_key_fallback(Some("gsk_from_env".to_string()));
        assert_eq!(config.llm_key(), "gsk_from_env");
    }

    #[test]
    fn test_api_key_fallback_does_not_override() {
        let mut config = valid_config();
        config.apply_api_key_fallback(Some("gsk_other".to_string()));
        assert_eq!(config.llm_key(), "gsk_test_key_1234");
    }

    #[test]
    fn test_masked_key() {
        assert_eq!(valid_config().masked_llm_key(), "****1234");
        assert_eq!(AppConfig::default().masked_llm_key(), "(not set)");
    }

    // ====== Validation Tests ======

    #[test]
    fn test_validate_requires_api_key() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(RabotError::MissingApiKey)));
        // The indexer does not talk to the LLM
        assert!(config.validate_indexing().is_ok());
    }

    #[test]
    fn test_validate_accepts_defaults_with_key() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_overlap_not_smaller_than_size() {
        let mut config = valid_config();
        config.rag.chunk_overlap = config.rag.chunk_size;
        assert!(matches!(
            config.validate(),
            Err(RabotError::ConfigError(msg)) if msg.contains("chunk_overlap")
        ));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = valid_config();
        config.rag.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = valid_config();
        config.llm.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(RabotError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = valid_config();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hash_provider_needs_dimension() {
        let mut config = valid_config();
        config.embeddings.provider = EmbeddingProviderKind::Hash;
        config.embeddings.dimension = 0;
        assert!(config.validate_indexing().is_err());
    }
}
