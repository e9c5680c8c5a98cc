//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use crate::errors::RabotError;

    // ====== Error Type Tests ======

    #[test]
    fn test_custom_error() {
        let error = RabotError::Custom("Test error message".to_string());
        assert_eq!(format!("{error}"), "Test error message");
    }

    #[test]
    fn test_config_error() {
        let error = RabotError::ConfigError("chunk_overlap must be smaller".to_string());
        assert!(matches!(error, RabotError::ConfigError(_)));
        assert!(format!("{error}").contains("Configuration"));
    }

    #[test]
    fn test_missing_api_key_mentions_env_var() {
        let display = format!("{}", RabotError::MissingApiKey);
        assert!(display.contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_index_not_found_tells_operator_what_to_run() {
        let error = RabotError::IndexNotFound(PathBuf::from("vector_store/index"));
        let display = format!("{error}");
        assert!(display.contains("vector_store/index"));
        assert!(display.contains("rabot index"));
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: RabotError = io_err.into();
        assert!(matches!(err, RabotError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_result: Result<serde_json::Value, _> = serde_json::from_str("{invalid json}");
        let err: RabotError = parse_result.unwrap_err().into();
        assert!(matches!(err, RabotError::Serialization(_)));
    }

    // ====== Classification Tests ======

    #[test]
    fn test_startup_fatal_classification() {
        assert!(RabotError::MissingApiKey.is_startup_fatal());
        assert!(RabotError::IndexNotFound(PathBuf::from("x")).is_startup_fatal());
        assert!(RabotError::ConfigError("bad".to_string()).is_startup_fatal());

        assert!(!RabotError::HttpError("timeout".to_string()).is_startup_fatal());
        assert!(!RabotError::LlmError("500".to_string()).is_startup_fatal());
        assert!(!RabotError::EmbeddingError("dim".to_string()).is_startup_fatal());
    }

    // ====== Error Chain Tests ======

    #[test]
    fn test_error_source_chain() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        match RabotError::from(io_err) {
            RabotError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_result_and_then() {
        let result: crate::Result<i32> = Ok(42);
        let chained = result.and_then(|v| {
            if v > 40 {
                Ok(v + 10)
            } else {
                Err(RabotError::Custom("Too small".to_string()))
            }
        });
        assert_eq!(chained.unwrap(), 52);
    }
}
