//! Unit tests for data models
//!
//! Tests category parsing, serialization, and history statistics.

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::models::*;

    fn query(is_valid: bool, success: bool) -> QueryResult {
        let category = if is_valid {
            QuestionCategory::Skills
        } else {
            QuestionCategory::Invalid
        };
        QueryResult {
            query: "What are your skills?".to_string(),
            validation: ValidationResult {
                is_valid,
                confidence: 0.9,
                reason: String::new(),
                category,
            },
            retrieval: RetrievalResult {
                success,
                answer: "Rust".to_string(),
                reason: String::new(),
                context_retrieved: Vec::new(),
            },
            success,
            timestamp: Utc::now(),
        }
    }

    // ====== Category Tests ======

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(
            QuestionCategory::parse("Skills"),
            Some(QuestionCategory::Skills)
        );
        assert_eq!(
            QuestionCategory::parse(" EDUCATION "),
            Some(QuestionCategory::Education)
        );
        assert_eq!(QuestionCategory::parse("hobbies"), None);
        assert_eq!(QuestionCategory::parse(""), None);
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in QuestionCategory::ALL {
            assert_eq!(QuestionCategory::parse(category.as_str()), Some(category));
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&QuestionCategory::Achievements).unwrap();
        assert_eq!(json, "\"achievements\"");
        let parsed: QuestionCategory = serde_json::from_str("\"career\"").unwrap();
        assert_eq!(parsed, QuestionCategory::Career);
    }

    // ====== Validation Result Tests ======

    #[test]
    fn test_parse_failure_is_fail_closed() {
        let result = ValidationResult::parse_failure();
        assert!(!result.is_valid);
        assert!((result.confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(result.reason, "parse failure");
        assert_eq!(result.category, QuestionCategory::Invalid);
    }

    // ====== Stats Tests ======

    #[test]
    fn test_stats_from_empty_history() {
        let stats = QueryStats::from_history(&[], "HR Assistant");
        assert_eq!(stats.total_queries, 0);
        assert_eq!(stats.valid_queries, 0);
        assert_eq!(stats.successful_queries, 0);
        assert_eq!(stats.system_name, "HR Assistant");
    }

    #[test]
    fn test_stats_counts() {
        let history = vec![query(true, true), query(false, false), query(true, true)];
        let stats = QueryStats::from_history(&history, "HR Assistant");
        assert_eq!(stats.total_queries, 3);
        assert_eq!(stats.valid_queries, 2);
        assert_eq!(stats.successful_queries, 2);
    }
}
