use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Topic a question falls under, as judged by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Background,
    Skills,
    Experience,
    Education,
    Achievements,
    Career,
    General,
    Invalid,
}

impl QuestionCategory {
    pub const ALL: [Self; 8] = [
        Self::Background,
        Self::Skills,
        Self::Experience,
        Self::Education,
        Self::Achievements,
        Self::Career,
        Self::General,
        Self::Invalid,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Achievements => "achievements",
            Self::Career => "career",
            Self::General => "general",
            Self::Invalid => "invalid",
        }
    }

    /// Case-insensitive lookup; `None` for names outside the enumeration
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator verdict for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Always within [0, 1]
    pub confidence: f32,
    pub reason: String,
    pub category: QuestionCategory,
}

impl ValidationResult {
    pub const PARSE_FAILURE_REASON: &'static str = "parse failure";
    pub const PARSE_FAILURE_CONFIDENCE: f32 = 0.5;

    /// Fail-closed verdict used whenever the model output cannot be understood
    #[must_use]
    pub fn parse_failure() -> Self {
        Self {
            is_valid: false,
            confidence: Self::PARSE_FAILURE_CONFIDENCE,
            reason: Self::PARSE_FAILURE_REASON.to_string(),
            category: QuestionCategory::Invalid,
        }
    }
}

/// Chunk returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    /// Cosine similarity to the question
    pub score: f32,
}

/// Outcome of the retrieve-and-answer stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub success: bool,
    pub answer: String,
    pub reason: String,
    /// Previews of the chunks used as context
    pub context_retrieved: Vec<String>,
}

/// One processed question, as kept in the orchestrator history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub validation: ValidationResult,
    pub retrieval: RetrievalResult,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// Counters over the query history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStats {
    pub total_queries: usize,
    pub valid_queries: usize,
    pub successful_queries: usize,
    pub system_name: String,
}

impl QueryStats {
    #[must_use]
    pub fn from_history(history: &[QueryResult], system_name: &str) -> Self {
        Self {
            total_queries: history.len(),
            valid_queries: history.iter().filter(|q| q.validation.is_valid).count(),
            successful_queries: history.iter().filter(|q| q.success).count(),
            system_name: system_name.to_string(),
        }
    }
}
