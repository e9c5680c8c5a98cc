//! Question validation
//!
//! The model is asked for a JSON verdict. Its reply is parsed leniently (the
//! outermost `{...}` span is extracted from whatever prose surrounds it) but
//! fails closed: anything that cannot be read as a verdict becomes
//! [`ValidationResult::parse_failure`], i.e. the question is treated as invalid.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::errors::Result;
use crate::llm::LanguageModel;
use crate::llm::ProfilePrompts;
use crate::models::QuestionCategory;
use crate::models::ValidationResult;

/// Confidence assumed when the verdict omits it
const DEFAULT_CONFIDENCE: f64 = 0.5;

pub struct QuestionValidator {
    llm: Arc<dyn LanguageModel>,
    prompts: ProfilePrompts,
}

impl QuestionValidator {
    pub fn new(llm: Arc<dyn LanguageModel>, prompts: ProfilePrompts) -> Self {
        Self { llm, prompts }
    }

    /// Ask the model whether `question` is a legitimate question about the subject
    ///
    /// # Errors
    /// Only transport failures from the model call; unparseable replies are
    /// mapped to the fail-closed verdict instead.
    pub async fn validate(&self, question: &str) -> Result<ValidationResult> {
        let prompt = self.prompts.validation_prompt(question);
        let raw = self.llm.generate(&prompt).await?;
        debug!("Validator raw response: {}", raw);

        let result = parse_validation_response(&raw);
        info!(
            "Validation: is_valid={} category={} confidence={:.2}",
            result.is_valid, result.category, result.confidence
        );
        Ok(result)
    }
}

/// Interpret a raw model reply as a verdict
#[must_use]
pub fn parse_validation_response(raw: &str) -> ValidationResult {
    let Some(json) = extract_json_object(raw) else {
        warn!("No JSON object in validator response");
        return ValidationResult::parse_failure();
    };

    let value: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            warn!("Malformed validator JSON: {}", e);
            return ValidationResult::parse_failure();
        }
    };

    let Some(is_valid) = value.get("is_valid").and_then(Value::as_bool) else {
        warn!("Validator JSON has no boolean is_valid");
        return ValidationResult::parse_failure();
    };

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0) as f32;

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let category = match value.get("category").and_then(Value::as_str) {
        Some(name) => QuestionCategory::parse(name).unwrap_or_else(|| {
            warn!("Unknown question category '{}'", name);
            fallback_category(is_valid)
        }),
        None => fallback_category(is_valid),
    };

    ValidationResult {
        is_valid,
        confidence,
        reason,
        category,
    }
}

/// From the first `{` to the last `}`, inclusive
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

const fn fallback_category(is_valid: bool) -> QuestionCategory {
    if is_valid {
        QuestionCategory::General
    } else {
        QuestionCategory::Invalid
    }
}
