//! Prompt templates for question validation and answering

use std::collections::HashMap;

use crate::models::QuestionCategory;

/// Template for generating prompts
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
    variables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Variable(String),
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let segments = parse_segments(&template.into());
        let mut variables: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Variable(name) = segment {
                if !variables.contains(name) {
                    variables.push(name.clone());
                }
            }
        }
        Self {
            segments,
            variables,
        }
    }

    /// Fill in the template with variables
    ///
    /// Values are inserted verbatim in one pass, so a value containing
    /// `{{name}}` is never expanded again. Placeholders without a value are
    /// kept as written.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => result.push_str(text),
                Segment::Variable(name) => match values.get(name.as_str()) {
                    Some(value) => result.push_str(value),
                    None => {
                        result.push_str("{{");
                        result.push_str(name);
                        result.push_str("}}");
                    }
                },
            }
        }
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Split a template into literal text and `{{name}}` placeholders
///
/// An unterminated `{{` or an empty `{{}}` stays literal text.
fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        let name = &after_open[..close];
        if name.is_empty() {
            text.push_str(&rest[..open + 4]);
        } else {
            text.push_str(&rest[..open]);
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Variable(name.to_string()));
        }
        rest = &after_open[close + 2..];
    }

    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

/// Example questions quoted to users whose question was rejected
pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "Tell me about your background",
    "What are your skills?",
    "What have you accomplished?",
];

const VALIDATION_TEMPLATE: &str = r#"You are {{subject}}'s chatbot. Your task is to check if the following question is a valid question about {{subject}}.

Question: {{question}}

Consider:
1. Is this a meaningful question?
2. Is it asking about {{subject}} or their profile?
3. Is it not abusive, offensive, or harmful?

Respond with a JSON object containing:
- is_valid: boolean (true if it's a valid question to ask about {{subject}})
- confidence: float (0-1)
- reason: brief explanation
- category: {{categories}}

Example valid questions:
- "Tell me about your background"
- "What are your skills?"
- "What have you accomplished?"
- "Who are you?"

Example invalid questions:
- "What's the weather?"
- "Tell me a joke"

Example response format:
{"is_valid": true, "confidence": 0.95, "reason": "Valid question about {{subject}}", "category": "background"}

Your validation response:"#;

const ANSWER_TEMPLATE: &str = r#"You are {{subject}}, answering a question about yourself. Using the provided personal data, answer the question accurately and professionally as if you are speaking about your own profile.

About me:
{{context}}

Question: {{question}}

Instructions:
1. Answer in first person (I, my, me) as {{subject}}
2. Base your answer ONLY on the provided context
3. Be professional, clear, and concise
4. If information is not available in my profile, say "I don't have that specific information available"
5. Speak naturally as if answering directly
6. Share relevant details from your experience, skills, and achievements

Your response as {{subject}}:"#;

/// Prompts speaking for one profile subject
#[derive(Debug, Clone)]
pub struct ProfilePrompts {
    subject: String,
    validation: PromptTemplate,
    answer: PromptTemplate,
}

impl ProfilePrompts {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            validation: PromptTemplate::new(VALIDATION_TEMPLATE),
            answer: PromptTemplate::new(ANSWER_TEMPLATE),
        }
    }

    /// Prompt asking the model to judge `question` and reply with JSON
    #[must_use]
    pub fn validation_prompt(&self, question: &str) -> String {
        let categories = QuestionCategory::ALL
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");

        let values = HashMap::from([
            ("subject", self.subject.as_str()),
            ("question", question),
            ("categories", categories.as_str()),
        ]);
        self.validation.render(&values)
    }

    /// Prompt asking the model to answer `question` in first person from `context` only
    #[must_use]
    pub fn answer_prompt(&self, context: &str, question: &str) -> String {
        let values = HashMap::from([
            ("subject", self.subject.as_str()),
            ("context", context),
            ("question", question),
        ]);
        self.answer.render(&values)
    }

    /// Fixed reply for questions the validator rejected
    #[must_use]
    pub fn rejection_message(&self) -> String {
        let examples = EXAMPLE_QUESTIONS
            .iter()
            .map(|q| format!("'{q}'"))
            .collect::<Vec<_>>();
        format!(
            "❓ Please ask me a valid question about {}. For example: {}, {}, or {}",
            self.subject, examples[0], examples[1], examples[2]
        )
    }
}
