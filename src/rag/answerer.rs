//! Retrieve-and-answer stage

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use crate::errors::Result;
use crate::llm::LanguageModel;
use crate::llm::ProfilePrompts;
use crate::models::RetrievalResult;
use crate::models::ValidationResult;
use crate::rag::ContextAssembler;
use crate::rag::Retriever;

/// Answers validated questions in the subject's voice from retrieved context
pub struct ProfileAnswerer {
    retriever: Retriever,
    context_assembler: ContextAssembler,
    llm: Arc<dyn LanguageModel>,
    prompts: ProfilePrompts,
}

impl ProfileAnswerer {
    pub fn new(retriever: Retriever, llm: Arc<dyn LanguageModel>, prompts: ProfilePrompts) -> Self {
        Self {
            retriever,
            context_assembler: ContextAssembler::default(),
            llm,
            prompts,
        }
    }

    /// Answer `question`, or return the guidance message if it was rejected.
    ///
    /// Rejected questions never reach the index or the model. Every accepted
    /// question gets a fresh lookup and a fresh generation call.
    ///
    /// # Errors
    /// - Embedding or index failures during retrieval
    /// - Transport failures from the model call
    pub async fn answer(&self, question: &str, validation: &ValidationResult) -> Result<RetrievalResult> {
        if !validation.is_valid {
            debug!("Question rejected, skipping retrieval");
            return Ok(RetrievalResult {
                success: false,
                answer: self.prompts.rejection_message(),
                reason: validation.reason.clone(),
                context_retrieved: Vec::new(),
            });
        }

        let chunks = self.retriever.retrieve(question).await?;
        let context = self.context_assembler.assemble(&chunks);
        info!(
            "Answering with {} chunks ({} characters of context)",
            chunks.len(),
            context.chars().count()
        );

        let prompt = self.prompts.answer_prompt(&context, question);
        let answer = self.llm.generate(&prompt).await?;

        Ok(RetrievalResult {
            success: true,
            answer: answer.trim().to_string(),
            reason: validation.reason.clone(),
            context_retrieved: self.context_assembler.previews(&chunks),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionCategory;
    use crate::rag::testing::CountingEmbedder;
    use crate::rag::testing::ScriptedModel;
    use crate::vector_store::sha256_hex;
    use crate::vector_store::BuildInfo;
    use crate::vector_store::VectorIndex;

    async fn answerer(
        chunks: Vec<String>,
        model: Arc<ScriptedModel>,
    ) -> (ProfileAnswerer, Arc<CountingEmbedder>) {
        let embedder = Arc::new(CountingEmbedder::new(128));
        let index = VectorIndex::build(
            chunks,
            embedder.as_ref(),
            BuildInfo {
                chunk_size: 500,
                chunk_overlap: 100,
                source_sha256: sha256_hex("test"),
            },
        )
        .await
        .unwrap();
        embedder.reset();
        let retriever = Retriever::new(Arc::new(index), embedder.clone(), 3);
        let answerer = ProfileAnswerer::new(retriever, model, ProfilePrompts::new("Ravikumar"));
        (answerer, embedder)
    }

    fn verdict(is_valid: bool) -> ValidationResult {
        ValidationResult {
            is_valid,
            confidence: 0.9,
            reason: "test verdict".to_string(),
            category: if is_valid {
                QuestionCategory::Skills
            } else {
                QuestionCategory::Invalid
            },
        }
    }

    #[tokio::test]
    async fn test_rejected_question_short_circuits() {
        let model = Arc::new(ScriptedModel::new(Vec::new()));
        let (answerer, embedder) = answerer(vec!["chunk".to_string()], model.clone()).await;

        let result = answerer.answer("Tell me a joke", &verdict(false)).await.unwrap();
        assert!(!result.success);
        assert!(result.context_retrieved.is_empty());
        assert!(result.answer.contains("What are your skills?"));
        assert_eq!(result.reason, "test verdict");
        assert_eq!(model.calls(), 0);
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_question_uses_top_k_previews() {
        let chunks: Vec<String> = (0..5)
            .map(|i| format!("Chunk number {i} about skills. {}", "x".repeat(300)))
            .collect();
        let model = Arc::new(ScriptedModel::new(vec!["  I know Rust.  "]));
        let (answerer, embedder) = answerer(chunks.clone(), model.clone()).await;

        let result = answerer.answer("What are your skills?", &verdict(true)).await.unwrap();
        assert!(result.success);
        assert_eq!(result.answer, "I know Rust.");
        assert_eq!(result.context_retrieved.len(), 3);
        for preview in &result.context_retrieved {
            assert!(preview.ends_with("..."));
            assert_eq!(preview.chars().count(), 203);
            let source = chunks
                .iter()
                .find(|c| c.starts_with(preview.trim_end_matches("...")))
                .unwrap();
            assert!(source.chars().count() > 200);
        }
        assert_eq!(model.calls(), 1);
        assert_eq!(embedder.calls(), 1);
    }

    #[tokio::test]
    async fn test_context_is_sent_to_model() {
        let model = Arc::new(ScriptedModel::new(vec!["answer"]));
        let (answerer, _) = answerer(
            vec!["I studied computer science.".to_string()],
            model.clone(),
        )
        .await;

        answerer
            .answer("What did you study?", &verdict(true))
            .await
            .unwrap();
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("About me:\nI studied computer science.\n"));
        assert!(prompt.contains("Question: What did you study?"));
    }

    #[tokio::test]
    async fn test_each_accepted_question_embeds_once() {
        let model = Arc::new(ScriptedModel::new(vec!["first", "second"]));
        let (answerer, embedder) = answerer(vec!["chunk".to_string()], model.clone()).await;

        answerer.answer("Who are you?", &verdict(true)).await.unwrap();
        answerer.answer("Tell me a joke", &verdict(false)).await.unwrap();
        answerer.answer("Who are you?", &verdict(true)).await.unwrap();

        assert_eq!(embedder.calls(), 2);
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let model = Arc::new(ScriptedModel::failing());
        let (answerer, _) = answerer(vec!["chunk".to_string()], model).await;
        assert!(answerer.answer("Who are you?", &verdict(true)).await.is_err());
    }
}
