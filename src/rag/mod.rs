//! Question answering over the indexed profile
//!
//! A question goes through two model calls:
//! - the [`QuestionValidator`] decides whether it is a legitimate question
//!   about the subject
//! - the [`ProfileAnswerer`] retrieves the closest chunks and answers in first
//!   person from them, or returns a guidance message for rejected questions
//!
//! The [`Orchestrator`] sequences both and keeps the query history.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rabot::config::AppConfig;
//! use rabot::rag::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let orchestrator = Orchestrator::load(&config).await?;
//!
//!     let result = orchestrator.process_query("What are your skills?").await?;
//!     println!("Answer: {}", result.retrieval.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod answerer;
pub mod context;
pub mod orchestrator;
pub mod retriever;
#[cfg(test)]
pub(crate) mod testing;
pub mod validator;

pub use answerer::ProfileAnswerer;
pub use context::ContextAssembler;
pub use orchestrator::Orchestrator;
pub use retriever::Retriever;
pub use validator::parse_validation_response;
pub use validator::QuestionValidator;
