//! RABOT: a question-answering assistant for one person's professional profile.
//!
//! An offline [`indexing::Indexer`] turns the profile document into an
//! embedded vector index. At runtime the [`rag::Orchestrator`] validates each
//! question with the language model, retrieves the closest chunks and answers
//! in the subject's voice.

pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod indexing;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod errors_tests;
#[cfg(test)]
mod models_tests;

pub use config::AppConfig;
pub use errors::*;
