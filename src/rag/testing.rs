//! Scripted language model and counting embedder for unit tests

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::embeddings::Embedder;
use crate::embeddings::HashEmbedder;
use crate::errors::RabotError;
use crate::errors::Result;
use crate::llm::LanguageModel;

/// Replies with canned responses in order and records every prompt
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl ScriptedModel {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(ToString::to_string).collect()),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A model whose every call fails like an unreachable endpoint
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(RabotError::HttpError("connection refused".to_string()));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RabotError::LlmError("no scripted reply left".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Feature-hash embedder that counts how many texts it was asked to embed
pub struct CountingEmbedder {
    inner: HashEmbedder,
    texts: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dimension),
            texts: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.texts.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.texts.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
