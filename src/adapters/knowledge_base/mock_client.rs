//! Scripted knowledge base client for tests and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{KnowledgeBaseClient, KnowledgeBaseError, KnowledgeBaseMatch, KnowledgeBaseTarget};

/// Returns queued results in order, then the fallback (no matches by
/// default). Records every question asked.
#[derive(Debug, Clone, Default)]
pub struct MockKnowledgeBaseClient {
    responses: Arc<Mutex<VecDeque<Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError>>>>,
    fallback: Vec<KnowledgeBaseMatch>,
    questions: Arc<Mutex<Vec<String>>>,
}

impl MockKnowledgeBaseClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every unscripted query with `matches`.
    pub fn answering(matches: Vec<KnowledgeBaseMatch>) -> Self {
        Self {
            fallback: matches,
            ..Self::default()
        }
    }

    pub fn with_matches(self, matches: Vec<KnowledgeBaseMatch>) -> Self {
        self.push(Ok(matches));
        self
    }

    pub fn with_error(self, error: KnowledgeBaseError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, result: Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(result);
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.questions.lock().map(|q| q.len()).unwrap_or_default()
    }
}

#[async_trait]
impl KnowledgeBaseClient for MockKnowledgeBaseClient {
    async fn query(
        &self,
        _target: &KnowledgeBaseTarget,
        question: &str,
    ) -> Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }

        let scripted = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front());

        scripted.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
