//! Content search - the free-text fallback chain of a 1:1 chat.
//!
//! Strategies run in order and the first one that finds something wins.
//! A strategy never fails: collaborator errors are logged and count as
//! "nothing found", so the router can always answer.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use secrecy::SecretString;
use std::sync::Arc;

use crate::domain::cards::OutboundMessage;
use crate::domain::routing::{normalize_text, rank_by_tags, HelpTile};
use crate::ports::{
    ConfigurationKey, ConfigurationStore, KnowledgeBaseClient, KnowledgeBaseMatch,
    KnowledgeBaseTarget, TagIndex,
};

/// What a successful lookup found.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Best knowledge-base answer.
    Answer(KnowledgeBaseMatch),
    /// Highest-scoring help tiles, in index order.
    Tiles(Vec<HelpTile>),
}

impl SearchOutcome {
    pub fn into_message(self, user_question: &str) -> OutboundMessage {
        match self {
            SearchOutcome::Answer(hit) => OutboundMessage::Answer {
                user_question: user_question.to_string(),
                question: hit.question,
                answer: hit.answer,
            },
            SearchOutcome::Tiles(tiles) => OutboundMessage::SuggestedLinks {
                user_question: user_question.to_string(),
                tiles,
            },
        }
    }
}

/// One step of the search chain.
#[async_trait]
pub trait LookupStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns `None` when nothing was found or the backend failed.
    async fn lookup(&self, text: &str) -> Option<SearchOutcome>;
}

/// Asks the knowledge base, with the id and key read from the
/// configuration store on every query.
pub struct KnowledgeBaseLookup {
    config: Arc<dyn ConfigurationStore>,
    client: Arc<dyn KnowledgeBaseClient>,
}

impl KnowledgeBaseLookup {
    pub fn new(config: Arc<dyn ConfigurationStore>, client: Arc<dyn KnowledgeBaseClient>) -> Self {
        Self { config, client }
    }

    async fn target(&self) -> Option<KnowledgeBaseTarget> {
        let id = self.setting(ConfigurationKey::KnowledgeBaseId).await?;
        let key = self.setting(ConfigurationKey::KnowledgeBaseEndpointKey).await?;
        Some(KnowledgeBaseTarget {
            knowledge_base_id: id,
            endpoint_key: SecretString::new(key),
        })
    }

    async fn setting(&self, key: ConfigurationKey) -> Option<String> {
        match self.config.get(key).await {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                tracing::warn!(key = %key, "Knowledge base setting is missing");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read knowledge base setting");
                None
            }
        }
    }
}

#[async_trait]
impl LookupStrategy for KnowledgeBaseLookup {
    fn name(&self) -> &'static str {
        "knowledge_base"
    }

    async fn lookup(&self, text: &str) -> Option<SearchOutcome> {
        let question = text.trim();
        if question.is_empty() {
            return None;
        }

        let target = self.target().await?;

        match self.client.query(&target, question).await {
            Ok(matches) => {
                tracing::info!(
                    answers = matches.len(),
                    top_score = matches.first().map(|m| m.score).unwrap_or_default(),
                    "Knowledge base answered"
                );
                matches.into_iter().next().map(SearchOutcome::Answer)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Knowledge base lookup failed");
                None
            }
        }
    }
}

/// Scores the help tiles by tag overlap.
pub struct TagLookup {
    index: Arc<dyn TagIndex>,
}

impl TagLookup {
    pub fn new(index: Arc<dyn TagIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl LookupStrategy for TagLookup {
    fn name(&self) -> &'static str {
        "tags"
    }

    async fn lookup(&self, text: &str) -> Option<SearchOutcome> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            tracing::debug!("Input message is empty");
            return None;
        }

        let tiles = match self.index.list_entities().await {
            Ok(tiles) => tiles,
            Err(e) => {
                tracing::warn!(error = %e, "Tag index lookup failed");
                return None;
            }
        };

        let ranked = rank_by_tags(&normalized, tiles);
        tracing::info!(
            matched = ranked.len(),
            score = ranked.first().map(|s| s.score).unwrap_or_default(),
            "Tag search finished"
        );

        if ranked.is_empty() {
            None
        } else {
            Some(SearchOutcome::Tiles(
                ranked.into_iter().map(|s| s.tile).collect(),
            ))
        }
    }
}

/// Ordered chain of lookup strategies.
#[derive(Clone)]
pub struct ContentSearch {
    strategies: Vec<Arc<dyn LookupStrategy>>,
}

impl ContentSearch {
    pub fn new(strategies: Vec<Arc<dyn LookupStrategy>>) -> Self {
        Self { strategies }
    }

    /// Knowledge base first, then tags.
    pub fn standard(
        config: Arc<dyn ConfigurationStore>,
        client: Arc<dyn KnowledgeBaseClient>,
        index: Arc<dyn TagIndex>,
    ) -> Self {
        Self::new(vec![
            Arc::new(KnowledgeBaseLookup::new(config, client)),
            Arc::new(TagLookup::new(index)),
        ])
    }

    /// Runs the strategies in order; later ones are not consulted once
    /// one has found something.
    pub async fn search(&self, text: &str) -> Option<SearchOutcome> {
        let found = stream::iter(self.strategies.iter()).filter_map(|strategy| async move {
            let outcome = strategy.lookup(text).await;
            tracing::debug!(strategy = strategy.name(), found = outcome.is_some(), "Lookup done");
            outcome
        });
        futures::pin_mut!(found);
        found.next().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use crate::ports::{KnowledgeBaseError, TagIndexError};
    use std::sync::Mutex;

    struct MockConfig {
        configured: bool,
    }

    #[async_trait]
    impl ConfigurationStore for MockConfig {
        async fn get(&self, key: ConfigurationKey) -> Result<Option<String>, DomainError> {
            if !self.configured {
                return Ok(None);
            }
            Ok(Some(format!("{}-value", key)))
        }
    }

    struct MockKnowledgeBase {
        result: Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError>,
        calls: Mutex<Vec<String>>,
    }

    impl MockKnowledgeBase {
        fn new(result: Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl KnowledgeBaseClient for MockKnowledgeBase {
        async fn query(
            &self,
            target: &KnowledgeBaseTarget,
            question: &str,
        ) -> Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError> {
            assert_eq!(target.knowledge_base_id, "KnowledgeBaseId-value");
            self.calls.lock().unwrap().push(question.to_string());
            self.result.clone()
        }
    }

    struct MockTags {
        result: Result<Vec<HelpTile>, TagIndexError>,
        calls: Mutex<usize>,
    }

    impl MockTags {
        fn new(result: Result<Vec<HelpTile>, TagIndexError>) -> Self {
            Self {
                result,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl TagIndex for MockTags {
        async fn list_entities(&self) -> Result<Vec<HelpTile>, TagIndexError> {
            *self.calls.lock().unwrap() += 1;
            self.result.clone()
        }
    }

    fn hit(answer: &str, score: f64) -> KnowledgeBaseMatch {
        KnowledgeBaseMatch {
            question: "How do I reset my password?".to_string(),
            answer: answer.to_string(),
            score,
        }
    }

    fn tile(id: &str, tags: &str) -> HelpTile {
        HelpTile {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            image_url: None,
            redirect_url: None,
            tags: tags.to_string(),
        }
    }

    fn search(kb: Arc<MockKnowledgeBase>, tags: Arc<MockTags>, configured: bool) -> ContentSearch {
        ContentSearch::standard(Arc::new(MockConfig { configured }), kb, tags)
    }

    #[tokio::test]
    async fn knowledge_base_match_skips_tag_search() {
        let kb = Arc::new(MockKnowledgeBase::new(Ok(vec![
            hit("Use the self-service portal.", 92.0),
            hit("Call the help desk.", 40.0),
        ])));
        let tags = Arc::new(MockTags::new(Ok(vec![tile("pw", "password")])));

        let outcome = search(kb.clone(), tags.clone(), true)
            .search("how do I reset password")
            .await;

        assert_eq!(
            outcome,
            Some(SearchOutcome::Answer(hit("Use the self-service portal.", 92.0)))
        );
        assert_eq!(*tags.calls.lock().unwrap(), 0);
        assert_eq!(kb.calls.lock().unwrap().as_slice(), ["how do I reset password"]);
    }

    #[tokio::test]
    async fn empty_knowledge_base_falls_through_to_best_tiles() {
        let kb = Arc::new(MockKnowledgeBase::new(Ok(vec![])));
        let tags = Arc::new(MockTags::new(Ok(vec![
            tile("vpn", "vpn"),
            tile("remote", "vpn, home"),
        ])));

        let outcome = search(kb, tags, true)
            .search("VPN from home")
            .await
            .unwrap();

        match outcome {
            SearchOutcome::Tiles(tiles) => {
                assert_eq!(tiles.len(), 1);
                assert_eq!(tiles[0].id, "remote");
            }
            other => panic!("expected tiles, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failures_everywhere_find_nothing() {
        let kb = Arc::new(MockKnowledgeBase::new(Err(KnowledgeBaseError::Network(
            "down".to_string(),
        ))));
        let tags = Arc::new(MockTags::new(Err(TagIndexError::Unavailable(
            "missing".to_string(),
        ))));

        assert!(search(kb, tags.clone(), true).search("vpn").await.is_none());
        assert_eq!(*tags.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_configuration_skips_knowledge_base() {
        let kb = Arc::new(MockKnowledgeBase::new(Ok(vec![hit("a", 90.0)])));
        let tags = Arc::new(MockTags::new(Ok(vec![])));

        assert!(search(kb.clone(), tags, false).search("vpn").await.is_none());
        assert!(kb.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_text_is_never_searched() {
        let kb = Arc::new(MockKnowledgeBase::new(Ok(vec![hit("a", 90.0)])));
        let tags = Arc::new(MockTags::new(Ok(vec![tile("x", "x")])));

        assert!(search(kb.clone(), tags.clone(), true).search("   ").await.is_none());
        assert!(kb.calls.lock().unwrap().is_empty());
        assert_eq!(*tags.calls.lock().unwrap(), 0);
    }

    #[test]
    fn outcomes_render_as_cards() {
        let msg = SearchOutcome::Answer(hit("Use the portal.", 80.0)).into_message("reset pw");
        assert_eq!(
            msg,
            OutboundMessage::Answer {
                user_question: "reset pw".to_string(),
                question: "How do I reset my password?".to_string(),
                answer: "Use the portal.".to_string(),
            }
        );
    }
}
