//! HTTP knowledge base client.
//!
//! Talks to a QnA-style `generateAnswer` endpoint:
//!
//! ```text
//! POST {endpoint}/knowledgebases/{kb_id}/generateAnswer
//! Authorization: EndpointKey <key>
//! {"question": "...", "top": 1}
//! ```
//!
//! The service answers "no match" with a zero-score placeholder; those
//! entries are dropped.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{KnowledgeBaseClient, KnowledgeBaseError, KnowledgeBaseMatch, KnowledgeBaseTarget};

#[derive(Debug, Clone)]
pub struct HttpKnowledgeBaseConfig {
    /// Base URL of the runtime endpoint, e.g. `https://contoso.azurewebsites.net/qnamaker`.
    pub endpoint: String,
    pub timeout: Duration,
    /// Number of answers requested per query.
    pub top: u32,
}

impl HttpKnowledgeBaseConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
            top: 1,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }
}

pub struct HttpKnowledgeBaseClient {
    config: HttpKnowledgeBaseConfig,
    client: Client,
}

impl HttpKnowledgeBaseClient {
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built (TLS backend
    /// initialization).
    pub fn new(config: HttpKnowledgeBaseConfig) -> Result<Self, KnowledgeBaseError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KnowledgeBaseError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn generate_answer_url(&self, knowledge_base_id: &str) -> String {
        format!(
            "{}/knowledgebases/{}/generateAnswer",
            self.config.endpoint.trim_end_matches('/'),
            knowledge_base_id
        )
    }

    async fn check_status(response: Response) -> Result<Response, KnowledgeBaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(KnowledgeBaseError::Unauthorized),
            code => Err(KnowledgeBaseError::Status {
                status: code,
                message: body,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateAnswerRequest<'a> {
    question: &'a str,
    top: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateAnswerResponse {
    #[serde(default)]
    answers: Vec<AnswerDto>,
}

#[derive(Debug, Deserialize)]
struct AnswerDto {
    #[serde(default)]
    questions: Vec<String>,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    score: f64,
}

fn into_matches(response: GenerateAnswerResponse) -> Vec<KnowledgeBaseMatch> {
    response
        .answers
        .into_iter()
        .filter(|a| a.score > 0.0)
        .map(|a| KnowledgeBaseMatch {
            question: a.questions.into_iter().next().unwrap_or_default(),
            answer: a.answer,
            score: a.score,
        })
        .collect()
}

#[async_trait]
impl KnowledgeBaseClient for HttpKnowledgeBaseClient {
    async fn query(
        &self,
        target: &KnowledgeBaseTarget,
        question: &str,
    ) -> Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError> {
        let response = self
            .client
            .post(self.generate_answer_url(&target.knowledge_base_id))
            .header(
                "Authorization",
                format!("EndpointKey {}", target.endpoint_key.expose_secret()),
            )
            .json(&GenerateAnswerRequest {
                question,
                top: self.config.top,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    KnowledgeBaseError::Network(format!(
                        "timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    KnowledgeBaseError::Network(e.to_string())
                }
            })?;

        let response = Self::check_status(response).await?;
        let body: GenerateAnswerResponse = response
            .json()
            .await
            .map_err(|e| KnowledgeBaseError::Parse(e.to_string()))?;

        Ok(into_matches(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = HttpKnowledgeBaseConfig::new("https://kb.contoso.com/qnamaker")
            .with_timeout(Duration::from_secs(3))
            .with_top(5);

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.top, 5);
    }

    #[test]
    fn url_joins_endpoint_and_knowledge_base() {
        let client =
            HttpKnowledgeBaseClient::new(HttpKnowledgeBaseConfig::new("https://kb.contoso.com/qnamaker/"))
                .unwrap();
        assert_eq!(
            client.generate_answer_url("kb-1"),
            "https://kb.contoso.com/qnamaker/knowledgebases/kb-1/generateAnswer"
        );
    }

    #[test]
    fn request_body_has_question_and_top() {
        let body = serde_json::to_value(GenerateAnswerRequest {
            question: "reset password",
            top: 1,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"question": "reset password", "top": 1}));
    }

    #[test]
    fn zero_score_placeholder_is_dropped() {
        let response: GenerateAnswerResponse = serde_json::from_str(
            r#"{"answers": [{"questions": [], "answer": "No good match found in KB.", "score": 0.0, "id": -1}]}"#,
        )
        .unwrap();
        assert!(into_matches(response).is_empty());
    }

    #[test]
    fn scored_answers_keep_first_question() {
        let response: GenerateAnswerResponse = serde_json::from_str(
            r#"{"answers": [{"questions": ["How do I reset my password?", "password reset"], "answer": "Use the portal.", "score": 87.2}]}"#,
        )
        .unwrap();

        let matches = into_matches(response);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].question, "How do I reset my password?");
        assert_eq!(matches[0].answer, "Use the portal.");
    }

    #[test]
    fn missing_answers_field_is_empty() {
        let response: GenerateAnswerResponse = serde_json::from_str("{}").unwrap();
        assert!(into_matches(response).is_empty());
    }
}
