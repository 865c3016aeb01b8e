//! Topic classification via an external language model
//!
//! Builds a prompt from a reflection's title, text, and the topic names
//! already in the store, and asks the model for 2-3 topic names, reusing
//! an existing name wherever one is an intuitive match. The reply is
//! returned as-is; resolve-or-create downstream handles both known and
//! invented names. Failures propagate to the caller with no retry and no
//! fallback list.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const USER_AGENT: &str = concat!("Reflections/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

const SYSTEM_PROMPT: &str = "Analyze personal reflections and identify 2-3 key topics to \
describe the following reflections. Answer with a JSON array of topic name strings and \
nothing else.";

/// Classifier errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Classifier API returned an error response
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse the model's reply into topic names
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Narrow seam for topic suggestion, so handlers hold a trait object and
/// tests substitute a stub instead of calling the real API.
#[async_trait]
pub trait TopicClassifier: Send + Sync {
    /// Suggest topic names for a reflection, in the order the model
    /// returned them.
    async fn classify(
        &self,
        title: &str,
        text: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ClassifierError>;
}

/// OpenAI chat-completions response (the slice of it we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// OpenAI-backed classifier
pub struct OpenAiClassifier {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    /// Create a new classifier client for `model`, authenticated with
    /// `api_key`.
    pub fn new(api_key: String, model: String) -> Result<Self, ClassifierError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl TopicClassifier for OpenAiClassifier {
    async fn classify(
        &self,
        title: &str,
        text: &str,
        existing: &[String],
    ) -> Result<Vec<String>, ClassifierError> {
        let prompt = build_user_prompt(title, text, existing);

        tracing::debug!(model = %self.model, existing = existing.len(), "Requesting topic classification");

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
        });

        let response = self
            .http_client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api(status.as_u16(), error_text));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        let content = reply
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ClassifierError::Parse("reply contained no choices".to_string()))?;

        let topics = parse_topic_list(content)?;

        tracing::info!(topics = ?topics, "Classification successful");
        Ok(topics)
    }
}

/// Format the user prompt embedding the reflection and the current topic
/// names the model should prefer over inventing new ones.
fn build_user_prompt(title: &str, text: &str, existing: &[String]) -> String {
    format!(
        "Given the following reflection:\n\n\
         Title: {title}\n\
         Text: {text}\n\n\
         Please use one of the following topics if applicable or create a new one(s) otherwise.\n\
         Please be conservative and don't use the topic unless it would be deemed a very \
         intuitive match by any user.\n\
         {}",
        existing.join(", ")
    )
}

/// Parse the model reply into topic names. Accepts a bare JSON array,
/// tolerating markdown code fences around it.
fn parse_topic_list(content: &str) -> Result<Vec<String>, ClassifierError> {
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str::<Vec<String>>(trimmed)
        .map_err(|e| ClassifierError::Parse(format!("expected a JSON array of strings: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_reflection_and_existing_topics() {
        let existing = vec!["health".to_string(), "work".to_string()];
        let prompt = build_user_prompt("Morning run", "Felt great", &existing);

        assert!(prompt.contains("Title: Morning run"));
        assert!(prompt.contains("Text: Felt great"));
        assert!(prompt.contains("health, work"));
        assert!(prompt.contains("intuitive match"));
    }

    #[test]
    fn prompt_with_no_existing_topics_still_renders() {
        let prompt = build_user_prompt("T", "B", &[]);
        assert!(prompt.contains("create a new one(s)"));
    }

    #[test]
    fn parses_plain_json_array() {
        let topics = parse_topic_list(r#"["health", "running"]"#).unwrap();
        assert_eq!(topics, vec!["health".to_string(), "running".to_string()]);
    }

    #[test]
    fn parses_fenced_json_array() {
        let topics = parse_topic_list("```json\n[\"health\"]\n```").unwrap();
        assert_eq!(topics, vec!["health".to_string()]);
    }

    #[test]
    fn malformed_reply_is_parse_error() {
        let err = parse_topic_list("health, running").unwrap_err();
        assert!(matches!(err, ClassifierError::Parse(_)));
    }
}
