//! LLM fallback classifier
//!
//! Wraps an external chat collaborator behind the `ChatClient` trait and
//! classifies ambiguous queries through a one-line `CATEGORY|reason`
//! protocol. Transport failures and timeouts surface as errors so the
//! router can degrade with a diagnostic reason instead of a silent
//! General classification.
//!
//! One attempt per query, no retry: a failure should bound latency,
//! not extend it.

use crate::error::RoutingError;
use crate::models::{EntityBundle, Intent};
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Hard ceiling on a single classification call.
const CLASSIFY_TIMEOUT_SECS: u64 = 10;

/// Request timeout on the HTTP client itself.
const HTTP_TIMEOUT_SECS: u64 = 15;

/// External chat collaborator: free-text in, free-text out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, prompt: &str) -> Result<String>;
}

//
// ================= Gemini-backed client =================
//

/// Reusable Gemini client (connection-pooled, bounded request timeout)
pub struct GeminiChat {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiChat {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent".to_string(),
        })
    }
}

#[async_trait]
impl ChatClient for GeminiChat {
    async fn chat(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(RoutingError::LlmError(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 128,
            },
        };

        info!("Calling Gemini API for query classification");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(RoutingError::LlmError(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            RoutingError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        let answer = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| RoutingError::LlmError("Empty response from Gemini".to_string()))?;

        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

//
// ================= Mock client =================
//

/// Fixed-reply client for development & testing.
/// Keeps the router functional without LLM dependency.
pub struct MockChat {
    pub reply: String,
}

impl MockChat {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ChatClient for MockChat {
    async fn chat(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

//
// ================= LLM classification =================

/// Build the deterministic classification prompt: the five categories
/// plus the already-extracted entities as grounding context.
pub fn build_classification_prompt(query: &str, entities: &EntityBundle) -> String {
    format!(
        r#"You are a query classifier for a financial data assistant.

Classify the user query into exactly one category:
- RANKING: top/bottom lists, best or worst performers
- SECTOR: sector or industry level comparisons and benchmarks
- TIMESERIES: growth, trends, multi-year history
- LATEST: the most recent reported figures
- GENERAL: anything else

QUERY:
{}

DETECTED ENTITIES:
tickers: {:?}
companies: {:?}
sectors: {:?}

Rules:
- Answer with a single line in the form CATEGORY|short reason
- No other text
"#,
        query, entities.tickers, entities.companies, entities.sectors,
    )
}

/// Parse a `CATEGORY|reason` reply. A missing separator treats the
/// whole reply as the category; unknown categories map to General.
pub fn parse_category_line(reply: &str) -> (Intent, String) {
    let line = reply.trim();

    let (category, reason) = match line.split_once('|') {
        Some((category, reason)) => (category, reason.trim().to_string()),
        None => (line, "LLM classification".to_string()),
    };

    let intent = match category.trim().to_uppercase().as_str() {
        "RANKING" => Intent::Ranking,
        "SECTOR" => Intent::Sector,
        "TIMESERIES" => Intent::Timeseries,
        "LATEST" => Intent::Latest,
        _ => Intent::General,
    };

    (intent, reason)
}

/// Classify a query through the chat collaborator.
///
/// An unparsable reply still classifies (unknown categories map to
/// General); transport failures and the timeout are returned as errors
/// for the caller to degrade on.
pub async fn classify_with_llm(
    chat: &dyn ChatClient,
    query: &str,
    entities: &EntityBundle,
) -> Result<(Intent, String)> {
    let prompt = build_classification_prompt(query, entities);

    let reply = match tokio::time::timeout(
        Duration::from_secs(CLASSIFY_TIMEOUT_SECS),
        chat.chat(&prompt),
    )
    .await
    {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            warn!("LLM classification failed: {}", e);
            return Err(e);
        }
        Err(_) => {
            warn!(
                "LLM classification timed out after {}s",
                CLASSIFY_TIMEOUT_SECS
            );
            return Err(RoutingError::LlmTimeout(CLASSIFY_TIMEOUT_SECS));
        }
    };

    let (intent, reason) = parse_category_line(&reply);
    info!(?intent, "LLM classified query");
    Ok((intent, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingChat;

    #[async_trait]
    impl ChatClient for FailingChat {
        async fn chat(&self, _prompt: &str) -> Result<String> {
            Err(RoutingError::LlmError("connection refused".to_string()))
        }
    }

    struct SlowChat;

    #[async_trait]
    impl ChatClient for SlowChat {
        async fn chat(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("RANKING|never reached".to_string())
        }
    }

    #[test]
    fn test_parse_category_line() {
        let (intent, reason) = parse_category_line("SECTOR|mentions sector benchmarks");
        assert_eq!(intent, Intent::Sector);
        assert_eq!(reason, "mentions sector benchmarks");

        let (intent, reason) = parse_category_line("ranking| best performers wanted ");
        assert_eq!(intent, Intent::Ranking);
        assert_eq!(reason, "best performers wanted");
    }

    #[test]
    fn test_parse_without_separator_uses_whole_reply_as_category() {
        let (intent, reason) = parse_category_line("TIMESERIES");
        assert_eq!(intent, Intent::Timeseries);
        assert_eq!(reason, "LLM classification");
    }

    #[test]
    fn test_parse_unknown_category_defaults_to_general() {
        let (intent, _) = parse_category_line("BANANAS|definitely a fruit query");
        assert_eq!(intent, Intent::General);
    }

    #[test]
    fn test_prompt_contains_categories_and_entities() {
        let mut entities = EntityBundle::default();
        entities.push_ticker("2222");
        entities.push_company("Saudi Aramco");

        let prompt = build_classification_prompt("how is aramco doing", &entities);
        for category in ["RANKING", "SECTOR", "TIMESERIES", "LATEST", "GENERAL"] {
            assert!(prompt.contains(category), "missing {category}");
        }
        assert!(prompt.contains("2222"));
        assert!(prompt.contains("Saudi Aramco"));
    }

    #[tokio::test]
    async fn test_classification_happy_path() {
        let chat = MockChat::new("LATEST|asks for current figures");
        let (intent, reason) = classify_with_llm(&chat, "aramco numbers", &EntityBundle::default())
            .await
            .unwrap();
        assert_eq!(intent, Intent::Latest);
        assert_eq!(reason, "asks for current figures");
    }

    #[tokio::test]
    async fn test_collaborator_failure_surfaces_as_error() {
        let result = classify_with_llm(&FailingChat, "anything", &EntityBundle::default()).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_collaborator_times_out() {
        let result = classify_with_llm(&SlowChat, "anything", &EntityBundle::default()).await;
        assert!(matches!(result, Err(RoutingError::LlmTimeout(_))));
    }

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "classify this".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 128,
            },
        };

        let json = serde_json::to_string(&request);
        assert!(json.is_ok());
        assert!(json.unwrap().contains("classify this"));
    }
}
