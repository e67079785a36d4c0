//! Career mentor chat backed by an OpenAI-compatible chat-completion API.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{config::LlmConfig, error::AppError};

pub const CONTEXT_CHUNKS: usize = 3;

const SYSTEM_PROMPT: &str = "You are a virtual mentor specializing in the entertainment, film, and music industries. \
Give career advice, portfolio feedback, and industry insights. Be supportive, insightful, and practical.";

const CONTEXT_HEADER: &str = "Relevant information from Film and TV Entertainment Career Guide:";

lazy_static! {
    static ref NUMBERED: Regex = Regex::new(r"\n\s*\d+\.\s*").unwrap();
    static ref BULLET: Regex = Regex::new(r"\n\s*[-•]\s*").unwrap();
    static ref STAR_BULLET: Regex = Regex::new(r"\n\s*\*\s*").unwrap();
}

pub struct Mentor {
    client: Client,
    config: LlmConfig,
}

impl Mentor {
    pub fn new(config: LlmConfig) -> Self {
        Self { client: Client::new(), config }
    }

    pub async fn ask(&self, message: &str, context_chunks: &[&str]) -> Result<String, AppError> {
        let Some(api_key) = &self.config.api_key else {
            return Err(AppError::Internal("Missing LLM API key.".to_string()));
        };

        let payload = build_payload(&self.config.model, message, context_chunks);
        info!("Sending mentor request with {} context chunks", context_chunks.len());

        let response = self.client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("LLM API fetch error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            error!("LLM API returned {status}: {details}");
            return Err(AppError::Internal(format!("LLM API error: {status}")));
        }

        let data: Value = response.json()
            .await
            .map_err(|e| AppError::Internal(format!("LLM API response parse error: {e}")))?;
        let reply = data["choices"][0]["message"]["content"]
            .as_str()
            .filter(|s| !s.is_empty())
            .unwrap_or("No response.");
        Ok(clean_reply(reply))
    }
}

pub fn format_context(chunks: &[&str]) -> String {
    chunks.iter()
        .enumerate()
        .map(|(i, c)| format!("PDF Context [{}]:\n{}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_payload(model: &str, message: &str, context_chunks: &[&str]) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "system", "content": format!("{CONTEXT_HEADER}\n{}", format_context(context_chunks)) },
            { "role": "user", "content": message },
        ],
        "max_tokens": 512,
        "temperature": 0.7,
    })
}

/// Strips bold markers and normalizes list bullets to `- `.
pub fn clean_reply(reply: &str) -> String {
    let reply = reply.replace("**", "");
    let reply = NUMBERED.replace_all(&reply, |c: &Captures| format!("\n{}", c[0].trim()));
    let reply = BULLET.replace_all(&reply, "\n- ");
    STAR_BULLET.replace_all(&reply, "\n- ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bold_and_normalizes_bullets() {
        let reply = "**Start** here:\n  * build a reel\n• network\n   - audition";
        assert_eq!(clean_reply(reply), "Start here:\n- build a reel\n- network\n- audition");
    }

    #[test]
    fn keeps_numbered_lists_tight() {
        assert_eq!(clean_reply("Steps:\n   1.   Train\n2. Apply"), "Steps:\n1.Train\n2.Apply");
    }

    #[test]
    fn numbers_context_chunks() {
        assert_eq!(format_context(&["a", "b"]), "PDF Context [1]:\na\n\nPDF Context [2]:\nb");
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn payload_has_two_system_messages_then_user() {
        let payload = build_payload("m", "How do I find an agent?", &["agents matter"]);
        assert_eq!(payload["model"], "m");
        assert_eq!(payload["max_tokens"], 512);
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[1]["content"].as_str().unwrap().ends_with("PDF Context [1]:\nagents matter"));
        assert_eq!(messages[2]["content"], "How do I find an agent?");
    }

    #[actix_web::test]
    async fn missing_key_fails_before_any_request() {
        let mentor = Mentor::new(LlmConfig {
            api_url: "http://127.0.0.1:9/unused".to_string(),
            model: "m".to_string(),
            api_key: None,
        });
        let err = mentor.ask("hi", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing LLM API key.");
    }
}
