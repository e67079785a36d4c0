use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "llama3-70b-8192";

pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub store_dir: PathBuf,
    pub rag_corpus_path: PathBuf,
    pub sentiment_lexicon: Option<PathBuf>,
    pub llm: LlmConfig,
}

#[derive(Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    /// Reads the environment, after merging in a `.env` file if one exists.
    pub fn load() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            info!("Loaded variables from .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_address: try_load(&lookup, "BIND_ADDRESS", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "8080")?,
            store_dir: try_load(&lookup, "STORE_DIR", "store")?,
            rag_corpus_path: try_load(&lookup, "RAG_CORPUS_PATH", "rag_pdf_chunks.json")?,
            sentiment_lexicon: optional(&lookup, "SENTIMENT_LEXICON").map(PathBuf::from),
            llm: LlmConfig {
                api_url: try_load(&lookup, "LLM_API_URL", DEFAULT_LLM_API_URL)?,
                model: try_load(&lookup, "LLM_MODEL", DEFAULT_LLM_MODEL)?,
                api_key: optional(&lookup, "LLM_API_KEY"),
            },
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).filter(|v| !v.trim().is_empty());
    if value.is_none() {
        warn!("{key} not set");
    }
    value
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_dir, PathBuf::from("store"));
        assert_eq!(config.llm.model, DEFAULT_LLM_MODEL);
        assert!(config.llm.api_key.is_none());
        assert!(config.sentiment_lexicon.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("STORE_DIR", "/var/lib/network"),
            ("LLM_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.store_dir, PathBuf::from("/var/lib/network"));
        assert_eq!(config.llm.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = Config::from_lookup(lookup(&[("LLM_API_KEY", "  ")])).unwrap();
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn rejects_unparsable_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).err().unwrap();
        assert!(err.to_string().starts_with("Invalid PORT value \"eighty\""));
    }
}
