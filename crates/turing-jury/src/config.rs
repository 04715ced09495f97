use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use coordination::{ChatCompletionsClient, ScorePolicy};

/// OpenRouter's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model for the tech-support role and the interrogator.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";

/// Default jury, comma-separated.
pub const DEFAULT_JURY: &str =
    "meta-llama/llama-3.1-8b-instruct,google/gemma-3-12b-it,anthropic/claude-3-haiku";

pub const API_KEY_ENV: &str = "OPEN_ROUTER_API_KEY";
pub const BASE_URL_ENV: &str = "TURING_JURY_BASE_URL";
pub const TIMEOUT_ENV: &str = "TURING_JURY_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Completion endpoint configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            api_key: std::env::var(API_KEY_ENV)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            timeout: Duration::from_secs(
                std::env::var(TIMEOUT_ENV)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

impl ServiceConfig {
    pub fn build_client(&self) -> Result<ChatCompletionsClient> {
        let api_key = self
            .api_key
            .as_deref()
            .with_context(|| format!("{API_KEY_ENV} is not set"))?;
        ChatCompletionsClient::new(self.base_url.as_str(), api_key, self.timeout)
            .with_context(|| format!("Failed to build completion client ({})", self.base_url))
    }
}

/// Parameters for one comparison run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Model playing the tech-support agent under test.
    pub role_play_model: String,
    /// Model generating questions (unused with a question file).
    pub interrogator_model: String,
    pub jury_models: Vec<String>,
    pub max_turns: usize,
    pub debate_rounds: u32,
    pub score_policy: ScorePolicy,
    /// Scripted questions, one per line, replacing the interrogator.
    pub questions_file: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            role_play_model: DEFAULT_MODEL.to_string(),
            interrogator_model: DEFAULT_MODEL.to_string(),
            jury_models: parse_jury(DEFAULT_JURY),
            max_turns: 3,
            debate_rounds: 2,
            score_policy: ScorePolicy::default(),
            questions_file: None,
        }
    }
}

/// Split a comma-separated jury list, dropping blanks.
pub fn parse_jury(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jury() {
        assert_eq!(
            parse_jury(" a/b , c/d,,e "),
            vec!["a/b".to_string(), "c/d".to_string(), "e".to_string()]
        );
        assert!(parse_jury("").is_empty());
    }

    #[test]
    fn test_run_config_default() {
        let config = RunConfig::default();
        assert_eq!(config.jury_models.len(), 3);
        assert_eq!(config.max_turns, 3);
        assert_eq!(config.debate_rounds, 2);
        assert_eq!(config.score_policy.parse_failure_score, 0.0);
    }

    #[test]
    fn test_build_client_requires_key() {
        let config = ServiceConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        };
        let err = config.build_client().err().unwrap();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_build_client_with_key() {
        let config = ServiceConfig {
            base_url: "http://localhost:8000/v1".to_string(),
            api_key: Some("sk-test".to_string()),
            timeout: Duration::from_secs(5),
        };
        let client = config.build_client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/v1");
    }
}
