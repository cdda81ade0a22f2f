use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::evaluation::panel::{PanelConfig, RoleWeights};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 90;

/// Application configuration loaded from environment variables.
/// Startup fails if no LLM provider key is configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    /// When unset, sessions are kept in process memory.
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub agent_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            redis_url: optional_env("REDIS_URL"),
            session_ttl_secs: parse_env("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            agent_timeout_secs: parse_env("AGENT_TIMEOUT_SECS", DEFAULT_AGENT_TIMEOUT_SECS)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };

        if config.anthropic_api_key.is_none() && config.openai_api_key.is_none() {
            bail!("At least one of ANTHROPIC_API_KEY or OPENAI_API_KEY must be set");
        }

        Ok(config)
    }

    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            agent_timeout: Duration::from_secs(self.agent_timeout_secs),
            role_weights: RoleWeights::default(),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// Treats unset and blank values the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
