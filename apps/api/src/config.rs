use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Caller-level bound on one whole orchestration call.
    pub orchestration_timeout: Duration,
    /// Attribute every request to `local-dev-user` instead of checking tokens.
    pub auth_disabled: bool,
    /// Bearer token → user id.
    pub api_tokens: HashMap<String, String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            orchestration_timeout: Duration::from_secs(
                std::env::var("ORCHESTRATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "90".to_string())
                    .parse::<u64>()
                    .context("ORCHESTRATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            auth_disabled: std::env::var("AUTH_DISABLED")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            api_tokens: parse_api_tokens(&std::env::var("API_TOKENS").unwrap_or_default())?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses `token=user,token2=user2`. Blank input yields an empty map.
fn parse_api_tokens(raw: &str) -> Result<HashMap<String, String>> {
    let mut tokens = HashMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((token, user)) = pair.split_once('=') else {
            bail!("API_TOKENS entry '{pair}' must look like token=user_id");
        };
        let (token, user) = (token.trim(), user.trim());
        if token.is_empty() || user.is_empty() {
            bail!("API_TOKENS entry '{pair}' has an empty token or user id");
        }
        tokens.insert(token.to_string(), user.to_string());
    }
    Ok(tokens)
}
