use std::env;

use anyhow::{anyhow, Result};

use crate::core::modes::ModeScope;

pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Process configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub openai_api_key: String,
    pub mode_scope: ModeScope,
    pub poll_timeout_secs: u64,
}

impl Config {
    /// Both secrets are required; the process refuses to start without them.
    pub fn load() -> Result<Self> {
        Self::from_source(|name| env::var(name).ok())
    }

    fn from_source<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self> {
        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN is required"))?;
        let openai_api_key = get("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("OPENAI_API_KEY is required"))?;

        let mode_scope = match get("MODE_SCOPE") {
            Some(raw) => ModeScope::parse(raw.trim()).ok_or_else(|| {
                anyhow!(
                    "unknown MODE_SCOPE {:?}, expected \"global\" or \"per-chat\"",
                    raw
                )
            })?,
            None => ModeScope::Global,
        };

        let poll_timeout_secs = match get("POLL_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("POLL_TIMEOUT_SECS must be an integer, got {:?}", raw))?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };

        Ok(Config {
            bot_token,
            openai_api_key,
            mode_scope,
            poll_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_source(source(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.mode_scope, ModeScope::Global);
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
    }

    #[test]
    fn missing_bot_token_is_fatal() {
        let err = Config::from_source(source(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let err = Config::from_source(source(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "   "),
        ]))
        .unwrap_err()
        .to_string();
        assert!(err.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn per_chat_scope_is_selectable() {
        let config = Config::from_source(source(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("MODE_SCOPE", "per-chat"),
        ]))
        .unwrap();
        assert_eq!(config.mode_scope, ModeScope::PerChat);
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = Config::from_source(source(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("MODE_SCOPE", "per-user"),
        ]))
        .unwrap_err()
        .to_string();
        assert!(err.contains("MODE_SCOPE"));
    }

    #[test]
    fn poll_timeout_must_be_numeric() {
        let err = Config::from_source(source(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("POLL_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err()
        .to_string();
        assert!(err.contains("POLL_TIMEOUT_SECS"));
    }
}
