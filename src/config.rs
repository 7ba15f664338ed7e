//! Configuration types.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::llm::LlmConfig;
use crate::webhook::ReplySettings;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Service configuration, read from the process environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the completion service. Empty when unset.
    pub api_key: SecretString,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Sampling temperature for reply generation.
    pub temperature: f32,
    /// Upper bound on generated reply length.
    pub max_tokens: u32,
    /// Per-request timeout for the completion call.
    pub llm_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::from(""),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            llm_timeout: Duration::from_secs(60),
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults; set but unparseable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("OPENAI_API_KEY")
            .map(SecretString::from)
            .unwrap_or(defaults.api_key);

        let base_url = lookup("OPENAI_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_url);

        let model = lookup("LEAD_REPLY_MODEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.model);

        let temperature =
            parse_var(&lookup, "LEAD_REPLY_TEMPERATURE")?.unwrap_or(defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                key: "LEAD_REPLY_TEMPERATURE".to_string(),
                message: format!("{} is outside 0.0..=2.0", temperature),
            });
        }

        let max_tokens =
            parse_var(&lookup, "LEAD_REPLY_MAX_TOKENS")?.unwrap_or(defaults.max_tokens);

        let llm_timeout = parse_var::<u64, _>(&lookup, "LEAD_REPLY_LLM_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.llm_timeout);

        let host = lookup("LEAD_REPLY_HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "LEAD_REPLY_PORT")?.unwrap_or(defaults.port);

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
            max_tokens,
            llm_timeout,
            host,
            port,
        })
    }

    /// Host and port the HTTP server binds to. The host may be a name such
    /// as `localhost`; it is resolved at bind time.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: self.llm_timeout,
        }
    }

    pub fn reply_settings(&self) -> ReplySettings {
        ReplySettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{:?}: {}", raw, e),
            }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.port, 8000);
        assert!(!config.has_api_key());
        assert_eq!(config.bind_target(), ("0.0.0.0", 8000));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9999/v1/"),
            ("LEAD_REPLY_MODEL", "gpt-4o-mini"),
            ("LEAD_REPLY_TEMPERATURE", "0.2"),
            ("LEAD_REPLY_MAX_TOKENS", "120"),
            ("LEAD_REPLY_LLM_TIMEOUT_SECS", "5"),
            ("LEAD_REPLY_HOST", "127.0.0.1"),
            ("LEAD_REPLY_PORT", "9000"),
        ]))
        .unwrap();

        assert!(config.has_api_key());
        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 120);
        assert_eq!(config.llm_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_target(), ("127.0.0.1", 9000));
    }

    #[test]
    fn test_unparseable_number_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("LEAD_REPLY_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("LEAD_REPLY_PORT"));
    }

    #[test]
    fn test_temperature_out_of_range_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("LEAD_REPLY_TEMPERATURE", "3.5")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn test_hostname_bind_target_resolves() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("LEAD_REPLY_HOST", "localhost"),
            ("LEAD_REPLY_PORT", "0"),
        ]))
        .unwrap();

        let listener = tokio::net::TcpListener::bind(config.bind_target())
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-very-secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }
}
