use std::env;
use std::time::Duration;

/// Default chat model identifier.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Default output token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Default sampling temperature for chat answers.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
/// Default per-call timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Feature flags and sampling settings for the remote provider.
#[derive(Clone)]
pub struct AssistConfig {
    /// Master switch (`RIZA_ENABLE_AI`, or legacy `ENABLE_AI`). Only `true`
    /// (any case) enables it. Default: `true`.
    pub enabled: bool,
    /// Provider credential (`OPENAI_API_KEY`). Only its presence gates AI use;
    /// the client resolves the key from the same variable.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

impl std::fmt::Debug for AssistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AssistConfig {
    const ENV_ENABLE_AI: &'static str = "RIZA_ENABLE_AI";
    /// Fallback name read when `RIZA_ENABLE_AI` is unset.
    const ENV_ENABLE_AI_LEGACY: &'static str = "ENABLE_AI";
    const ENV_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_MODEL: &'static str = "RIZA_AI_MODEL";
    const ENV_MAX_TOKENS: &'static str = "RIZA_MAX_TOKENS";
    const ENV_TEMPERATURE: &'static str = "RIZA_TEMPERATURE";
    const ENV_TIMEOUT_SECS: &'static str = "RIZA_AI_TIMEOUT_SECS";

    /// Loads settings from the environment. Unparseable numbers fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let enabled = env::var(Self::ENV_ENABLE_AI)
            .or_else(|_| env::var(Self::ENV_ENABLE_AI_LEGACY))
            .map(|s| s.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.enabled);

        let api_key = env::var(Self::ENV_API_KEY)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let model = env::var(Self::ENV_MODEL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.model);

        let max_tokens = env::var(Self::ENV_MAX_TOKENS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_tokens);

        let temperature = env::var(Self::ENV_TEMPERATURE)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|t| t.is_finite())
            .unwrap_or(defaults.temperature);

        let timeout = env::var(Self::ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            enabled,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout,
        }
    }

    /// `true` when AI features are switched on and a credential is present.
    pub fn is_available(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }

    #[cfg(any(test, feature = "mock"))]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }
}
