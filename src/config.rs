//! Settings for model clients and tracing.
//!
//! Values come from an optional TOML file (with `${VAR}` expansion) and the
//! process environment; the file wins where both are set.

use crate::completion::{
    ChatClient, ChatCompletionRequestOptions, LangSmithTracer, OpenAIChatClient,
    TracedChatClient,
};
use async_openai::config::OpenAIConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "ROUTEGRAPH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config not found: {0}")]
    NotFound(String),

    #[error("Config parse: {0}")]
    Parse(String),
}

/// Model name and sampling temperature for one kind of call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl ModelProfile {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature: Some(temperature),
        }
    }
}

impl From<&ModelProfile> for ChatCompletionRequestOptions {
    fn from(profile: &ModelProfile) -> Self {
        Self {
            model: profile.model.clone(),
            temperature: profile.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Fast, cheap and deterministic
    pub small: ModelProfile,
    /// Capable, with some sampling freedom
    pub big: ModelProfile,
    /// General conversation
    pub chat: ModelProfile,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            small: ModelProfile::new("gpt-4o-mini", 0.0),
            big: ModelProfile::new("gpt-4o", 0.4),
            chat: ModelProfile::new("gpt-4o", 0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LangSmithSettings {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub openai: OpenAISettings,
    pub langsmith: LangSmithSettings,
    pub models: ModelSettings,
}

impl Settings {
    /// Defaults plus whatever the environment provides.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.fill_from_env();
        settings
    }

    /// Load a TOML file, then fill unset credentials from the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
        let mut settings = Self::from_toml_str(&expand_env_vars(&content))?;
        settings.fill_from_env();
        Ok(settings)
    }

    /// `load` when a path is given, `from_env` otherwise.
    pub fn load_or_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::from_env()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn fill_from_env(&mut self) {
        fill(&mut self.openai.api_key, "OPENAI_API_KEY");
        fill(&mut self.openai.base_url, "OPENAI_BASE_URL");
        fill(&mut self.langsmith.api_key, "LANGSMITH_API_KEY");
        fill(&mut self.langsmith.endpoint, "LANGSMITH_ENDPOINT");
    }

    /// OpenAI client for these settings, traced to LangSmith when a LangSmith
    /// key is configured.
    pub fn chat_client(&self) -> Arc<dyn ChatClient> {
        let mut config = OpenAIConfig::new();
        if let Some(api_key) = &self.openai.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(base_url) = &self.openai.base_url {
            config = config.with_api_base(base_url);
        }
        let client = OpenAIChatClient::with_config(config);

        match &self.langsmith.api_key {
            Some(api_key) => {
                let mut tracer = LangSmithTracer::new(api_key);
                if let Some(endpoint) = &self.langsmith.endpoint {
                    tracer = tracer.with_base_url(endpoint);
                }
                tracing::debug!(endpoint = %tracer.base_url, "tracing chat calls to LangSmith");
                Arc::new(TracedChatClient::new(client, Arc::new(tracer)))
            }
            None => Arc::new(client),
        }
    }
}

fn fill(slot: &mut Option<String>, var: &str) {
    if slot.is_none() {
        *slot = std::env::var(var).ok().filter(|v| !v.is_empty());
    }
}

/// Expand `${ENV_VAR}` references. Unknown variables and a `${` with no
/// closing brace are kept as written.
fn expand_env_vars(input: &str) -> String {
    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find("${") {
        expanded.push_str(&rest[..open]);
        let reference = &rest[open..];
        let Some(close) = reference.find('}') else {
            expanded.push_str(reference);
            return expanded;
        };

        match std::env::var(&reference[2..close]) {
            Ok(value) => expanded.push_str(&value),
            Err(_) => expanded.push_str(&reference[..=close]),
        }
        rest = &reference[close + 1..];
    }

    expanded.push_str(rest);
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_profiles() {
        let models = ModelSettings::default();
        assert_eq!(models.small, ModelProfile::new("gpt-4o-mini", 0.0));
        assert_eq!(models.big, ModelProfile::new("gpt-4o", 0.4));

        let options = ChatCompletionRequestOptions::from(&models.big);
        assert_eq!(options.model, "gpt-4o");
        assert_eq!(options.temperature, Some(0.4));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [models.big]
            model = "gpt-4.1"
            temperature = 0.7
            "#,
        )
        .unwrap();

        assert_eq!(settings.models.big, ModelProfile::new("gpt-4.1", 0.7));
        assert_eq!(settings.models.small, ModelProfile::new("gpt-4o-mini", 0.0));
        assert_eq!(settings.openai, OpenAISettings::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Settings::from_toml_str("models = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("ROUTEGRAPH_TEST_EXPAND", "hello");
        assert_eq!(
            expand_env_vars("key = \"${ROUTEGRAPH_TEST_EXPAND}\""),
            "key = \"hello\""
        );
        assert_eq!(
            expand_env_vars("key = \"${ROUTEGRAPH_TEST_UNSET_VAR}\""),
            "key = \"${ROUTEGRAPH_TEST_UNSET_VAR}\""
        );
    }

    #[test]
    fn test_expand_env_vars_unterminated() {
        std::env::set_var("ROUTEGRAPH_TEST_OPEN", "unused");
        assert_eq!(
            expand_env_vars("key = \"${ROUTEGRAPH_TEST_OPEN"),
            "key = \"${ROUTEGRAPH_TEST_OPEN"
        );
        assert_eq!(expand_env_vars("price = \"$5 ${\""), "price = \"$5 ${\"");
        assert_eq!(expand_env_vars("a = 1\nb = \"${"), "a = 1\nb = \"${");
    }

    #[test]
    fn test_load_file_with_expansion() {
        std::env::set_var("ROUTEGRAPH_TEST_LS_KEY", "ls-123");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [openai]
            api_key = "sk-file"

            [langsmith]
            api_key = "${{ROUTEGRAPH_TEST_LS_KEY}}"
            "#
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.openai.api_key.as_deref(), Some("sk-file"));
        assert_eq!(settings.langsmith.api_key.as_deref(), Some("ls-123"));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/routegraph.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
