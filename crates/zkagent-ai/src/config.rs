//! Assisted-classifier configuration.

/// Configuration for the assisted classification stage.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// OpenAI API key
    pub api_key: String,
    /// Model to use (default: gpt-4o-mini)
    pub model: String,
    /// API base URL, without the `/v1/chat/completions` suffix
    pub base_url: String,
    /// Maximum tokens in the analysis response
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl AssistConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();

        let model =
            std::env::var("ZKAGENT_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let base_url =
            std::env::var("ZKAGENT_AI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        Self {
            api_key,
            model,
            base_url,
            ..Default::default()
        }
    }

    /// Check if the config is valid (has API key).
    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Create a builder for configuration.
    pub fn builder() -> AssistConfigBuilder {
        AssistConfigBuilder::default()
    }
}

/// Builder for assisted-classifier configuration.
#[derive(Debug, Default)]
pub struct AssistConfigBuilder {
    config: AssistConfig,
}

impl AssistConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn build(self) -> AssistConfig {
        self.config
    }
}
