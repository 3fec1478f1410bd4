pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Endpoint and model configuration for the generation service: a fluent
/// general model for summaries and free-text analysis, and an
/// instruction-following model for schema-constrained structuring.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub analysis_model: String,
    pub structuring_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: "phi4".to_string(),
            structuring_model: "llama3.3".to_string(),
        }
    }
}

impl ModelConfig {
    /// Default configuration, with the base URL taken from `ZRITEL_BASE_URL`
    /// when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("ZRITEL_BASE_URL") {
            config.base_url = base_url;
        }
        config
    }
}
