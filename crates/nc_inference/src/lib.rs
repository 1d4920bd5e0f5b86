pub mod models;
pub mod summarizer;

pub use models::create_model;
pub use summarizer::{normalize_script, Summarizer};

/// Instruction every backend sends alongside the broadcast prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that summarizes tech news articles into 2-minute podcast scripts.";

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend name: `gemini`, `deepseek` or `dummy`.
    pub model_name: String,
    pub api_key: Option<String>,
    /// Provider-side model id, e.g. `gemini-1.5-flash`.
    pub model_id: Option<String>,
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: "gemini".to_string(),
            api_key: None,
            model_id: None,
            base_url: None,
        }
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_model;
    pub use super::summarizer::Summarizer;
    pub use nc_core::{BroadcastScript, InferenceModel, NewsItem, Result, Error};
}
