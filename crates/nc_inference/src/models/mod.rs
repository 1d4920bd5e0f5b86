use std::sync::Arc;
use nc_core::{Error, InferenceModel, Result};
use tracing::info;
use crate::Config;

pub mod deepseek;
pub mod dummy;
pub mod gemini;

pub use deepseek::DeepSeekModel;
pub use dummy::DummyModel;
pub use gemini::GeminiModel;

pub const AVAILABLE_MODELS: &[&str] = &["gemini", "deepseek", "dummy"];

pub fn create_model(config: Option<Config>) -> Result<Arc<dyn InferenceModel>> {
    let config = config.unwrap_or_default();
    let model: Arc<dyn InferenceModel> = match config.model_name.as_str() {
        "gemini" => Arc::new(GeminiModel::new(config)?),
        "deepseek" => Arc::new(DeepSeekModel::new(config)?),
        "dummy" => Arc::new(DummyModel::new()),
        other => {
            return Err(Error::Config(format!(
                "Unknown inference model '{}'. Available models: {}",
                other,
                AVAILABLE_MODELS.join(", ")
            )))
        }
    };
    info!("🧠 Inference model ready ({})", model.name());
    Ok(model)
}
