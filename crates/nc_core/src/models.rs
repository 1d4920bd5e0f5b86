use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync {
    fn name(&self) -> &str;

    /// Run one generation for `prompt`. `Ok(None)` means the model answered
    /// without any usable text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}
