use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Turn plain text into a fully buffered mp3.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Unsigned URL under which `key` can be fetched once uploaded.
    fn public_url(&self, key: &str) -> String;
}
