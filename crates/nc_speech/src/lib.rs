use std::sync::Arc;
use nc_core::{Error, ObjectStore, Result, SpeechSynthesizer};
use tracing::info;

pub mod backends;
pub mod publisher;

pub use backends::aws::{AwsConfig, PollySynthesizer, S3ObjectStore};
pub use backends::memory::{DummySynthesizer, MemoryObjectStore};
pub use publisher::{SpeechPublisher, AUDIO_CONTENT_TYPE};

pub const AVAILABLE_BACKENDS: &[&str] = &["aws", "dummy"];

#[derive(Debug, Clone)]
pub enum SpeechConfig {
    Aws(AwsConfig),
    Dummy,
}

/// Builds the synthesizer and object store pair for `config`.
pub async fn create_backends(
    config: &SpeechConfig,
) -> Result<(Arc<dyn SpeechSynthesizer>, Arc<dyn ObjectStore>)> {
    let (synthesizer, store): (Arc<dyn SpeechSynthesizer>, Arc<dyn ObjectStore>) = match config {
        SpeechConfig::Aws(aws) => {
            aws.validate()?;
            let sdk_config = aws.load_sdk_config().await;
            (
                Arc::new(PollySynthesizer::new(&sdk_config, &aws.voice)),
                Arc::new(S3ObjectStore::new(&sdk_config, &aws.bucket, &aws.region)),
            )
        }
        SpeechConfig::Dummy => (
            Arc::new(DummySynthesizer::new()),
            Arc::new(MemoryObjectStore::new()),
        ),
    };
    info!(
        "🔊 Speech backends ready ({} → {})",
        synthesizer.name(),
        store.name()
    );
    Ok((synthesizer, store))
}

impl SpeechConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            SpeechConfig::Aws(_) => "aws",
            SpeechConfig::Dummy => "dummy",
        }
    }

    pub fn unknown_backend(name: &str) -> Error {
        Error::Config(format!(
            "Unknown speech backend '{}'. Available backends: {}",
            name,
            AVAILABLE_BACKENDS.join(", ")
        ))
    }
}

pub mod prelude {
    pub use super::{create_backends, SpeechConfig, SpeechPublisher};
    pub use nc_core::{ObjectStore, PodcastRecord, Result, SpeechSynthesizer, Error};
}
