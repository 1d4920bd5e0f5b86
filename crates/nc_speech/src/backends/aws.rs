use std::fmt;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_polly::types::{Engine, OutputFormat, TextType, VoiceId};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use nc_core::{Error, ObjectStore, Result, SpeechSynthesizer};
use tracing::debug;

pub const DEFAULT_VOICE: &str = "Matthew";

#[derive(Clone)]
pub struct AwsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    pub voice: String,
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("voice", &self.voice)
            .finish()
    }
}

impl AwsConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("access key", &self.access_key_id),
            ("secret key", &self.secret_access_key),
            ("region", &self.region),
            ("bucket", &self.bucket),
            ("voice", &self.voice),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(Error::Config(format!("AWS {} must not be empty", name))),
            None => Ok(()),
        }
    }

    /// One shared SDK config for Polly and S3, with static credentials.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let credentials = Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            None,
            None,
            "newscast",
        );
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await
    }
}

/// Deterministic, unsigned URL of an object in a public-read bucket.
pub fn s3_public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

pub struct PollySynthesizer {
    client: aws_sdk_polly::Client,
    voice: VoiceId,
}

impl PollySynthesizer {
    pub fn new(sdk_config: &SdkConfig, voice: &str) -> Self {
        Self {
            client: aws_sdk_polly::Client::new(sdk_config),
            voice: VoiceId::from(voice),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    fn name(&self) -> &str {
        "Polly"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .synthesize_speech()
            .engine(Engine::Standard)
            .output_format(OutputFormat::Mp3)
            .text_type(TextType::Text)
            .voice_id(self.voice.clone())
            .text(text)
            .send()
            .await
            .map_err(|e| {
                Error::Publish(format!(
                    "Polly synthesis failed: {}",
                    aws_sdk_polly::error::DisplayErrorContext(&e)
                ))
            })?;

        let audio = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| Error::Publish(format!("Failed to read Polly audio stream: {}", e)))?
            .into_bytes();
        debug!("Polly returned {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &SdkConfig, bucket: &str, region: &str) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn name(&self) -> &str {
        "S3"
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                Error::Publish(format!(
                    "S3 upload of {} failed: {}",
                    key,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        s3_public_url(&self.bucket, &self.region, key)
    }
}
