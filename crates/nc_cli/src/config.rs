use std::path::PathBuf;
use nc_core::{Error, Result};
use nc_feed::{FeedConfig, DEFAULT_NEWS_COUNT};
use nc_speech::backends::aws::DEFAULT_VOICE;
use nc_speech::{AwsConfig, SpeechConfig};
use nc_storage::backends::firestore::DEFAULT_COLLECTION;
use nc_storage::{FirestoreConfig, StorageConfig};
use nc_web::ReadFailurePolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SQLITE_PATH: &str = "newscast.db";

/// Everything the service needs, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub port: u16,
    pub inference: nc_inference::Config,
    pub speech: SpeechConfig,
    pub storage: StorageConfig,
    pub read_failure_policy: ReadFailurePolicy,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &str, purpose: &str| {
            get(key).ok_or_else(|| Error::Config(format!("{} is required {}", key, purpose)))
        };

        let feed_url = require("FEED_URL", "to fetch news")?;
        let news_count = match get("NEWS_COUNT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(count) if count > 0 => count,
                _ => {
                    return Err(Error::Config(format!(
                        "NEWS_COUNT must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_NEWS_COUNT,
        };
        let feed = FeedConfig::new(&feed_url)?.with_news_count(news_count);

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a valid port number, got '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        let model_name = get("INFERENCE_MODEL").unwrap_or_else(|| "gemini".to_string());
        let inference = match model_name.as_str() {
            "gemini" => nc_inference::Config {
                model_name,
                api_key: Some(require("GOOGLE_API_KEY", "for the gemini model")?),
                model_id: get("GEMINI_MODEL"),
                base_url: None,
            },
            "deepseek" => nc_inference::Config {
                model_name,
                api_key: Some(require("DEEPSEEK_API_KEY", "for the deepseek model")?),
                model_id: None,
                base_url: None,
            },
            "dummy" => nc_inference::Config {
                model_name,
                ..Default::default()
            },
            other => {
                return Err(Error::Config(format!(
                    "Unknown inference model '{}'. Available models: {}",
                    other,
                    nc_inference::models::AVAILABLE_MODELS.join(", ")
                )))
            }
        };

        let speech = match get("SPEECH_BACKEND").as_deref().unwrap_or("aws") {
            "aws" => SpeechConfig::Aws(AwsConfig {
                access_key_id: require("AWS_ACCESS_KEY", "for the aws speech backend")?,
                secret_access_key: require("AWS_SECRET_KEY", "for the aws speech backend")?,
                region: require("AWS_REGION", "for the aws speech backend")?,
                bucket: require("S3_BUCKET", "for the aws speech backend")?,
                voice: get("POLLY_VOICE").unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            }),
            "dummy" => SpeechConfig::Dummy,
            other => return Err(SpeechConfig::unknown_backend(other)),
        };

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("firestore") {
            "firestore" => {
                let mut firestore = FirestoreConfig::new(
                    &require("FIREBASE_PROJECT_ID", "for the firestore backend")?,
                    &require("FIREBASE_API_KEY", "for the firestore backend")?,
                );
                firestore.collection =
                    get("FIRESTORE_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
                StorageConfig::Firestore(firestore)
            }
            "memory" => StorageConfig::Memory,
            "sqlite" => StorageConfig::Sqlite {
                path: PathBuf::from(get("SQLITE_PATH").unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string())),
            },
            other => return Err(StorageConfig::unknown_backend(other)),
        };

        let read_failure_policy = match get("CACHE_READ_FAILURE").as_deref().unwrap_or("miss") {
            "miss" => ReadFailurePolicy::TreatAsMiss,
            "fail" => ReadFailurePolicy::Fail,
            other => {
                return Err(Error::Config(format!(
                    "CACHE_READ_FAILURE must be 'miss' or 'fail', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            feed,
            port,
            inference,
            speech,
            storage,
            read_failure_policy,
        })
    }
}
