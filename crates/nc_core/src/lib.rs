pub mod date;
pub mod error;
pub mod models;
pub mod source;
pub mod speech;
pub mod storage;
pub mod types;

pub use date::{is_valid_date, podcast_filename, today_utc};
pub use error::{Error, Result};
pub use models::InferenceModel;
pub use source::NewsSource;
pub use speech::{ObjectStore, SpeechSynthesizer};
pub use storage::{CreateOutcome, PodcastStore};
pub use types::{BroadcastScript, NewsItem, NewsLink, PodcastRecord};
