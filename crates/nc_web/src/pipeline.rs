use std::collections::HashMap;
use std::sync::Arc;
use nc_core::{NewsSource, PodcastRecord, Result};
use nc_inference::Summarizer;
use nc_speech::SpeechPublisher;
use nc_storage::{CacheLookup, DailyCache};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

/// What to do when the cache cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFailurePolicy {
    /// Log it and generate as if nothing were stored.
    #[default]
    TreatAsMiss,
    /// Fail the request.
    Fail,
}

/// Fetch → summarize → publish → persist, at most once per date.
pub struct PodcastPipeline {
    source: Arc<dyn NewsSource>,
    summarizer: Arc<Summarizer>,
    publisher: Arc<SpeechPublisher>,
    cache: DailyCache,
    read_failure_policy: ReadFailurePolicy,
    date_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PodcastPipeline {
    pub fn new(
        source: Arc<dyn NewsSource>,
        summarizer: Arc<Summarizer>,
        publisher: Arc<SpeechPublisher>,
        cache: DailyCache,
    ) -> Self {
        Self {
            source,
            summarizer,
            publisher,
            cache,
            read_failure_policy: ReadFailurePolicy::default(),
            date_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_read_failure_policy(mut self, policy: ReadFailurePolicy) -> Self {
        self.read_failure_policy = policy;
        self
    }

    pub fn cache(&self) -> &DailyCache {
        &self.cache
    }

    /// Returns the stored podcast for `date`, generating and storing it first
    /// on a miss.
    pub async fn get_or_create(&self, date: &str) -> Result<PodcastRecord> {
        info!("📅 Looking up podcast for {}", date);
        if let Some(record) = self.lookup(date).await? {
            info!("✅ Cache hit for {}", date);
            return Ok(record);
        }

        // Another request may have stored it since the first lookup.
        let guard = self.lock_date(date).await;
        let result = match self.lookup(date).await {
            Ok(Some(record)) => {
                info!("✅ Podcast for {} was stored by another request", date);
                Ok(record)
            }
            Ok(None) => self.generate(date).await,
            Err(e) => Err(e),
        };
        drop(guard);
        self.release_date(date).await;
        result
    }

    async fn lookup(&self, date: &str) -> Result<Option<PodcastRecord>> {
        match self.cache.get(date).await {
            CacheLookup::Found(record) => Ok(Some(record)),
            CacheLookup::NotFound => Ok(None),
            CacheLookup::ReadFailed(e) => match self.read_failure_policy {
                ReadFailurePolicy::TreatAsMiss => {
                    warn!("⚠️ Cache read failed for {}, generating anyway: {}", date, e);
                    Ok(None)
                }
                ReadFailurePolicy::Fail => Err(e),
            },
        }
    }

    async fn generate(&self, date: &str) -> Result<PodcastRecord> {
        info!("🆕 No podcast for {}, generating", date);

        let news = self.source.fetch_news().await?;
        info!("📰 Fetched {} stories from {}", news.len(), self.source.name());

        let script = self.summarizer.summarize(news).await?;
        let record = self
            .publisher
            .publish(&script.podcast_summary, &script.news, date)
            .await?;
        info!("🔗 Audio available at {}", record.audio_url);

        let stored = self.cache.put(record).await?.into_record();
        info!("💾 Podcast for {} saved to {}", date, self.cache.store_name());
        Ok(stored)
    }

    /// Takes the generation lock for `date`.
    async fn lock_date(&self, date: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.date_locks.lock().await;
            locks.entry(date.to_string()).or_default().clone()
        };
        match lock.clone().try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                info!("⏳ Waiting for podcast generation for {}", date);
                lock.lock_owned().await
            }
        }
    }

    async fn release_date(&self, date: &str) {
        let mut locks = self.date_locks.lock().await;
        if locks.get(date).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(date);
        }
    }
}
