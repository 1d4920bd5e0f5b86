use std::sync::Arc;
use chrono::Utc;
use nc_core::{
    podcast_filename, Error, NewsItem, NewsLink, ObjectStore, PodcastRecord, Result,
    SpeechSynthesizer,
};
use tracing::info;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Turns a finished script into a hosted mp3 and the record describing it.
pub struct SpeechPublisher {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: Arc<dyn ObjectStore>,
}

impl SpeechPublisher {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, store: Arc<dyn ObjectStore>) -> Self {
        Self { synthesizer, store }
    }

    /// Synthesizes `script`, uploads it as `daily-news-{date}.mp3` and returns
    /// the record for `date`. An object uploaded before a later failure is
    /// left in place.
    pub async fn publish(&self, script: &str, news: &[NewsItem], date: &str) -> Result<PodcastRecord> {
        let filename = podcast_filename(date);

        info!("🎙️ Synthesizing speech with {}", self.synthesizer.name());
        let audio = self.synthesizer.synthesize(script).await?;
        if audio.is_empty() {
            return Err(Error::Publish(format!(
                "{} returned no audio",
                self.synthesizer.name()
            )));
        }
        info!("✨ Received {} bytes of audio", audio.len());

        info!("☁️ Uploading {} to {}", filename, self.store.name());
        self.store
            .put_object(&filename, audio, AUDIO_CONTENT_TYPE)
            .await?;

        Ok(PodcastRecord {
            audio_url: self.store.public_url(&filename),
            filename,
            date: date.to_string(),
            news_links: news.iter().map(NewsLink::from).collect(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::aws::s3_public_url;
    use crate::backends::memory::{DummySynthesizer, MemoryObjectStore};
    use async_trait::async_trait;

    struct FailingSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for FailingSynthesizer {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            Err(Error::Publish("voice unavailable".to_string()))
        }
    }

    struct SilentSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for SilentSynthesizer {
        fn name(&self) -> &str {
            "Silent"
        }

        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    /// Memory-backed store that hands out S3-style URLs.
    struct FakeBucket {
        inner: MemoryObjectStore,
    }

    #[async_trait]
    impl ObjectStore for FakeBucket {
        fn name(&self) -> &str {
            "FakeBucket"
        }

        async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
            self.inner.put_object(key, body, content_type).await
        }

        fn public_url(&self, key: &str) -> String {
            s3_public_url("news-bucket", "us-west-2", key)
        }
    }

    fn news() -> Vec<NewsItem> {
        (1..=3)
            .map(|i| NewsItem {
                title: format!("Story {}", i),
                link: format!("https://dev.to/{}", i),
                content: "long body".to_string(),
                date: format!("2024-03-0{}", i),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_publish_uploads_and_builds_record() {
        let bucket = Arc::new(FakeBucket { inner: MemoryObjectStore::new() });
        let publisher = SpeechPublisher::new(Arc::new(DummySynthesizer::new()), bucket.clone());

        let record = publisher.publish("Hello listeners", &news(), "2024-03-05").await.unwrap();

        assert_eq!(record.filename, "daily-news-2024-03-05.mp3");
        assert_eq!(record.date, "2024-03-05");
        assert_eq!(
            record.audio_url,
            "https://news-bucket.s3.us-west-2.amazonaws.com/daily-news-2024-03-05.mp3"
        );
        let titles: Vec<_> = record.news_links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Story 1", "Story 2", "Story 3"]);

        let object = bucket.inner.get("daily-news-2024-03-05.mp3").await.unwrap();
        assert_eq!(object.content_type, "audio/mpeg");
        assert_eq!(object.body, b"ID3Hello listeners".to_vec());
    }

    #[tokio::test]
    async fn test_synthesis_failure_uploads_nothing() {
        let store = Arc::new(MemoryObjectStore::new());
        let publisher = SpeechPublisher::new(Arc::new(FailingSynthesizer), store.clone());

        let err = publisher.publish("Hello", &news(), "2024-03-05").await.unwrap_err();
        assert!(matches!(err, Error::Publish(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected() {
        let store = Arc::new(MemoryObjectStore::new());
        let publisher = SpeechPublisher::new(Arc::new(SilentSynthesizer), store.clone());

        let err = publisher.publish("Hello", &news(), "2024-03-05").await.unwrap_err();
        assert!(matches!(err, Error::Publish(_)));
        assert_eq!(store.len().await, 0);
    }
}
