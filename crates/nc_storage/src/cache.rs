use std::sync::Arc;
use chrono::Utc;
use nc_core::{CreateOutcome, Error, PodcastRecord, PodcastStore, Result};
use tracing::{debug, warn};

/// Result of looking up a day's episode. A failed read is reported as such
/// and the caller decides what it means.
#[derive(Debug)]
pub enum CacheLookup {
    Found(PodcastRecord),
    NotFound,
    ReadFailed(Error),
}

/// One [`PodcastRecord`] per calendar date, keyed by that date.
#[derive(Clone)]
pub struct DailyCache {
    store: Arc<dyn PodcastStore>,
}

impl DailyCache {
    pub fn new(store: Arc<dyn PodcastStore>) -> Self {
        Self { store }
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    pub async fn get(&self, date: &str) -> CacheLookup {
        match self.store.get(date).await {
            Ok(Some(record)) if record.date == date => CacheLookup::Found(record),
            Ok(Some(record)) => {
                warn!("Document {} carries date {}", date, record.date);
                CacheLookup::ReadFailed(Error::CacheRead(format!(
                    "Document {} carries mismatched date {}",
                    date, record.date
                )))
            }
            Ok(None) => {
                debug!("No podcast stored for {}", date);
                CacheLookup::NotFound
            }
            Err(e @ Error::CacheRead(_)) => CacheLookup::ReadFailed(e),
            Err(e) => CacheLookup::ReadFailed(Error::CacheRead(e.to_string())),
        }
    }

    /// Stamps `created_at` and stores the record under its date unless one is
    /// already there, in which case the stored record wins.
    pub async fn put(&self, mut record: PodcastRecord) -> Result<CreateOutcome> {
        record.created_at = Utc::now();
        let outcome = match self.store.create(&record).await {
            Ok(outcome) => outcome,
            Err(e @ Error::CacheWrite(_)) => return Err(e),
            Err(e) => return Err(Error::CacheWrite(e.to_string())),
        };

        let stored = match &outcome {
            CreateOutcome::Created(stored) | CreateOutcome::AlreadyExists(stored) => stored,
        };
        if stored.date != record.date {
            return Err(Error::CacheWrite(format!(
                "Document {} carries mismatched date {}",
                record.date, stored.date
            )));
        }
        Ok(outcome)
    }
}
