use std::collections::hash_map::Entry;
use std::collections::HashMap;
use async_trait::async_trait;
use nc_core::{CreateOutcome, PodcastRecord, PodcastStore, Result};
use tokio::sync::RwLock;

/// Process-local store. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, PodcastRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl PodcastStore for MemoryStorage {
    fn name(&self) -> &str {
        "Memory"
    }

    async fn get(&self, date: &str) -> Result<Option<PodcastRecord>> {
        Ok(self.records.read().await.get(date).cloned())
    }

    async fn create(&self, record: &PodcastRecord) -> Result<CreateOutcome> {
        let mut records = self.records.write().await;
        Ok(match records.entry(record.date.clone()) {
            Entry::Occupied(existing) => CreateOutcome::AlreadyExists(existing.get().clone()),
            Entry::Vacant(slot) => CreateOutcome::Created(slot.insert(record.clone()).clone()),
        })
    }
}
