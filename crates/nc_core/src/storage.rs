use async_trait::async_trait;
use crate::types::PodcastRecord;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(PodcastRecord),
    /// A record for the same date was already stored; it is returned untouched.
    AlreadyExists(PodcastRecord),
}

impl CreateOutcome {
    pub fn into_record(self) -> PodcastRecord {
        match self {
            CreateOutcome::Created(record) | CreateOutcome::AlreadyExists(record) => record,
        }
    }
}

#[async_trait]
pub trait PodcastStore: Send + Sync {
    fn name(&self) -> &str;

    /// Look up the record stored under `date`.
    async fn get(&self, date: &str) -> Result<Option<PodcastRecord>>;

    /// Store `record` under `record.date` unless one already exists.
    async fn create(&self, record: &PodcastRecord) -> Result<CreateOutcome>;
}
