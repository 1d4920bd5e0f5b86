use std::path::PathBuf;
use std::sync::Arc;
use nc_core::{Error, PodcastStore, Result};
use tracing::info;

pub mod backends;
pub mod cache;

pub use backends::*;
pub use cache::{CacheLookup, DailyCache};

pub const AVAILABLE_BACKENDS: &[&str] = &["firestore", "memory", "sqlite"];

#[derive(Debug, Clone)]
pub enum StorageConfig {
    Firestore(FirestoreConfig),
    Memory,
    Sqlite { path: PathBuf },
}

impl StorageConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageConfig::Firestore(_) => "firestore",
            StorageConfig::Memory => "memory",
            StorageConfig::Sqlite { .. } => "sqlite",
        }
    }

    pub fn unknown_backend(name: &str) -> Error {
        Error::Config(format!(
            "Unknown storage backend '{}'. Available backends: {}",
            name,
            AVAILABLE_BACKENDS.join(", ")
        ))
    }
}

pub async fn create_storage(config: &StorageConfig) -> Result<Arc<dyn PodcastStore>> {
    let storage: Arc<dyn PodcastStore> = match config {
        StorageConfig::Firestore(firestore) => Arc::new(FirestoreStorage::new(firestore.clone())?),
        StorageConfig::Memory => Arc::new(MemoryStorage::new()),
        #[cfg(feature = "sqlite")]
        StorageConfig::Sqlite { path } => Arc::new(SQLiteStorage::new_with_path(path).await?),
        #[cfg(not(feature = "sqlite"))]
        StorageConfig::Sqlite { .. } => {
            return Err(Error::Config(
                "SQLite storage requires the `sqlite` feature".to_string(),
            ))
        }
    };
    info!("💾 Storage backend ready ({})", storage.name());
    Ok(storage)
}

pub mod prelude {
    pub use super::{create_storage, CacheLookup, DailyCache, StorageConfig};
    pub use nc_core::{CreateOutcome, PodcastRecord, PodcastStore, Result, Error};
}
