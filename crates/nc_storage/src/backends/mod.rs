pub mod firestore;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use firestore::{FirestoreConfig, FirestoreStorage};
pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteStorage;
