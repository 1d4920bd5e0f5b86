use std::path::Path;
use std::str::FromStr;
use async_trait::async_trait;
use nc_core::types::iso_millis;
use nc_core::{CreateOutcome, Error, NewsLink, PodcastRecord, PodcastStore, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS podcasts (
        date TEXT PRIMARY KEY,
        audio_url TEXT NOT NULL,
        filename TEXT NOT NULL,
        news_links TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

pub struct SQLiteStorage {
    pool: SqlitePool,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(|e| Error::Config(format!("Invalid SQLite path {}: {}", db_path.display(), e)))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Config(format!("Failed to open database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Config(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }
}

fn record_from_row(row: &SqliteRow) -> Result<PodcastRecord> {
    let news_links: String = row.get("news_links");
    let created_at: String = row.get("created_at");
    Ok(PodcastRecord {
        audio_url: row.get("audio_url"),
        filename: row.get("filename"),
        date: row.get("date"),
        news_links: serde_json::from_str::<Vec<NewsLink>>(&news_links)
            .map_err(|e| Error::CacheRead(format!("Invalid news links: {}", e)))?,
        created_at: iso_millis::parse(&created_at)
            .map_err(|e| Error::CacheRead(format!("Invalid created_at {}: {}", created_at, e)))?,
    })
}

#[async_trait]
impl PodcastStore for SQLiteStorage {
    fn name(&self) -> &str {
        "SQLite"
    }

    async fn get(&self, date: &str) -> Result<Option<PodcastRecord>> {
        let row = sqlx::query("SELECT * FROM podcasts WHERE date = ?")
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::CacheRead(format!("Failed to read podcast {}: {}", date, e)))?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn create(&self, record: &PodcastRecord) -> Result<CreateOutcome> {
        let news_links = serde_json::to_string(&record.news_links)?;

        let result = sqlx::query(
            r#"
            INSERT INTO podcasts (date, audio_url, filename, news_links, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(date) DO NOTHING
            "#,
        )
        .bind(&record.date)
        .bind(&record.audio_url)
        .bind(&record.filename)
        .bind(news_links)
        .bind(iso_millis::format(&record.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| Error::CacheWrite(format!("Failed to store podcast {}: {}", record.date, e)))?;

        if result.rows_affected() == 1 {
            return Ok(CreateOutcome::Created(record.clone()));
        }

        let existing = self.get(&record.date).await?.ok_or_else(|| {
            Error::CacheWrite(format!("Podcast {} conflicted but is missing", record.date))
        })?;
        Ok(CreateOutcome::AlreadyExists(existing))
    }
}
