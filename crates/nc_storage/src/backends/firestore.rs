use std::fmt;
use async_trait::async_trait;
use nc_core::types::iso_millis;
use nc_core::{CreateOutcome, Error, NewsLink, PodcastRecord, PodcastStore, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_COLLECTION: &str = "news";

#[derive(Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    pub collection: String,
    pub base_url: Option<String>,
}

impl fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .field("collection", &self.collection)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FirestoreConfig {
    pub fn new(project_id: &str, api_key: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            base_url: None,
        }
    }
}

/// Firestore through its REST API. One document per date, the date being the
/// document id.
pub struct FirestoreStorage {
    client: Client,
    documents_url: String,
    api_key: String,
}

impl FirestoreStorage {
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::Config("Firestore project id is required".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("Firestore API key is required".to_string()));
        }
        if config.collection.trim().is_empty() {
            return Err(Error::Config("Firestore collection must not be empty".to_string()));
        }

        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
        Ok(Self {
            client: Client::new(),
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents/{}",
                base_url, config.project_id, config.collection
            ),
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl PodcastStore for FirestoreStorage {
    fn name(&self) -> &str {
        "Firestore"
    }

    async fn get(&self, date: &str) -> Result<Option<PodcastRecord>> {
        let response = self
            .client
            .get(format!("{}/{}", self.documents_url, date))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::CacheRead(format!("Firestore request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document = response
                    .json::<Value>()
                    .await
                    .map_err(|e| Error::CacheRead(format!("Invalid Firestore document: {}", e)))?;
                decode_record(&document).map(Some)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::CacheRead(format!(
                    "Firestore answered with status {}: {}",
                    status, body
                )))
            }
        }
    }

    async fn create(&self, record: &PodcastRecord) -> Result<CreateOutcome> {
        let response = self
            .client
            .post(&self.documents_url)
            .query(&[("documentId", record.date.as_str()), ("key", self.api_key.as_str())])
            .json(&json!({ "fields": encode_fields(record) }))
            .send()
            .await
            .map_err(|e| Error::CacheWrite(format!("Firestore request failed: {}", e)))?;

        match response.status() {
            StatusCode::CONFLICT => {
                debug!("Document {} already exists", record.date);
                let existing = self.get(&record.date).await?.ok_or_else(|| {
                    Error::CacheWrite(format!(
                        "Document {} reported as existing but could not be read",
                        record.date
                    ))
                })?;
                Ok(CreateOutcome::AlreadyExists(existing))
            }
            status if status.is_success() => Ok(CreateOutcome::Created(record.clone())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::CacheWrite(format!(
                    "Firestore answered with status {}: {}",
                    status, body
                )))
            }
        }
    }
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

/// Firestore value encoding of a record. `createdAt` is kept as an ISO string.
pub fn encode_fields(record: &PodcastRecord) -> Value {
    let links: Vec<Value> = record
        .news_links
        .iter()
        .map(|link| {
            json!({
                "mapValue": {
                    "fields": {
                        "title": string_value(&link.title),
                        "link": string_value(&link.link),
                        "date": string_value(&link.date),
                    }
                }
            })
        })
        .collect();

    json!({
        "audioUrl": string_value(&record.audio_url),
        "filename": string_value(&record.filename),
        "date": string_value(&record.date),
        "newsLinks": { "arrayValue": { "values": links } },
        "createdAt": string_value(&iso_millis::format(&record.created_at)),
    })
}

fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    fields
        .get(name)
        .ok_or_else(|| Error::CacheRead(format!("Document is missing field {}", name)))
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String> {
    let value = field(fields, name)?;
    value
        .get("stringValue")
        .or_else(|| value.get("timestampValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::CacheRead(format!("Field {} is not a string", name)))
}

fn map_fields<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>> {
    value
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::CacheRead(format!("{} has no fields", context)))
}

pub fn decode_record(document: &Value) -> Result<PodcastRecord> {
    let fields = map_fields(document, "Document")?;

    // An empty array comes back without `values`.
    let links = field(fields, "newsLinks")?
        .get("arrayValue")
        .ok_or_else(|| Error::CacheRead("Field newsLinks is not an array".to_string()))?
        .get("values")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let news_links = links
        .iter()
        .map(|entry| {
            let link = entry
                .get("mapValue")
                .ok_or_else(|| Error::CacheRead("News link is not a map".to_string()))?;
            let link = map_fields(link, "News link")?;
            Ok(NewsLink {
                title: string_field(link, "title")?,
                link: string_field(link, "link")?,
                date: string_field(link, "date")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let created_at = string_field(fields, "createdAt")?;
    Ok(PodcastRecord {
        audio_url: string_field(fields, "audioUrl")?,
        filename: string_field(fields, "filename")?,
        date: string_field(fields, "date")?,
        news_links,
        created_at: iso_millis::parse(&created_at)
            .map_err(|e| Error::CacheRead(format!("Invalid createdAt {}: {}", created_at, e)))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode as HttpStatus, Uri};
    use axum::response::IntoResponse;
    use axum::{Json, Router};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    const DOCUMENTS_PATH: &str = "/v1/projects/demo/databases/(default)/documents/news";

    type Documents = Arc<Mutex<HashMap<String, Value>>>;

    fn record(date: &str) -> PodcastRecord {
        PodcastRecord {
            audio_url: format!("https://b.s3.us-east-1.amazonaws.com/daily-news-{}.mp3", date),
            filename: format!("daily-news-{}.mp3", date),
            date: date.to_string(),
            news_links: vec![
                NewsLink {
                    title: "Rust 1.80".to_string(),
                    link: "https://blog.rust-lang.org".to_string(),
                    date: "Thu, 25 Jul 2024 00:00:00 +0000".to_string(),
                },
                NewsLink {
                    title: "Linux 6.10".to_string(),
                    link: "https://kernel.org".to_string(),
                    date: "Sun, 14 Jul 2024 00:00:00 +0000".to_string(),
                },
            ],
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 6, 0, 0).unwrap(),
        }
    }

    /// Minimal stand-in for the two Firestore calls the store makes.
    async fn fake_firestore(documents: Documents) -> String {
        let handler = move |method: Method, uri: Uri, body: String| {
            let documents = documents.clone();
            async move {
                let query = uri.query().unwrap_or_default().to_string();
                assert!(query.contains("key=test-key"), "missing api key in {}", query);
                let mut documents = documents.lock().unwrap();

                if method == Method::GET {
                    let id = uri.path().trim_start_matches(DOCUMENTS_PATH).trim_start_matches('/');
                    return match documents.get(id) {
                        Some(fields) => Json(json!({
                            "name": format!("projects/demo/databases/(default)/documents/news/{}", id),
                            "fields": fields,
                        }))
                        .into_response(),
                        None => (HttpStatus::NOT_FOUND, Json(json!({ "error": { "code": 404 } }))).into_response(),
                    };
                }

                assert_eq!(uri.path(), DOCUMENTS_PATH);
                let id = query
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("documentId="))
                    .unwrap()
                    .to_string();
                if documents.contains_key(&id) {
                    return (HttpStatus::CONFLICT, Json(json!({ "error": { "code": 409 } }))).into_response();
                }
                let body: Value = serde_json::from_str(&body).unwrap();
                documents.insert(id, body["fields"].clone());
                Json(body).into_response()
            }
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().fallback(handler)).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn storage(base_url: String) -> FirestoreStorage {
        let mut config = FirestoreConfig::new("demo", "test-key");
        config.base_url = Some(base_url);
        FirestoreStorage::new(config).unwrap()
    }

    #[test]
    fn test_encode_decode() {
        let record = record("2024-03-05");
        let fields = encode_fields(&record);
        assert_eq!(fields["date"]["stringValue"], "2024-03-05");
        assert_eq!(fields["createdAt"]["stringValue"], "2024-03-05T06:00:00.000Z");
        assert_eq!(
            fields["newsLinks"]["arrayValue"]["values"][1]["mapValue"]["fields"]["title"]["stringValue"],
            "Linux 6.10"
        );

        let decoded = decode_record(&json!({ "fields": fields })).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_empty_links_and_timestamp() {
        let document = json!({
            "fields": {
                "audioUrl": { "stringValue": "https://x" },
                "filename": { "stringValue": "daily-news-2024-03-05.mp3" },
                "date": { "stringValue": "2024-03-05" },
                "newsLinks": { "arrayValue": {} },
                "createdAt": { "timestampValue": "2024-03-05T06:00:00.123456Z" }
            }
        });
        let record = decode_record(&document).unwrap();
        assert!(record.news_links.is_empty());
        assert_eq!(record.created_at.timestamp(), 1709618400);
    }

    #[test]
    fn test_decode_missing_field() {
        let err = decode_record(&json!({ "fields": { "date": { "stringValue": "2024-03-05" } } })).unwrap_err();
        assert!(matches!(err, Error::CacheRead(_)));
    }

    #[tokio::test]
    async fn test_get_missing_document() {
        let storage = storage(fake_firestore(Documents::default()).await);
        assert_eq!(storage.get("2024-03-05").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let documents = Documents::default();
        let storage = storage(fake_firestore(documents.clone()).await);
        let record = record("2024-03-05");

        let outcome = storage.create(&record).await.unwrap();
        assert_eq!(outcome, CreateOutcome::Created(record.clone()));
        assert!(documents.lock().unwrap().contains_key("2024-03-05"));
        assert_eq!(storage.get("2024-03-05").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_create_conflict_returns_existing() {
        let storage = storage(fake_firestore(Documents::default()).await);
        let first = record("2024-03-05");
        storage.create(&first).await.unwrap();

        let mut second = record("2024-03-05");
        second.audio_url = "https://elsewhere".to_string();
        let outcome = storage.create(&second).await.unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists(first));
    }

    #[tokio::test]
    async fn test_server_error_is_read_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let router = Router::new().fallback(|| async { (HttpStatus::INTERNAL_SERVER_ERROR, "boom") });
            axum::serve(listener, router).await.unwrap();
        });
        let storage = storage(format!("http://{}/v1", addr));

        assert!(matches!(storage.get("2024-03-05").await, Err(Error::CacheRead(_))));
        assert!(matches!(storage.create(&record("2024-03-05")).await, Err(Error::CacheWrite(_))));
    }
}
