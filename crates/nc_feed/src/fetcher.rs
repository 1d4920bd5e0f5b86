use async_trait::async_trait;
use nc_core::{Error, NewsItem, NewsSource, Result};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::parser::parse_feed;

pub const DEFAULT_NEWS_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: Url,
    pub news_count: usize,
}

impl FeedConfig {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::Config(format!("Invalid feed URL {}: {}", url, e)))?;
        Ok(Self {
            url,
            news_count: DEFAULT_NEWS_COUNT,
        })
    }

    pub fn with_news_count(mut self, news_count: usize) -> Self {
        self.news_count = news_count;
        self
    }
}

/// Reads a single RSS/Atom feed over HTTP.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    config: FeedConfig,
}

impl FeedFetcher {
    pub fn new(config: FeedConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: FeedConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl NewsSource for FeedFetcher {
    fn name(&self) -> &str {
        self.config.url.as_str()
    }

    async fn fetch_news(&self) -> Result<Vec<NewsItem>> {
        info!("📡 Fetching news from {}", self.config.url);
        let response = self
            .client
            .get(self.config.url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to reach {}: {}", self.config.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "Feed {} answered with status {}",
                self.config.url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read feed body: {}", e)))?;
        debug!("Feed body is {} bytes", body.len());

        let items = parse_feed(&body, self.config.news_count)?;
        info!("✨ Fetched {} news items", items.len());
        Ok(items)
    }
}
