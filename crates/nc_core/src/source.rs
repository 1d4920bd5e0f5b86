use async_trait::async_trait;
use crate::types::NewsItem;
use crate::Result;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Returns a human readable name for logs
    fn name(&self) -> &str;

    /// Fetch the newest items, in the order the source lists them
    async fn fetch_news(&self) -> Result<Vec<NewsItem>>;
}
