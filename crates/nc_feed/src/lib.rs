pub mod fetcher;
pub mod parser;

pub use fetcher::{FeedConfig, FeedFetcher, DEFAULT_NEWS_COUNT};
pub use parser::parse_feed;

pub mod prelude {
    pub use super::{FeedConfig, FeedFetcher};
    pub use nc_core::{NewsItem, NewsSource, Result, Error};
}
