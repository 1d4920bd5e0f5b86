use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const BROADCAST_TITLE: &str = "Daily Tech News Broadcast";

/// One entry of the news feed, as handed to the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Raw article body, usually HTML.
    pub content: String,
    /// Publish date exactly as the feed spells it.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastScript {
    pub title: String,
    pub podcast_summary: String,
    pub news: Vec<NewsItem>,
}

/// The part of a [`NewsItem`] kept alongside a published episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsLink {
    pub title: String,
    pub link: String,
    pub date: String,
}

impl From<&NewsItem> for NewsLink {
    fn from(item: &NewsItem) -> Self {
        Self {
            title: item.title.clone(),
            link: item.link.clone(),
            date: item.date.clone(),
        }
    }
}

/// The daily episode. Stored under its `date`, which is also the response body
/// of the news endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastRecord {
    pub audio_url: String,
    pub filename: String,
    pub date: String,
    pub news_links: Vec<NewsLink>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(n: usize) -> NewsItem {
        NewsItem {
            title: format!("Story {}", n),
            link: format!("https://dev.to/story-{}", n),
            content: format!("<p>Body {}</p>", n),
            date: "Tue, 05 Mar 2024 08:00:00 +0000".to_string(),
        }
    }

    #[test]
    fn test_news_link_drops_content() {
        let items: Vec<NewsItem> = (0..3).map(item).collect();
        let links: Vec<NewsLink> = items.iter().map(NewsLink::from).collect();

        assert_eq!(links.len(), items.len());
        for (link, item) in links.iter().zip(&items) {
            assert_eq!(link.title, item.title);
            assert_eq!(link.link, item.link);
            assert_eq!(link.date, item.date);
        }
        let json = serde_json::to_value(&links[0]).unwrap();
        assert!(json.get("content").is_none());
    }

    #[test]
    fn test_record_json_shape() {
        let record = PodcastRecord {
            audio_url: "https://bucket.s3.us-east-1.amazonaws.com/daily-news-2024-03-05.mp3".to_string(),
            filename: "daily-news-2024-03-05.mp3".to_string(),
            date: "2024-03-05".to_string(),
            news_links: vec![NewsLink::from(&item(1))],
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["audioUrl"], record.audio_url.as_str());
        assert_eq!(json["newsLinks"][0]["title"], "Story 1");
        assert_eq!(json["createdAt"], "2024-03-05T10:30:00.000Z");

        let back: PodcastRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
