use std::sync::Arc;
use nc_core::types::BROADCAST_TITLE;
use nc_core::{BroadcastScript, Error, InferenceModel, NewsItem, Result};
use tracing::{debug, info};

const BROADCAST_BRIEF: &str = "\
Write a concise tech news podcast broadcast of about two minutes that summarizes the stories below, \
as a news anchor presenting a focused daily roundup. Aim for roughly 300 to 350 words of speech. \
Keep the tone professional but engaging and let it flow naturally.

Structure it as:
1. An introduction of about 15 seconds that welcomes listeners and sets up today's tech news.
2. About 20 to 25 seconds per story covering the main development, a quick technical explanation and a short note on its impact.
3. Short spoken transitions between stories.
4. A conclusion of about 15 seconds with the key takeaways.

The text goes straight to a text-to-speech engine. Use plain words and simple punctuation for natural pauses. \
Do not use line breaks, special characters, lists or any formatting.";

const BROADCAST_REMINDER: &str = "\
Answer with plain text only: one single flowing paragraph that reads naturally aloud in about two minutes, \
with no line breaks, special characters or formatting.";

/// Builds the broadcast prompt from the day's news.
pub fn build_prompt(news: &[NewsItem]) -> String {
    let stories = news
        .iter()
        .map(|item| {
            format!(
                "Title: {}\nDate: {}\nContent: {}\nLink: {}\n---",
                item.title, item.date, item.content, item.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nNews stories:\n{}\n\n{}",
        BROADCAST_BRIEF, stories, BROADCAST_REMINDER
    )
}

/// Whitespace as ECMAScript's `\s` defines it. Unlike `char::is_whitespace`
/// this includes U+FEFF and excludes U+0085.
fn is_script_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Line breaks become spaces, whitespace runs collapse to one space, and the
/// ends are trimmed.
pub fn normalize_script(raw: &str) -> String {
    let mut script = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars() {
        if is_script_whitespace(c) {
            pending_space = !script.is_empty();
        } else {
            if pending_space {
                script.push(' ');
                pending_space = false;
            }
            script.push(c);
        }
    }

    script
}

pub struct Summarizer {
    model: Arc<dyn InferenceModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn summarize(&self, news: Vec<NewsItem>) -> Result<BroadcastScript> {
        info!("🤖 Summarizing {} stories with {}", news.len(), self.model.name());
        let prompt = build_prompt(&news);
        debug!("Broadcast prompt is {} bytes", prompt.len());

        let raw = self
            .model
            .generate(&prompt)
            .await?
            .ok_or_else(|| Error::Summarization("No response from model".to_string()))?;

        let podcast_summary = normalize_script(&raw);
        if podcast_summary.is_empty() {
            return Err(Error::Summarization("Model returned an empty script".to_string()));
        }
        info!("✨ Script ready ({} words)", podcast_summary.split(' ').count());

        Ok(BroadcastScript {
            title: BROADCAST_TITLE.to_string(),
            podcast_summary,
            news,
        })
    }
}
