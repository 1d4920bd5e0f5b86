use std::fmt;
use nc_core::{InferenceModel, Result};

/// Offline stand-in that reads the story titles back out of the prompt.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let titles: Vec<&str> = prompt
            .lines()
            .filter_map(|line| line.trim().strip_prefix("Title:"))
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .collect();

        if titles.is_empty() {
            return Ok(Some("Welcome to your daily tech news. It is a quiet day, see you tomorrow.".to_string()));
        }

        let mut script = String::from("Welcome to your daily tech news.\n");
        for title in &titles {
            script.push_str(&format!("Next up: {}.\n", title));
        }
        script.push_str("That's all for today, thanks for listening.");
        Ok(Some(script))
    }
}
