use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use nc_core::{Error, InferenceModel, Result};
use crate::{Config, SYSTEM_INSTRUCTION};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_MODEL_ID: &str = "deepseek-chat";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Any OpenAI-compatible chat completion endpoint, DeepSeek by default.
pub struct DeepSeekModel {
    client: Client,
    api_key: String,
    model_id: String,
    base_url: String,
}

impl fmt::Debug for DeepSeekModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSeekModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DeepSeekModel {
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("DeepSeek API key is required".to_string()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model_id: config.model_id.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl InferenceModel for DeepSeekModel {
    fn name(&self) -> &str {
        "DeepSeek"
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let request = ChatRequest {
            model: &self.model_id,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_INSTRUCTION },
                ChatMessage { role: "user", content: prompt },
            ],
        };

        let response = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Summarization(format!("DeepSeek request failed: {}", e)))?
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::Summarization(format!("Invalid DeepSeek response: {}", e)))?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn model(base_url: String) -> DeepSeekModel {
        DeepSeekModel::new(Config {
            model_name: "deepseek".to_string(),
            api_key: Some("test-key".to_string()),
            model_id: None,
            base_url: Some(base_url),
        })
        .unwrap()
    }

    #[test]
    fn test_model_requires_api_key() {
        let result = DeepSeekModel::new(Config {
            model_name: "deepseek".to_string(),
            api_key: Some(String::new()),
            ..Config::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_generate_reads_first_choice() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                assert_eq!(body["model"], "deepseek-chat");
                assert_eq!(body["messages"][1]["content"], "Tell me the news");
                Json(json!({ "choices": [{ "message": { "role": "assistant", "content": "Hello there" } }] }))
            }),
        );
        let model = model(serve(router).await);

        let text = model.generate("Tell me the news").await.unwrap();
        assert_eq!(text.as_deref(), Some("Hello there"));
    }

    #[tokio::test]
    async fn test_generate_with_no_choices() {
        let router = Router::new().route("/chat/completions", post(|| async { Json(json!({ "choices": [] })) }));
        let model = model(serve(router).await);

        assert_eq!(model.generate("prompt").await.unwrap(), None);
    }
}
