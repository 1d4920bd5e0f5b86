use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod pipeline;
pub mod state;

pub use pipeline::{PodcastPipeline, ReadFailurePolicy};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/news", get(handlers::get_news))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use nc_core::{PodcastRecord, Result, Error};
    pub use crate::{create_app, AppState, PodcastPipeline, ReadFailurePolicy};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{harness, Harness};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use nc_core::{today_utc, PodcastRecord, PodcastStore};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(h: Harness) -> (Router, Arc<nc_storage::backends::memory::MemoryStorage>) {
        let storage = h.storage.clone();
        (create_app(AppState::new(Arc::new(h.pipeline))), storage)
    }

    fn news_request() -> Request<Body> {
        Request::builder()
            .uri("/news")
            .header("origin", "https://example.com")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_news_returns_todays_record() {
        let (router, storage) = app(harness(Some("Hello\n\nworld   now")));

        let response = router.oneshot(news_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let record: PodcastRecord = serde_json::from_slice(&body).unwrap();
        let today = today_utc();
        assert_eq!(record.date, today);
        assert_eq!(record.filename, format!("daily-news-{}.mp3", today));
        assert_eq!(storage.get(&today).await.unwrap(), Some(record));

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("audioUrl").is_some());
        assert!(json.get("newsLinks").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_get_news_failure_is_generic_500() {
        let (router, storage) = app(harness(None));

        let response = router.oneshot(news_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Failed to generate podcast" }));
        assert_eq!(storage.len().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (router, _) = app(harness(Some("script")));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
