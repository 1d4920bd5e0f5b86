use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use nc_core::today_utc;
use serde_json::json;
use tracing::error;
use crate::AppState;

pub async fn get_news(State(state): State<Arc<AppState>>) -> Response {
    let date = today_utc();
    match state.pipeline.get_or_create(&date).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => {
            error!("❌ Failed to generate podcast for {}: {}", date, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate podcast" })),
            )
                .into_response()
        }
    }
}
