use axum::{extract::State, Json};
use std::collections::HashMap;

use crate::core::state::AppState;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let response = RootResponse {
        message: "EduLink Progress API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs_url: format!("{}/docs", state.settings().api().api_v1_str),
    };

    Json(response)
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut components = HashMap::new();

    let records = state.store().progress().await.len();
    components.insert("store".to_string(), "healthy".to_string());
    components.insert("progress_records".to_string(), records.to_string());

    Json(HealthResponse {
        service: "edulink-progress-api".to_string(),
        status: "healthy".to_string(),
        components,
    })
}
