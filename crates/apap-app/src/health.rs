use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{cli, state::AppState};

#[derive(Serialize)]
struct HealthResp<'a> {
    status: &'a str,
    version: &'a str,
    marketplace: &'a str,
}

// Never touches the admission gate.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResp {
        status: "ok",
        version: cli::VERSION,
        marketplace: state.marketplace.name(),
    })
}
