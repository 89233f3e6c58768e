use axum::{
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use apap_upstream::LookupRequest;

use crate::{error::LookupError, state::AppState};

pub const ITEMS_PREFIX: &str = "/items";

/// `GET /items/{asin}`: the upstream JSON is returned byte for byte.
pub async fn get_item(State(state): State<Arc<AppState>>, Path(asin): Path<String>) -> Response {
    let Some(req) = LookupRequest::new(asin, state.marketplace, Arc::clone(&state.credentials))
    else {
        return LookupError::EmptyAsin.into_response();
    };

    match state.lookups.lookup(&req).await {
        Ok(payload) => ([(header::CONTENT_TYPE, "application/json")], payload).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Catches `/items` and `/items/`, which the wildcard route does not match.
pub async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path.trim_end_matches('/') == ITEMS_PREFIX {
        return LookupError::EmptyAsin.into_response();
    }
    (StatusCode::NOT_FOUND, "not found").into_response()
}
