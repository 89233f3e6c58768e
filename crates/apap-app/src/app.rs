use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;
use crate::{health, items};

pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health))
        .route("/items/*asin", get(items::get_item))
        .fallback(items::fallback)
}
