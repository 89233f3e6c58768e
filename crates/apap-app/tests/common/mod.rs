#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use apap_app::{limits::AdmissionGate, retry::RetryController, retry::RetryPolicy, state::AppState};
use apap_core::Marketplace;
use apap_upstream::{Bytes, Credentials, ItemLookup, LookupRequest, StatusCode, UpstreamError};
use async_trait::async_trait;
use axum::Router;

/// Returns 503 for the first `failures` calls, then `body`.
pub struct FakeUpstream {
    pub failures: u32,
    pub body: Bytes,
    pub calls: Mutex<Vec<String>>,
}

impl FakeUpstream {
    pub fn ok(body: &'static [u8]) -> Arc<Self> {
        Self::flaky(0, body)
    }

    pub fn flaky(failures: u32, body: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            failures,
            body: Bytes::from_static(body),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ItemLookup for FakeUpstream {
    async fn get_item(&self, req: &LookupRequest) -> Result<Bytes, UpstreamError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(req.asin().to_string());
            calls.len() as u32
        };
        if n <= self.failures {
            return Err(UpstreamError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "Service Unavailable".to_string(),
            });
        }
        Ok(self.body.clone())
    }
}

pub fn router(upstream: Arc<FakeUpstream>, max_retries: u32) -> Router {
    let policy = RetryPolicy {
        max_retries,
        request_delay: Duration::ZERO,
        retry_backoff: Duration::ZERO,
    };
    let state = Arc::new(AppState {
        lookups: RetryController::new(Arc::new(AdmissionGate::new()), upstream, policy),
        marketplace: Marketplace::Japan,
        credentials: Arc::new(Credentials {
            partner_tag: "shop-22".into(),
            access_key: "AK".into(),
            secret_key: "SK".into(),
        }),
    });
    apap_app::app::build_router().with_state(state)
}
