use std::sync::Arc;

use apap_core::Marketplace;
use apap_upstream::{Credentials, ItemLookup};

use crate::{limits::AdmissionGate, retry::RetryController, settings::Settings};

pub struct AppState {
    pub lookups: RetryController,
    pub marketplace: Marketplace,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(settings: &Settings, upstream: Arc<dyn ItemLookup>) -> Self {
        let gate = Arc::new(AdmissionGate::new());
        Self {
            lookups: RetryController::new(gate, upstream, settings.retry.clone()),
            marketplace: settings.marketplace,
            credentials: Arc::new(settings.credentials.clone()),
        }
    }
}
