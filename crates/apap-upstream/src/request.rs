use std::{fmt, sync::Arc};

use apap_core::Marketplace;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub partner_tag: String,
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("partner_tag", &self.partner_tag)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// One product lookup. Built once per inbound call and reused unchanged for
/// every attempt.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    asin: String,
    marketplace: Marketplace,
    credentials: Arc<Credentials>,
}

impl LookupRequest {
    /// Returns `None` for an empty ASIN.
    pub fn new(
        asin: impl Into<String>,
        marketplace: Marketplace,
        credentials: Arc<Credentials>,
    ) -> Option<Self> {
        let asin = asin.into();
        if asin.is_empty() {
            return None;
        }
        Some(Self {
            asin,
            marketplace,
            credentials,
        })
    }

    pub fn asin(&self) -> &str {
        &self.asin
    }

    pub fn marketplace(&self) -> Marketplace {
        self.marketplace
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
