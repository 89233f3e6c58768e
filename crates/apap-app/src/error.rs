use apap_core::UnknownLocale;
use apap_upstream::UpstreamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Startup configuration failure. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid {var}: {source}")]
    Locale {
        var: &'static str,
        #[source]
        source: UnknownLocale,
    },
}

/// Terminal result of a lookup that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Asin is empty")]
    EmptyAsin,

    /// Error envelope embedded in a successful upstream response.
    #[error("{code} > {message}")]
    Logical { code: String, message: String },

    #[error("{0}")]
    Malformed(#[source] serde_json::Error),

    #[error("{source}")]
    Transport {
        attempts: u32,
        #[source]
        source: UpstreamError,
    },
}

impl LookupError {
    pub fn status(&self) -> StatusCode {
        match self {
            LookupError::EmptyAsin | LookupError::Logical { .. } => StatusCode::BAD_REQUEST,
            LookupError::Malformed(_) | LookupError::Transport { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let body = match self {
            LookupError::EmptyAsin => self.to_string(),
            _ => format!("Error: {self}"),
        };
        (self.status(), body).into_response()
    }
}
