use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to encode GetItems request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to format request timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("upstream responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}
