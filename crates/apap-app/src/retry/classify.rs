use apap_upstream::Bytes;
use serde::Deserialize;

/// What a successful transport response actually carried.
#[derive(Debug)]
pub enum PayloadClass {
    Success(Bytes),
    Logical { code: String, message: String },
    Malformed(serde_json::Error),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Errors", alias = "errors", default)]
    errors: Option<Vec<ApiError>>,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(rename = "Code", alias = "code", default)]
    code: String,
    #[serde(rename = "Message", alias = "message", default)]
    message: String,
}

/// Looks for an embedded error envelope and reports the first entry.
///
/// The rest of the document is skipped, not validated.
pub fn classify_payload(payload: Bytes) -> PayloadClass {
    let envelope: Envelope = match serde_json::from_slice(&payload) {
        Ok(e) => e,
        Err(e) => return PayloadClass::Malformed(e),
    };

    match envelope.errors.and_then(|errs| errs.into_iter().next()) {
        Some(first) => PayloadClass::Logical {
            code: first.code,
            message: first.message,
        },
        None => PayloadClass::Success(payload),
    }
}
