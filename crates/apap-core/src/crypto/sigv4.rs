//! AWS Signature Version 4 primitives.
//!
//! Only what a JSON `POST` with no query string needs: canonical request,
//! string to sign, derived signing key and the final `Authorization` value.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Everything that scopes a signature besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct SigningParams<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
    /// `YYYYMMDDTHHMMSSZ`, the same value sent as `x-amz-date`.
    pub amz_date: &'a str,
}

impl SigningParams<'_> {
    fn date_stamp(&self) -> &str {
        self.amz_date.get(..8).unwrap_or(self.amz_date)
    }

    pub fn scope(&self) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            self.date_stamp(),
            self.region,
            self.service
        )
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub fn signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Returns the canonical request and the `;`-joined signed header list.
///
/// Header names are lowercased and sorted; values are trimmed.
pub fn canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &[(&str, &str)],
    payload: &[u8],
) -> (String, String) {
    let mut normalized: Vec<(String, &str)> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .collect();
    normalized.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers: String = normalized
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = normalized
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical = format!(
        "{method}\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{}",
        sha256_hex(payload)
    );
    (canonical, signed_headers)
}

pub fn string_to_sign(params: &SigningParams<'_>, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{}\n{}\n{}",
        params.amz_date,
        params.scope(),
        sha256_hex(canonical_request.as_bytes())
    )
}

/// Signs the request and returns the `Authorization` header value.
pub fn authorization(
    params: &SigningParams<'_>,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    payload: &[u8],
) -> String {
    let (canonical, signed_headers) = canonical_request(method, path, "", headers, payload);
    let to_sign = string_to_sign(params, &canonical);
    let key = signing_key(
        params.secret_key,
        params.date_stamp(),
        params.region,
        params.service,
    );
    let signature = hex::encode(hmac_sha256(&key, to_sign.as_bytes()));

    format!(
        "{ALGORITHM} Credential={}/{}, SignedHeaders={signed_headers}, Signature={signature}",
        params.access_key,
        params.scope()
    )
}
