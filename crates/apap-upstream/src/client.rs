use std::time::Duration;

use apap_core::crypto::sigv4::{self, SigningParams};
use async_trait::async_trait;
use bytes::Bytes;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};
use tracing::{debug, info};
use url::Url;

use crate::{error::UpstreamError, query::GetItemsQuery, request::LookupRequest};

pub const GET_ITEMS_PATH: &str = "/paapi5/getitems";
pub const GET_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems";
pub const SERVICE: &str = "ProductAdvertisingAPI";
const CONTENT_ENCODING: &str = "amz-1.0";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";

const AMZ_DATE: &[FormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]Z");

/// Issues one upstream call for one ASIN.
///
/// Implementations do no retrying or rate limiting of their own.
#[async_trait]
pub trait ItemLookup: Send + Sync {
    async fn get_item(&self, request: &LookupRequest) -> Result<Bytes, UpstreamError>;
}

/// PA-API 5.0 `GetItems` client.
#[derive(Clone)]
pub struct PaapiClient {
    http: reqwest::Client,
}

impl PaapiClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// HTTP client bounded by a connect timeout and a total per-call timeout.
    pub fn with_timeouts(connect: Duration, total: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(total)
            .build()?;
        info!(
            connect_timeout_ms = connect.as_millis() as u64,
            timeout_ms = total.as_millis() as u64,
            "PA-API client ready"
        );
        Ok(Self::new(http))
    }

    /// Builds the signed request without sending it.
    pub fn build_request(
        &self,
        req: &LookupRequest,
        now: OffsetDateTime,
    ) -> Result<reqwest::Request, UpstreamError> {
        let marketplace = req.marketplace();
        let host = marketplace.host();
        let url = Url::parse(&format!("https://{host}{GET_ITEMS_PATH}"))?;
        let body = serde_json::to_vec(&GetItemsQuery::for_request(req))?;
        let amz_date = now.format(AMZ_DATE)?;

        let creds = req.credentials();
        let params = SigningParams {
            access_key: &creds.access_key,
            secret_key: &creds.secret_key,
            region: marketplace.region(),
            service: SERVICE,
            amz_date: &amz_date,
        };
        let signed = [
            ("content-encoding", CONTENT_ENCODING),
            ("host", host),
            ("x-amz-date", amz_date.as_str()),
            ("x-amz-target", GET_ITEMS_TARGET),
        ];
        let authorization = sigv4::authorization(&params, "POST", GET_ITEMS_PATH, &signed, &body);

        let mut out = self.http.post(url);
        for (name, value) in signed {
            out = out.header(name, value);
        }
        let request = out
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .body(body)
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl ItemLookup for PaapiClient {
    async fn get_item(&self, req: &LookupRequest) -> Result<Bytes, UpstreamError> {
        let request = self.build_request(req, OffsetDateTime::now_utc())?;
        debug!(asin = %req.asin(), marketplace = %req.marketplace(), "sending GetItems");

        let resp = self.http.execute(request).await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body)
    }
}
