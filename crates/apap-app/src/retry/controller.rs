//! Attempt loop for one logical lookup.
//!
//! Every attempt goes through the shared [`AdmissionGate`]: acquire, wait the
//! pre-dispatch delay, call upstream, release. Every transport error loops
//! until the retry budget is spent; envelope errors and unparseable payloads
//! end the lookup on first sight. The backoff is waited outside the gate.

use std::sync::Arc;

use apap_upstream::{Bytes, ItemLookup, LookupRequest, UpstreamError};
use tracing::{error, info, warn};

use super::{
    classify::{classify_payload, PayloadClass},
    policy::RetryPolicy,
};
use crate::{error::LookupError, limits::AdmissionGate};

/// Per-lookup retry counter. Never shared between lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptState {
    pub attempt_number: u32,
}

#[derive(Debug)]
enum UpstreamOutcome {
    Success(Bytes),
    LogicalError { code: String, message: String },
    Malformed(serde_json::Error),
    TransportError(UpstreamError),
}

pub struct RetryController {
    gate: Arc<AdmissionGate>,
    upstream: Arc<dyn ItemLookup>,
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(gate: Arc<AdmissionGate>, upstream: Arc<dyn ItemLookup>, policy: RetryPolicy) -> Self {
        Self {
            gate,
            upstream,
            policy,
        }
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    async fn dispatch(&self, req: &LookupRequest) -> UpstreamOutcome {
        let token = self.gate.acquire().await;
        if !self.policy.request_delay.is_zero() {
            tokio::time::sleep(self.policy.request_delay).await;
        }
        let result = self.upstream.get_item(req).await;
        token.release();

        match result {
            Ok(payload) => match classify_payload(payload) {
                PayloadClass::Success(bytes) => UpstreamOutcome::Success(bytes),
                PayloadClass::Logical { code, message } => {
                    UpstreamOutcome::LogicalError { code, message }
                }
                PayloadClass::Malformed(e) => UpstreamOutcome::Malformed(e),
            },
            Err(e) => UpstreamOutcome::TransportError(e),
        }
    }

    /// Drives `req` to a terminal state.
    pub async fn lookup(&self, req: &LookupRequest) -> Result<Bytes, LookupError> {
        let mut state = AttemptState::default();

        loop {
            match self.dispatch(req).await {
                UpstreamOutcome::Success(payload) => return Ok(payload),

                UpstreamOutcome::LogicalError { code, message } => {
                    info!(asin = %req.asin(), code = %code, message = %message, "upstream rejected lookup");
                    return Err(LookupError::Logical { code, message });
                }

                UpstreamOutcome::Malformed(e) => {
                    error!(asin = %req.asin(), error = %e, "unparseable upstream payload");
                    return Err(LookupError::Malformed(e));
                }

                UpstreamOutcome::TransportError(err) => {
                    if state.attempt_number >= self.policy.max_retries {
                        error!(
                            asin = %req.asin(),
                            attempts = state.attempt_number + 1,
                            error = %err,
                            "upstream lookup failed"
                        );
                        return Err(LookupError::Transport {
                            attempts: state.attempt_number + 1,
                            source: err,
                        });
                    }

                    warn!(
                        asin = %req.asin(),
                        attempt = state.attempt_number,
                        max_retries = self.policy.max_retries,
                        error = %err,
                        "retrying upstream lookup"
                    );
                    if !self.policy.retry_backoff.is_zero() {
                        tokio::time::sleep(self.policy.retry_backoff).await;
                    }
                    state.attempt_number += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apap_core::Marketplace;
    use apap_upstream::{Credentials, StatusCode};
    use async_trait::async_trait;
    use std::{
        sync::Mutex,
        time::{Duration, Instant},
    };

    const OK_BODY: &[u8] = br#"{"ItemsResult":{"Items":[{"ASIN":"B00TEST"}]}}"#;

    /// Fails with `status` for the first `failures` calls, then returns `body`.
    struct Scripted {
        failures: u32,
        status: StatusCode,
        body: Bytes,
        hold: Duration,
        calls: Mutex<Vec<(String, Marketplace)>>,
        intervals: Mutex<Vec<(Instant, Instant)>>,
    }

    impl Scripted {
        fn new(failures: u32, body: &'static [u8]) -> Self {
            Self {
                failures,
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: Bytes::from_static(body),
                hold: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
                intervals: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Marketplace)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ItemLookup for Scripted {
        async fn get_item(&self, req: &LookupRequest) -> Result<Bytes, UpstreamError> {
            let start = Instant::now();
            let n = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((req.asin().to_string(), req.marketplace()));
                calls.len() as u32
            };
            if !self.hold.is_zero() {
                tokio::time::sleep(self.hold).await;
            }
            self.intervals.lock().unwrap().push((start, Instant::now()));

            if n <= self.failures {
                return Err(UpstreamError::Status {
                    status: self.status,
                    body: format!("failure {n}"),
                });
            }
            Ok(self.body.clone())
        }
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            request_delay: Duration::ZERO,
            retry_backoff: Duration::ZERO,
        }
    }

    fn controller(upstream: Arc<Scripted>, policy: RetryPolicy) -> RetryController {
        RetryController::new(Arc::new(AdmissionGate::new()), upstream, policy)
    }

    fn request(asin: &str) -> LookupRequest {
        let creds = Arc::new(Credentials {
            partner_tag: "shop-22".into(),
            access_key: "AK".into(),
            secret_key: "SK".into(),
        });
        LookupRequest::new(asin, Marketplace::Japan, creds).unwrap()
    }

    #[tokio::test]
    async fn success_returns_payload_verbatim() {
        let upstream = Arc::new(Scripted::new(0, OK_BODY));
        let c = controller(upstream.clone(), policy(3));

        let out = c.lookup(&request("B00TEST")).await.unwrap();

        assert_eq!(&out[..], OK_BODY);
        assert_eq!(upstream.calls().len(), 1);
    }

    #[tokio::test]
    async fn transient_failures_then_success() {
        for k in 0..=3 {
            let upstream = Arc::new(Scripted::new(k, OK_BODY));
            let c = controller(upstream.clone(), policy(3));

            let out = c.lookup(&request("B00TEST")).await.unwrap();

            assert_eq!(&out[..], OK_BODY);
            assert_eq!(upstream.calls().len() as u32, k + 1);
        }
    }

    #[tokio::test]
    async fn exhausts_after_max_retries_plus_one_calls() {
        let upstream = Arc::new(Scripted::new(u32::MAX, OK_BODY));
        let c = controller(upstream.clone(), policy(2));

        let err = c.lookup(&request("B00TEST")).await.unwrap_err();

        assert_eq!(upstream.calls().len(), 3);
        match err {
            LookupError::Transport { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("failure 3"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_retries_means_a_single_call() {
        let upstream = Arc::new(Scripted::new(u32::MAX, OK_BODY));
        let c = controller(upstream.clone(), policy(0));

        assert!(c.lookup(&request("B00TEST")).await.is_err());
        assert_eq!(upstream.calls().len(), 1);
    }

    #[tokio::test]
    async fn client_error_statuses_are_retried_like_any_transport_error() {
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::BAD_REQUEST,
        ] {
            let mut scripted = Scripted::new(u32::MAX, OK_BODY);
            scripted.status = status;
            let upstream = Arc::new(scripted);
            let c = controller(upstream.clone(), policy(3));

            let err = c.lookup(&request("B00TEST")).await.unwrap_err();

            assert!(
                matches!(err, LookupError::Transport { attempts: 4, .. }),
                "{status}: {err:?}"
            );
            assert_eq!(upstream.calls().len(), 4, "{status}");
        }
    }

    #[tokio::test]
    async fn backoff_is_waited_outside_the_gate() {
        let upstream = Arc::new(Scripted::new(1, OK_BODY));
        let c = Arc::new(controller(
            upstream.clone(),
            RetryPolicy {
                max_retries: 1,
                request_delay: Duration::ZERO,
                retry_backoff: Duration::from_millis(60),
            },
        ));

        let started = Instant::now();
        let first = {
            let c = Arc::clone(&c);
            tokio::spawn(async move {
                let out = c.lookup(&request("B0FIRST")).await;
                (out, Instant::now())
            })
        };
        // the first lookup has failed once and is now backing off
        tokio::time::sleep(Duration::from_millis(15)).await;
        c.lookup(&request("B0SECOND")).await.unwrap();
        let second_done = Instant::now();

        let (out, first_done) = first.await.unwrap();
        out.unwrap();

        assert!(second_done < first_done);
        assert!(first_done.duration_since(started) >= Duration::from_millis(60));
        let order: Vec<String> = upstream.calls().into_iter().map(|(asin, _)| asin).collect();
        assert_eq!(order, ["B0FIRST", "B0SECOND", "B0FIRST"]);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn each_retry_is_logged_with_asin_attempt_and_error() {
        let logs = Captured::default();
        let subscriber = crate::telemetry::subscriber(
            tracing_subscriber::EnvFilter::new("warn"),
            logs.clone(),
        );
        let _guard = tracing::subscriber::set_default(subscriber);

        let upstream = Arc::new(Scripted::new(2, OK_BODY));
        let c = controller(upstream.clone(), policy(3));
        c.lookup(&request("B00LOGGED")).await.unwrap();

        let out = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let retries: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .filter(|v| v["fields"]["message"] == "retrying upstream lookup")
            .collect();

        assert_eq!(retries.len(), 2);
        for (i, event) in retries.iter().enumerate() {
            assert_eq!(event["level"], "WARN");
            assert_eq!(event["fields"]["asin"], "B00LOGGED");
            assert_eq!(event["fields"]["attempt"], i as u64);
            assert_eq!(
                event["fields"]["error"],
                format!("upstream responded 503 Service Unavailable: failure {}", i + 1)
            );
        }
    }

    #[tokio::test]
    async fn envelope_error_is_never_retried() {
        let upstream = Arc::new(Scripted::new(
            0,
            br#"{"Errors":[{"Code":"InvalidParameterValue","Message":"bad asin"},{"Code":"X","Message":"Y"}]}"#,
        ));
        let c = controller(upstream.clone(), policy(5));

        let err = c.lookup(&request("NOPE")).await.unwrap_err();

        assert_eq!(upstream.calls().len(), 1);
        match err {
            LookupError::Logical { code, message } => {
                assert_eq!(code, "InvalidParameterValue");
                assert_eq!(message, "bad asin");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_never_retried() {
        let upstream = Arc::new(Scripted::new(0, b"not json"));
        let c = controller(upstream.clone(), policy(5));

        let err = c.lookup(&request("B00TEST")).await.unwrap_err();

        assert!(matches!(err, LookupError::Malformed(_)));
        assert_eq!(upstream.calls().len(), 1);
    }

    #[tokio::test]
    async fn retries_keep_asin_and_marketplace() {
        let upstream = Arc::new(Scripted::new(3, OK_BODY));
        let c = controller(upstream.clone(), policy(3));

        c.lookup(&request("B01SAME")).await.unwrap();

        let calls = upstream.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls
            .iter()
            .all(|(asin, m)| asin == "B01SAME" && *m == Marketplace::Japan));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_lookups_never_overlap_upstream_calls() {
        let mut scripted = Scripted::new(0, OK_BODY);
        scripted.hold = Duration::from_millis(5);
        let upstream = Arc::new(scripted);
        let c = Arc::new(controller(upstream.clone(), policy(0)));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let c = Arc::clone(&c);
                tokio::spawn(async move { c.lookup(&request(&format!("B0{i}"))).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let mut intervals = upstream.intervals.lock().unwrap().clone();
        assert_eq!(intervals.len(), 8);
        intervals.sort_by_key(|(start, _)| *start);
        for pair in intervals.windows(2) {
            assert!(pair[1].0 >= pair[0].1, "upstream calls overlapped");
        }
        assert_eq!(c.gate().admitted(), 8);
    }

    #[tokio::test]
    async fn request_delay_is_waited_before_every_dispatch() {
        let upstream = Arc::new(Scripted::new(2, OK_BODY));
        let c = controller(
            upstream.clone(),
            RetryPolicy {
                max_retries: 2,
                request_delay: Duration::from_millis(10),
                retry_backoff: Duration::ZERO,
            },
        );

        let started = Instant::now();
        c.lookup(&request("B00TEST")).await.unwrap();

        assert_eq!(upstream.calls().len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
