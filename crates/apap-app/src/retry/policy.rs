use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. (3 = up to 4 upstream calls)
    pub max_retries: u32,
    /// Waited while holding the admission gate, before every dispatch.
    pub request_delay: Duration,
    /// Waited outside the gate between a failed attempt and the next one.
    pub retry_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            request_delay: Duration::from_millis(1000),
            retry_backoff: Duration::ZERO,
        }
    }
}
