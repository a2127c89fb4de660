use std::time::Duration;

/// Longest single wait between retries.
const MAX_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (0-based), preferring the server's hint.
    pub fn delay(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        parse_retry_after(retry_after).unwrap_or_else(|| backoff_delay(attempt, self.base_delay_ms))
    }
}

/// Parse a `Retry-After` header given in seconds, capped at one minute.
pub fn parse_retry_after(header_value: Option<&str>) -> Option<Duration> {
    header_value?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| Duration::from_secs(secs).min(MAX_DELAY))
}

/// Exponential backoff: `base_ms * 2^attempt`, capped at one minute.
pub fn backoff_delay(attempt: u32, base_ms: u64) -> Duration {
    let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay_ms).min(MAX_DELAY)
}
