use std::collections::BTreeSet;
use std::time::Duration;

/// How long to wait between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    Fixed(Duration),
    /// `base * 2^(retry - 1)`, capped at `max`
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    fn delay(&self, retry: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Bounded retry behaviour for read-only outbound calls
///
/// Kept as a plain value so the decision logic can be tested and swapped
/// without touching the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    retryable_statuses: BTreeSet<u16>,
    backoff: Backoff,
    attempt_timeout: Duration,
    retry_transport_errors: bool,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        retryable_statuses: impl IntoIterator<Item = u16>,
        backoff: Backoff,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retryable_statuses: retryable_statuses.into_iter().collect(),
            backoff,
            attempt_timeout: Duration::from_secs(5),
            retry_transport_errors: true,
        }
    }

    /// Single attempt, no retry
    pub fn none() -> Self {
        Self::new(1, [], Backoff::Fixed(Duration::ZERO))
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Whether timeouts and failed connections count as retryable
    pub fn with_transport_retries(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Should a response with `status` on attempt `attempt` (1-based) be retried?
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        attempt < self.max_attempts && self.is_retryable_status(status)
    }

    /// Should a transport failure on attempt `attempt` be retried?
    pub fn should_retry_error(&self, attempt: u32) -> bool {
        self.retry_transport_errors && attempt < self.max_attempts
    }

    /// Delay before the attempt following `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

impl Default for RetryPolicy {
    /// 3 attempts, retry on 500, 400ms apart, 5s per attempt
    fn default() -> Self {
        Self::new(3, [500], Backoff::Fixed(Duration::from_millis(400)))
    }
}
