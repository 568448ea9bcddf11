use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::TransportError;
use super::retry::RetryPolicy;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Read-only HTTP transport
#[async_trait]
pub trait HttpGetter: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpGetter + ?Sized> HttpGetter for Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }
}

/// One GET per call through reqwest
pub struct ReqwestGetter {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestGetter {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl HttpGetter for ReqwestGetter {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Wraps any getter with a [`RetryPolicy`]
///
/// Only safe for side-effect-free requests.
pub struct RetryingGetter<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: HttpGetter> RetryingGetter<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<G: HttpGetter> HttpGetter for RetryingGetter<G> {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut attempt = 1;

        loop {
            let outcome =
                match tokio::time::timeout(self.policy.attempt_timeout(), self.inner.get(url)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(self.policy.attempt_timeout())),
                };

            let retry = match &outcome {
                Ok(response) => self.policy.should_retry(response.status, attempt),
                Err(_) => self.policy.should_retry_error(attempt),
            };

            if !retry {
                if let Err(error) = &outcome {
                    warn!(url, attempt, %error, "Giving up on request");
                }
                return outcome;
            }

            let delay = self.policy.delay_for(attempt);
            match &outcome {
                Ok(response) => debug!(url, attempt, status = response.status, ?delay, "Retrying"),
                Err(error) => debug!(url, attempt, %error, ?delay, "Retrying"),
            }

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::retry::Backoff;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replays a fixed script of outcomes, one per call
    struct ScriptedGetter {
        script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        calls: AtomicU32,
    }

    impl ScriptedGetter {
        fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpGetter for ScriptedGetter {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("script exhausted".to_string())))
        }
    }

    struct SlowGetter;

    #[async_trait]
    impl HttpGetter for SlowGetter {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(HttpResponse::new(200, ""))
        }
    }

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, [500], Backoff::Fixed(Duration::from_millis(1)))
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[tokio::test]
    async fn returns_first_success_without_retry() {
        let getter = RetryingGetter::new(
            ScriptedGetter::new(vec![Ok(HttpResponse::new(200, "ok"))]),
            fast_policy(3),
        );

        let response = getter.get("http://authorizer").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(getter.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_retryable_status_then_succeeds() {
        let getter = RetryingGetter::new(
            ScriptedGetter::new(vec![
                Ok(HttpResponse::new(500, "")),
                Ok(HttpResponse::new(500, "")),
                Ok(HttpResponse::new(200, "ok")),
            ]),
            fast_policy(3),
        );

        let response = getter.get("http://authorizer").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(getter.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_back_last_response_when_attempts_run_out() {
        let getter = RetryingGetter::new(
            ScriptedGetter::new(vec![
                Ok(HttpResponse::new(500, "")),
                Ok(HttpResponse::new(500, "")),
                Ok(HttpResponse::new(200, "never reached")),
            ]),
            fast_policy(2),
        );

        let response = getter.get("http://authorizer").await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(getter.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_retryable_status_is_returned_immediately() {
        let getter = RetryingGetter::new(
            ScriptedGetter::new(vec![Ok(HttpResponse::new(403, ""))]),
            fast_policy(3),
        );

        assert_eq!(getter.get("http://authorizer").await.unwrap().status, 403);
        assert_eq!(getter.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_errors_are_retried_then_surfaced() {
        let getter = RetryingGetter::new(
            ScriptedGetter::new(vec![
                Err(TransportError::Request("refused".to_string())),
                Err(TransportError::Request("refused again".to_string())),
            ]),
            fast_policy(2),
        );

        assert_eq!(
            getter.get("http://authorizer").await,
            Err(TransportError::Request("refused again".to_string()))
        );
        assert_eq!(getter.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn slow_attempts_time_out() {
        let policy = RetryPolicy::none().with_attempt_timeout(Duration::from_millis(10));
        let getter = RetryingGetter::new(SlowGetter, policy);

        assert_eq!(
            getter.get("http://authorizer").await,
            Err(TransportError::Timeout(Duration::from_millis(10)))
        );
    }
}
