use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::warn;

/// An [`HttpClient`] wrapper that repeats a request after a fixed delay.
///
/// Retries transport timeouts, connection failures, `429` and `5xx`
/// responses, up to `attempts` tries in total. Any other outcome, and the
/// final attempt's outcome, is returned as-is. Requests with a streaming
/// body cannot be cloned and are sent once.
pub struct Retry<C> {
    pub inner: C,
    pub attempts: u32,
    pub delay: Duration,
}

impl<C> Retry<C> {
    pub fn new(inner: C, attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            attempts,
            delay,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for Retry<C> {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            let Some(this_try) = req.try_clone() else {
                return self.inner.execute(req).await;
            };

            match self.inner.execute(this_try).await {
                Ok(resp) if attempt < attempts && is_retryable_status(resp.status()) => {
                    warn!(url = %req.url(), status = %resp.status(), attempt, "Retryable response");
                }
                Err(e) if attempt < attempts && (e.is_timeout() || e.is_connect()) => {
                    warn!(url = %req.url(), error = %e, attempt, "Request failed, retrying");
                }
                result => return result,
            }

            attempt += 1;
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
