//! HTTP client for the records endpoint.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::warn;
use url::Url;

use crate::application::records::{NotifyError, RecordEvent, RecordReceipt, RecordsNotifier};
use crate::config::RecordsSettings;

/// Bounded retry schedule for transient notification failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first; zero means a single attempt.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
    pub jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 250,
            max_backoff_ms: 5_000,
            multiplier: 2.0,
            jitter_ms: 100,
        }
    }
}

pub struct RecordsClient {
    http: reqwest::Client,
    endpoint: Url,
    retry: RetryPolicy,
}

impl RecordsClient {
    pub fn new(settings: &RecordsSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            retry: settings.retry.clone(),
        })
    }

    async fn send(&self, event: &RecordEvent) -> Result<RecordReceipt, NotifyError> {
        let response = self
            .http
            .put(self.endpoint.clone())
            .json(event)
            .send()
            .await
            .map_err(|err| NotifyError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<RecordReceipt>()
                .await
                .map_err(|err| NotifyError::Transport {
                    message: format!("invalid receipt body: {err}"),
                })
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(NotifyError::Upstream {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl RecordsNotifier for RecordsClient {
    async fn put_record(&self, event: &RecordEvent) -> Result<RecordReceipt, NotifyError> {
        let mut backoff = self.retry.initial_backoff_ms;
        let mut attempt: u32 = 0;
        loop {
            match self.send(event).await {
                Ok(receipt) => return Ok(receipt),
                Err(error) if attempt < self.retry.max_retries && is_transient(&error) => {
                    attempt += 1;
                    let delay = jittered_backoff(backoff, self.retry.jitter_ms);
                    warn!(
                        target: "foglio::records",
                        %error,
                        attempt,
                        delay_ms = delay,
                        "retrying record notification"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    let next = (backoff as f64 * self.retry.multiplier) as u64;
                    backoff = next.min(self.retry.max_backoff_ms);
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Retry only conditions the endpoint is expected to recover from:
/// transport failures and 408/429/5xx answers. Other 4xx answers are
/// returned to the caller immediately.
fn is_transient(error: &NotifyError) -> bool {
    match error {
        NotifyError::Transport { .. } => true,
        NotifyError::Upstream { status, .. } => {
            matches!(*status, 408 | 429) || *status >= 500
        }
    }
}

fn jittered_backoff(base_ms: u64, jitter_ms: u64) -> u64 {
    if jitter_ms == 0 {
        return base_ms;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_nanos(0))
        .subsec_nanos() as u64;
    base_ms.saturating_add(nanos % jitter_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16) -> NotifyError {
        NotifyError::Upstream {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn transport_errors_are_transient() {
        let error = NotifyError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(is_transient(&error));
    }

    #[test]
    fn server_side_statuses_are_transient() {
        assert!(is_transient(&upstream(500)));
        assert!(is_transient(&upstream(503)));
        assert!(is_transient(&upstream(429)));
        assert!(is_transient(&upstream(408)));
    }

    #[test]
    fn client_errors_are_not_retried() {
        assert!(!is_transient(&upstream(400)));
        assert!(!is_transient(&upstream(404)));
        assert!(!is_transient(&upstream(422)));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        for _ in 0..32 {
            let delay = jittered_backoff(250, 100);
            assert!((250..350).contains(&delay));
        }
    }

    #[test]
    fn zero_jitter_returns_the_base() {
        assert_eq!(jittered_backoff(250, 0), 250);
    }
}
