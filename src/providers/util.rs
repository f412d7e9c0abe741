use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often and how far apart a failed request is re-sent.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Retries an async request until it succeeds or the policy is exhausted
///
/// Total runs are 1 initial attempt plus `policy.retries`. Only transport errors
/// are retried; an HTTP error status is a successful request as far as this is concerned.
pub async fn with_retry<F, Fut, T>(mut operation: F, policy: RetryPolicy) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(anyhow::Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > policy.retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, policy.retries, err
                );
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quick(retries: usize) -> RetryPolicy {
        RetryPolicy {
            retries,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_gives_up_after_all_attempts() {
        let attempts = AtomicUsize::new(0);
        // nothing listens on port 9 of localhost
        let client = reqwest::Client::new();

        let result = with_retry(
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                client.get("http://127.0.0.1:9/").send()
            },
            quick(2),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_first_success() {
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let attempts = AtomicUsize::new(0);
        let client = reqwest::Client::new();
        let url = mock_server.uri();

        let response = with_retry(
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                client.get(&url).send()
            },
            quick(3),
        )
        .await
        .unwrap();

        assert!(response.status().is_success());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
