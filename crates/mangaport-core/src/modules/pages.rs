//! Page image fetching with bounded retry.
//!
//! Image hosts are not provider APIs, so this does not go through the
//! gateway or its limiter.

use bytes::Bytes;
use std::time::Duration;

use crate::gateway::{Clock, TokioClock};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// `base * 2^(attempt-1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay after failed attempt number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { base, max } => {
                let factor = 1_u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                base.checked_mul(factor).map_or(max, |d| d.min(max))
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::Fixed(Duration::from_secs(1)),
        }
    }
}

/// Result of a page load. Failure is not an error: the reader shows a
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageImage {
    Loaded(Bytes),
    Fallback,
}

impl PageImage {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

pub struct PageLoader<C: Clock = TokioClock> {
    http_client: reqwest::Client,
    policy: RetryPolicy,
    clock: C,
}

impl PageLoader<TokioClock> {
    pub fn new(http_client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self::with_clock(http_client, policy, TokioClock)
    }
}

impl<C: Clock> PageLoader<C> {
    pub fn with_clock(http_client: reqwest::Client, policy: RetryPolicy, clock: C) -> Self {
        let policy = RetryPolicy { max_attempts: policy.max_attempts.max(1), ..policy };
        Self { http_client, policy, clock }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch `url`, retrying up to the policy's attempt budget.
    ///
    /// No delay follows the final attempt.
    pub async fn load(&self, url: &str) -> PageImage {
        for attempt in 1..=self.policy.max_attempts {
            match self.fetch(url).await {
                Ok(bytes) => return PageImage::Loaded(bytes),
                Err(message) => {
                    tracing::warn!(
                        "Error loading image {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.policy.max_attempts,
                        message
                    );
                },
            }
            if attempt < self.policy.max_attempts {
                self.clock.sleep(self.policy.backoff.delay(attempt)).await;
            }
        }

        tracing::error!(
            "Failed to load image {} after {} attempts",
            url,
            self.policy.max_attempts
        );
        PageImage::Fallback
    }

    async fn fetch(&self, url: &str) -> Result<Bytes, String> {
        let response = self.http_client.get(url).send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }
        response.bytes().await.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ManualClock;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_backoff_delays() {
        let fixed = Backoff::Fixed(Duration::from_secs(1));
        assert_eq!(fixed.delay(1), Duration::from_secs(1));
        assert_eq!(fixed.delay(5), Duration::from_secs(1));

        let exp = Backoff::Exponential {
            base: Duration::from_millis(250),
            max: Duration::from_secs(2),
        };
        assert_eq!(exp.delay(1), Duration::from_millis(250));
        assert_eq!(exp.delay(2), Duration::from_millis(500));
        assert_eq!(exp.delay(3), Duration::from_secs(1));
        assert_eq!(exp.delay(10), Duration::from_secs(2));
        assert_eq!(exp.delay(64), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_loads_on_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/hash/p1.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::new();
        let start = clock.now();
        let loader =
            PageLoader::with_clock(reqwest::Client::new(), RetryPolicy::default(), clock.clone());

        let image = loader.load(&format!("{}/data/hash/p1.png", server.uri())).await;
        assert_eq!(image, PageImage::Loaded(Bytes::from_static(b"png")));
        assert_eq!(clock.now() - start, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_falls_back_after_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let clock = ManualClock::new();
        let start = clock.now();
        let loader =
            PageLoader::with_clock(reqwest::Client::new(), RetryPolicy::default(), clock.clone());

        let image = loader.load(&format!("{}/p.png", server.uri())).await;
        assert_eq!(image, PageImage::Fallback);
        // Two pauses: none after the last attempt.
        assert_eq!(clock.now() - start, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_recovers_on_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;

        let loader = PageLoader::with_clock(
            reqwest::Client::new(),
            RetryPolicy::default(),
            ManualClock::new(),
        );
        assert!(loader.load(&format!("{}/p.png", server.uri())).await.is_loaded());
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let policy = RetryPolicy { max_attempts: 0, ..RetryPolicy::default() };
        let loader = PageLoader::with_clock(reqwest::Client::new(), policy, ManualClock::new());
        assert_eq!(loader.policy().max_attempts, 1);
    }
}
