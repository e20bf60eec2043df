//! HTTP client for neokyo product pages.
//!
//! Wraps `reqwest` with the session's retry-and-delay policy: a fixed pause
//! between attempts on failure, and a courtesy pause after every successful
//! page fetch so the source site is never hammered.

use std::time::Duration;

use reqwest::Client;

use neokyo_core::Config;

use crate::error::ScrapeError;

/// Fixed pause between retry attempts.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client with the configured timeout, user agent, optional proxy,
/// and retry policy.
pub struct PageClient {
    client: Client,
    retry_attempts: u32,
    retry_delay: Duration,
    /// Courtesy pause after each successful page fetch.
    request_delay: Duration,
}

impl PageClient {
    /// Creates a `PageClient` from the session config.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed or the configured proxy URL is invalid.
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.network.user_agent.as_str());
        if let Some(proxy) = &config.network.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: RETRY_DELAY,
            request_delay: Duration::from_secs_f64(
                config.network.delay_between_requests.max(0.0),
            ),
        })
    }

    /// Fetches a page and returns its HTML body.
    ///
    /// Retries transient failures up to the configured attempt count with a
    /// fixed inter-attempt delay. After a successful fetch the configured
    /// inter-request delay is awaited before returning — a rate-limiting
    /// courtesy the source site expects.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UnexpectedStatus`] — non-2xx response on the final attempt.
    /// - [`ScrapeError::Http`] — network failure on the final attempt.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let mut attempt = 1u32;
        loop {
            match self.try_fetch(url).await {
                Ok(body) => {
                    if !self.request_delay.is_zero() {
                        tokio::time::sleep(self.request_delay).await;
                    }
                    return Ok(body);
                }
                Err(err) => {
                    if attempt >= self.retry_attempts {
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt,
                        attempts = self.retry_attempts,
                        url,
                        error = %err,
                        "page fetch failed — retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }

    /// Downloads raw bytes (product images). Single attempt — image writes
    /// are best-effort and the caller reports failure per-step.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UnexpectedStatus`] — non-2xx response.
    /// - [`ScrapeError::Http`] — network failure.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Zeroes the retry and inter-request delays so tests run instantly.
    #[cfg(test)]
    fn without_delays(mut self) -> Self {
        self.retry_delay = Duration::ZERO;
        self.request_delay = Duration::ZERO;
        self
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
