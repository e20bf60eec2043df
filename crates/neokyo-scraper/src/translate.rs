//! Title translation via the public Google translate endpoint.
//!
//! Translation is strictly best-effort: a failure against the target
//! language is retried once against the configured fallback language, and a
//! second failure passes the original text through. The `"n/a"` sentinel is
//! never sent out — there is nothing to translate about a placeholder.

use std::time::Duration;

use reqwest::{Client, Url};

use neokyo_core::{Config, SENTINEL};

use crate::error::ScrapeError;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com/";

/// Client for the unauthenticated `translate_a/single` endpoint.
///
/// Use [`Translator::new`] in production or [`Translator::with_base_url`]
/// to point at a mock server in tests.
pub struct Translator {
    client: Client,
    base_url: Url,
}

impl Translator {
    /// Creates a translator against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ScrapeError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a translator with a custom base URL (for wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScrapeError::InvalidUrl`] for a bad base.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Keep exactly one trailing slash so Url::join appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScrapeError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Translates `text` into `target` (source language auto-detected).
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::TranslationStatus`] — non-2xx response.
    /// - [`ScrapeError::TranslationShape`] — the gtx JSON did not carry
    ///   translated segments.
    /// - [`ScrapeError::Http`] — network failure or unreadable body.
    pub async fn translate(&self, text: &str, target: &str) -> Result<String, ScrapeError> {
        let mut url = self
            .base_url
            .join("translate_a/single")
            .map_err(|e| ScrapeError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", "auto")
            .append_pair("tl", target)
            .append_pair("dt", "t")
            .append_pair("q", text);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::TranslationStatus {
                target: target.to_owned(),
                status: status.as_u16(),
            });
        }

        // Body shape: [[["translated","original",...], ...], ...]
        let body: serde_json::Value = response.json().await?;
        let segments = body
            .get(0)
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| ScrapeError::TranslationShape {
                target: target.to_owned(),
            })?;
        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(serde_json::Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(ScrapeError::TranslationShape {
                target: target.to_owned(),
            });
        }
        Ok(translated)
    }

    /// Normalizes a raw extracted title per the session config.
    ///
    /// The sentinel is returned untouched without any network call. With
    /// translation enabled and a target language set, failures fall back to
    /// the fallback language and then to the original text; either way the
    /// result is lowercased before being stored on the record.
    pub async fn normalize_title(&self, raw_title: &str, config: &Config) -> String {
        if raw_title == SENTINEL {
            return SENTINEL.to_owned();
        }
        if !config.scraping.translate_title {
            return raw_title.to_lowercase();
        }
        let Some(target) = config.target_language() else {
            return raw_title.to_lowercase();
        };

        match self.translate(raw_title, target).await {
            Ok(translated) => translated.to_lowercase(),
            Err(err) => {
                tracing::warn!(
                    target,
                    fallback = %config.fallback_language,
                    error = %err,
                    "translation failed — retrying with fallback language"
                );
                config
                    .debug
                    .append_log(&format!("[translation failed] {raw_title}"));
                match self.translate(raw_title, &config.fallback_language).await {
                    Ok(translated) => translated.to_lowercase(),
                    Err(err) => {
                        tracing::warn!(
                            fallback = %config.fallback_language,
                            error = %err,
                            "fallback translation failed — keeping original title"
                        );
                        raw_title.to_lowercase()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "translate_test.rs"]
mod tests;
