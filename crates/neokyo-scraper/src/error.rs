use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("translation to \"{target}\" failed with status {status}")]
    TranslationStatus { target: String, status: u16 },

    #[error("translation response for \"{target}\" had an unexpected shape")]
    TranslationShape { target: String },
}
