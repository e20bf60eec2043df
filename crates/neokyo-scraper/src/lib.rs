pub mod client;
pub mod error;
pub mod extract;
pub mod translate;

pub use client::PageClient;
pub use error::ScrapeError;
pub use extract::{extract_fields, scrape_product, RawItem};
pub use translate::Translator;
