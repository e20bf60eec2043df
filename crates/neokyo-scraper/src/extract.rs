//! Field extraction from a product page.
//!
//! This is a best-effort heuristic chain against one site's inconsistent
//! markup, not an HTML grammar: every field degrades to the `"n/a"` sentinel
//! (or is omitted when disabled in config) instead of failing. The title
//! fallback tiers are ordered by reliability and that order is load-bearing —
//! later tiers only run when earlier ones yield nothing.

use scraper::{ElementRef, Html, Selector};

use neokyo_core::config::ScrapingConfig;
use neokyo_core::{Config, ItemRecord, SENTINEL};

use crate::client::PageClient;
use crate::error::ScrapeError;
use crate::translate::Translator;

/// Raw extraction output, before title normalization.
///
/// `title` holds the verbatim page text (or the sentinel); translation and
/// case-folding happen afterwards in [`Translator::normalize_title`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub seller: Option<String>,
    pub condition: Option<String>,
    pub shipping: Option<String>,
    pub item_id: String,
    pub price_yen: u64,
    pub image_url: Option<String>,
}

/// Extracts the raw item fields from page HTML. Never fails: missing fields
/// become the sentinel or are omitted, per field type.
#[must_use]
pub fn extract_fields(html: &str, config: &ScrapingConfig) -> RawItem {
    let doc = Html::parse_document(html);

    let labeled =
        |label: &str| labeled_field(&doc, label).unwrap_or_else(|| SENTINEL.to_owned());

    RawItem {
        title: extract_title(&doc, config),
        seller: config.include_seller.then(|| labeled("Seller")),
        condition: config.include_condition.then(|| labeled("Condition")),
        shipping: config.include_shipping.then(|| labeled("Domestic Shipping")),
        item_id: labeled("Item ID"),
        price_yen: extract_price(&doc),
        image_url: if config.include_image_url {
            extract_image_url(&doc)
        } else {
            None
        },
    }
}

/// Fetches, extracts, and normalizes one product page into an [`ItemRecord`].
///
/// # Errors
///
/// Returns [`ScrapeError`] only for fetch failures; extraction and title
/// normalization always produce a value.
pub async fn scrape_product(
    client: &PageClient,
    translator: &Translator,
    url: &str,
    config: &Config,
) -> Result<ItemRecord, ScrapeError> {
    let html = client.fetch_page(url).await?;
    let raw = extract_fields(&html, &config.scraping);
    let title = translator.normalize_title(&raw.title, config).await;
    Ok(ItemRecord {
        title_original: raw.title,
        title,
        seller: raw.seller,
        condition: raw.condition,
        shipping: raw.shipping,
        item_id: raw.item_id,
        price_yen: raw.price_yen,
        image_url: raw.image_url,
    })
}

/// Title fallback chain, in decreasing order of reliability:
///
/// 1. heading inside a `div` whose class contains `"product"`
/// 2. paragraph inside that same container
/// 3. any document-wide heading with non-empty text
///
/// Tiers 2–3 only run when `use_fallback_selectors` is enabled. No candidate
/// (or only empty text) yields the sentinel.
fn extract_title(doc: &Html, config: &ScrapingConfig) -> String {
    let container = Selector::parse("div").ok().and_then(|sel| {
        doc.select(&sel).find(|el| {
            el.value()
                .attr("class")
                .is_some_and(|class| class.to_lowercase().contains("product"))
        })
    });

    let heading = Selector::parse("h6").ok();
    let paragraph = Selector::parse("p").ok();

    let mut candidate = match (container, &heading) {
        (Some(scope), Some(sel)) => scope.select(sel).next(),
        _ => None,
    };

    if candidate.is_none() && config.use_fallback_selectors {
        if let (Some(scope), Some(sel)) = (container, &paragraph) {
            candidate = scope.select(sel).next();
        }
        if candidate.is_none() {
            if let Some(sel) = &heading {
                candidate = doc.select(sel).find(|el| !element_text(*el).is_empty());
            }
        }
    }

    candidate
        .map(element_text)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| SENTINEL.to_owned())
}

/// Finds a text node exactly matching `label` (after trimming) and returns
/// the trimmed text of the next element in document order — the technique
/// for fields keyed by a visible label rather than a stable class.
fn labeled_field(doc: &Html, label: &str) -> Option<String> {
    let mut nodes = doc.tree.root().descendants();
    nodes
        .by_ref()
        .find(|node| node.value().as_text().is_some_and(|text| text.trim() == label))?;
    nodes
        .find_map(ElementRef::wrap)
        .map(element_text)
        .filter(|value| !value.is_empty())
}

/// Digit-filters the price element's text and parses it as whole yen.
/// Absent element, digit-free text, or overflow all yield 0.
fn extract_price(doc: &Html) -> u64 {
    Selector::parse("span.product-price")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .map_or(0, |el| {
            let digits: String = el
                .text()
                .flat_map(str::chars)
                .filter(char::is_ascii_digit)
                .collect();
            digits.parse().unwrap_or(0)
        })
}

fn extract_image_url(doc: &Html) -> Option<String> {
    let sel = Selector::parse("img.cloudzoom").ok()?;
    doc.select(&sel)
        .next()?
        .value()
        .attr("src")
        .map(str::to_owned)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
