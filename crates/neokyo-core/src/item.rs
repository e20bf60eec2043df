//! The item record: one immutable snapshot per scraped product page.

/// Placeholder stored when a field could not be extracted, distinguishing
/// "absent on the page" from an empty string.
pub const SENTINEL: &str = "n/a";

/// A validated product record, built exactly once by the extraction pipeline
/// and read-only afterwards.
///
/// `price_yen == 0` is the sentinel for "no price found"; callers treat such
/// a record as an extraction failure and skip persistence. Optional fields
/// are `None` when their extraction is disabled in config, and otherwise
/// always hold non-empty text (the [`SENTINEL`] when the page lacked them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub title_original: String,
    /// Normalized title: translated when enabled, always lowercased.
    pub title: String,
    pub seller: Option<String>,
    pub condition: Option<String>,
    pub shipping: Option<String>,
    pub item_id: String,
    /// Whole yen, no minor units on the source site.
    pub price_yen: u64,
    pub image_url: Option<String>,
}

impl ItemRecord {
    /// Whether a usable price was extracted.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price_yen > 0
    }

    /// Present fields, excluding the two title fields, in declaration order.
    ///
    /// This is the order the report, the text dump, and the CSV row all rely
    /// on; it is deliberately the struct's field order, not alphabetical.
    #[must_use]
    pub fn detail_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(6);
        if let Some(seller) = &self.seller {
            fields.push(("seller", seller.clone()));
        }
        if let Some(condition) = &self.condition {
            fields.push(("condition", condition.clone()));
        }
        if let Some(shipping) = &self.shipping {
            fields.push(("shipping", shipping.clone()));
        }
        fields.push(("item_id", self.item_id.clone()));
        fields.push(("price_yen", self.price_yen.to_string()));
        if let Some(image_url) = &self.image_url {
            fields.push(("image_url", image_url.clone()));
        }
        fields
    }

    /// Every present field in declaration order, titles first.
    #[must_use]
    pub fn all_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title_original", self.title_original.clone()),
            ("title", self.title.clone()),
        ];
        fields.extend(self.detail_fields());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> ItemRecord {
        ItemRecord {
            title_original: "フィギュア 箱".to_owned(),
            title: "figure box".to_owned(),
            seller: Some("shop-a".to_owned()),
            condition: Some("New".to_owned()),
            shipping: Some("¥800".to_owned()),
            item_id: "m123".to_owned(),
            price_yen: 12345,
            image_url: Some("https://img.example/1.jpg".to_owned()),
        }
    }

    #[test]
    fn detail_fields_keep_declaration_order() {
        let keys: Vec<_> = full_record()
            .detail_fields()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            ["seller", "condition", "shipping", "item_id", "price_yen", "image_url"]
        );
    }

    #[test]
    fn detail_fields_omit_disabled_optionals() {
        let mut record = full_record();
        record.seller = None;
        record.image_url = None;
        let keys: Vec<_> = record.detail_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["condition", "shipping", "item_id", "price_yen"]);
    }

    #[test]
    fn all_fields_lead_with_titles() {
        let keys: Vec<_> = full_record().all_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys[0], "title_original");
        assert_eq!(keys[1], "title");
    }

    #[test]
    fn has_price_is_false_for_zero() {
        let mut record = full_record();
        record.price_yen = 0;
        assert!(!record.has_price());
    }
}
