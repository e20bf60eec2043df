//! Currency table and yen-to-display-currency conversion.
//!
//! The built-in table carries the supported codes with approximate
//! yen-multiplier rates; user-supplied `conversion.custom_rates` are merged
//! over it key-by-key once, at construction time, so every conversion in a
//! session sees the same rates.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyEntry {
    /// Multiplier converting a yen amount into this currency.
    pub rate: Decimal,
    pub symbol: String,
}

/// Immutable-after-construction rate/symbol lookup table.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    entries: BTreeMap<String, CurrencyEntry>,
}

/// Built-in codes with (rate scaled by 1e-4, symbol).
const BUILTIN: [(&str, i64, &str); 6] = [
    ("gbp", 56, "£"),
    ("usd", 71, "$"),
    ("eur", 65, "€"),
    ("cad", 94, "C$"),
    ("aud", 100, "A$"),
    ("chf", 66, "CHF"),
];

impl CurrencyTable {
    /// The built-in table with no user overrides.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|&(code, mantissa, symbol)| {
                (
                    code.to_owned(),
                    CurrencyEntry {
                        rate: Decimal::new(mantissa, 4),
                        symbol: symbol.to_owned(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// The built-in table with `custom_rates` merged over it.
    ///
    /// An override for a known code replaces its rate but keeps the built-in
    /// symbol; a novel code is added with an empty symbol. Non-finite rates
    /// are skipped with a warning.
    #[must_use]
    pub fn with_overrides(custom_rates: &BTreeMap<String, f64>) -> Self {
        let mut table = Self::builtin();
        for (code, &rate) in custom_rates {
            let Some(rate) = Decimal::from_f64_retain(rate) else {
                tracing::warn!(code, rate, "ignoring non-finite custom rate");
                continue;
            };
            let code = code.to_lowercase();
            match table.entries.get_mut(&code) {
                Some(entry) => entry.rate = rate,
                None => {
                    table.entries.insert(
                        code,
                        CurrencyEntry {
                            rate,
                            symbol: String::new(),
                        },
                    );
                }
            }
        }
        table
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CurrencyEntry> {
        self.entries.get(code)
    }
}

/// A converted price, attached transiently to a record for display/export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Converted amount, rounded to the configured precision.
    pub amount: Decimal,
    pub symbol: String,
    pub code: String,
}

/// Converts a yen amount into `code`'s currency.
///
/// Returns `None` when no code is given or the code is not in the table.
/// Rounding is half-up (`MidpointAwayFromZero`): 0.005 at precision 2
/// rounds to 0.01, matching how the amounts are presented to users.
#[must_use]
pub fn convert(
    price_yen: u64,
    code: Option<&str>,
    table: &CurrencyTable,
    precision: u32,
) -> Option<Conversion> {
    let code = code?;
    let entry = table.get(code)?;
    let amount = (Decimal::from(price_yen) * entry.rate)
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    Some(Conversion {
        amount,
        symbol: entry.symbol.clone(),
        code: code.to_owned(),
    })
}
