//! Report formatting for the console.
//!
//! [`format_report`] is pure and colour-free so its exact output is testable;
//! [`print_report`] colours the same lines per the configured theme.

use colored::{ColoredString, Colorize};

use neokyo_core::{Config, Conversion, ItemRecord};

/// Renders the report block for one record.
///
/// Line order is fixed: padded title, optional separator sized to
/// title + padding, one `key: value` line per present field in record
/// order, and a converted-price line when a conversion exists. With
/// `show_headers` off the `key:` prefixes are dropped.
pub fn format_report(
    record: &ItemRecord,
    conversion: Option<&Conversion>,
    config: &Config,
) -> String {
    let display = &config.display;

    let mut title = record.title.clone();
    if display.truncate_long_titles && title.chars().count() > display.max_title_length {
        title = title.chars().take(display.max_title_length).collect();
        title.push_str("...");
    }
    if display.title_uppercase {
        title = title.to_uppercase();
    }

    let mut lines = Vec::new();
    lines.push(format!("{}{title}", " ".repeat(display.padding)));
    if display.separator_line {
        lines.push("-".repeat(title.chars().count() + display.padding));
    }

    for (key, value) in record.detail_fields() {
        if display.show_headers {
            lines.push(format!("{key}: {value}"));
        } else {
            lines.push(value);
        }
    }

    if let Some(conversion) = conversion {
        let space = if config.conversion.symbol_spacing { " " } else { "" };
        let converted = format!("{}{space}{}", conversion.symbol, conversion.amount);
        let price = if config.conversion.show_both_prices {
            format!("{}¥ ({converted})", record.price_yen)
        } else {
            converted
        };
        if display.show_headers {
            lines.push(format!("price: {price}"));
        } else {
            lines.push(price);
        }
    }

    lines.join("\n")
}

/// Prints the report with the theme's accent colour.
pub fn print_report(record: &ItemRecord, conversion: Option<&Conversion>, config: &Config) {
    let block = format_report(record, conversion, config);
    let mut lines = block.lines();

    if let Some(title_line) = lines.next() {
        println!("{}", accent(title_line, &config.display.theme));
    }
    if config.display.separator_line {
        if let Some(separator) = lines.next() {
            println!("{}", separator.white());
        }
    }
    for line in lines {
        match line.split_once(": ") {
            Some((key, value)) => {
                println!("{}: {}", key.white(), accent(value, &config.display.theme));
            }
            None => println!("{line}"),
        }
    }
    println!();
}

fn accent(text: &str, theme: &str) -> ColoredString {
    if theme == "neon" {
        text.magenta()
    } else {
        text.cyan()
    }
}
