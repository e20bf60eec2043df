//! Interactive prompt loop: one line per request, one or more comma-separated
//! product URLs plus an optional trailing currency code. Each URL's outcome
//! is independent; a bad URL or a failed fetch never aborts the batch.

use std::io::{BufRead, Write};

use anyhow::Context;
use colored::Colorize;

use neokyo_core::{convert, Config, CurrencyTable};
use neokyo_scraper::{scrape_product, PageClient, Translator};

use crate::{display, persist};

/// Only product pages on the proxy site are accepted.
const PRODUCT_URL_PREFIX: &str = "https://neokyo.com/en/product";

#[derive(Debug, PartialEq, Eq)]
struct ParsedRequest {
    urls: Vec<String>,
    currency: Option<String>,
}

/// Runs the prompt loop until `exit` or end of input.
///
/// # Errors
///
/// Returns an error if the HTTP client or translator cannot be built, or,
/// with `debug.show_stack_traces` enabled, the first per-URL failure.
pub async fn run(config: Config) -> anyhow::Result<()> {
    println!("{}", "\nneokyo product checker\n".magenta().bold());

    let table = CurrencyTable::with_overrides(&config.conversion.custom_rates);
    let mut default_currency = config
        .default_currency
        .clone()
        .map(|code| code.to_lowercase());
    if let Some(code) = &default_currency {
        if !table.contains(code) {
            println!(
                "{}",
                format!("[config warning] unknown default_currency '{code}' — ignoring.")
                    .yellow()
            );
            default_currency = None;
        }
    }

    let client = PageClient::new(&config).context("could not build HTTP client")?;
    let translator =
        Translator::new(config.timeout_seconds).context("could not build translator")?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("{}", "enter product url or type 'exit': ".white());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            println!("{}", "\nsee u later..\n".cyan());
            break;
        }

        let request = match parse_request(line, &table, default_currency.as_deref()) {
            Ok(request) => request,
            Err(message) => {
                println!("{}\n", message.red());
                continue;
            }
        };

        let mut succeeded = 0usize;
        for url in &request.urls {
            if !url.starts_with(PRODUCT_URL_PREFIX) {
                println!(
                    "{}\n",
                    format!("link must start with {PRODUCT_URL_PREFIX}").red()
                );
                continue;
            }

            println!("\nfetching data, one sec...\n");
            let outcome = process_url(
                &client,
                &translator,
                url,
                request.currency.as_deref(),
                &table,
                &config,
            )
            .await;
            match outcome {
                Ok(()) => succeeded += 1,
                Err(err) => {
                    if config.debug.show_stack_traces {
                        return Err(err);
                    }
                    println!("{}\n", format!("error: {err:#}").red());
                    config.debug.append_log(&format!("[error] {err:#}"));
                }
            }
        }

        if config.output.print_summary && request.urls.len() > 1 {
            println!(
                "{}\n",
                format!("done: {succeeded} of {} links processed.", request.urls.len()).cyan()
            );
        }
    }

    Ok(())
}

/// Scrape → display → persist for one URL.
async fn process_url(
    client: &PageClient,
    translator: &Translator,
    url: &str,
    currency: Option<&str>,
    table: &CurrencyTable,
    config: &Config,
) -> anyhow::Result<()> {
    tracing::debug!(url, currency, "processing product page");
    let record = scrape_product(client, translator, url, config).await?;
    let conversion = convert(
        record.price_yen,
        currency,
        table,
        config.conversion.precision,
    );

    if config.output.print_data {
        display::print_report(&record, conversion.as_ref(), config);
    }

    if record.has_price() {
        persist::save_product(client, &record, url, conversion.as_ref(), config).await;
    } else {
        println!("{}", "no price found. skipping file save.".yellow());
    }
    Ok(())
}

/// Splits a prompt line into URLs and an optional trailing currency code.
///
/// URLs may be separated by commas, whitespace, or both. The last token is
/// treated as a currency when it is neither a URL nor part of a comma list;
/// an unrecognized code rejects the whole line (the user likely mistyped),
/// while URL validation stays per-item.
fn parse_request(
    line: &str,
    table: &CurrencyTable,
    default_currency: Option<&str>,
) -> Result<ParsedRequest, String> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let mut currency = default_currency.map(str::to_lowercase);

    if tokens.len() > 1 {
        let last = tokens[tokens.len() - 1];
        if !last.starts_with("http") && !last.contains(',') {
            let code = last.to_lowercase();
            if !table.contains(&code) {
                return Err(format!("currency '{code}' not recognized."));
            }
            currency = Some(code);
            tokens.pop();
        }
    }

    // Tokens are never fused: whitespace and commas both separate URLs, so
    // "url1 url2" stays two candidates instead of one bad concatenation.
    let urls: Vec<String> = tokens
        .iter()
        .flat_map(|token| token.split(','))
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .collect();
    if urls.is_empty() {
        return Err("no url given.".to_owned());
    }

    Ok(ParsedRequest { urls, currency })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CurrencyTable {
        CurrencyTable::builtin()
    }

    #[test]
    fn single_url_uses_default_currency() {
        let request = parse_request("https://neokyo.com/en/product/1", &table(), Some("gbp"))
            .expect("should parse");
        assert_eq!(request.urls, ["https://neokyo.com/en/product/1"]);
        assert_eq!(request.currency.as_deref(), Some("gbp"));
    }

    #[test]
    fn trailing_token_overrides_currency() {
        let request = parse_request("https://neokyo.com/en/product/1 USD", &table(), Some("gbp"))
            .expect("should parse");
        assert_eq!(request.currency.as_deref(), Some("usd"));
    }

    #[test]
    fn unknown_currency_rejects_the_line() {
        let err = parse_request("https://neokyo.com/en/product/1 xyz", &table(), None)
            .expect_err("unknown code");
        assert!(err.contains("xyz"));
    }

    #[test]
    fn comma_separated_urls_split_per_item() {
        let request = parse_request(
            "https://neokyo.com/en/product/1, https://neokyo.com/en/product/2 eur",
            &table(),
            None,
        )
        .expect("should parse");
        assert_eq!(
            request.urls,
            [
                "https://neokyo.com/en/product/1",
                "https://neokyo.com/en/product/2"
            ]
        );
        assert_eq!(request.currency.as_deref(), Some("eur"));
    }

    #[test]
    fn space_separated_urls_stay_separate() {
        let request = parse_request(
            "https://neokyo.com/en/product/1 https://neokyo.com/en/product/2",
            &table(),
            None,
        )
        .expect("should parse");
        assert_eq!(
            request.urls,
            [
                "https://neokyo.com/en/product/1",
                "https://neokyo.com/en/product/2"
            ]
        );
        assert!(request.currency.is_none());
    }

    #[test]
    fn mixed_space_and_comma_urls_with_currency() {
        let request = parse_request(
            "https://neokyo.com/en/product/1, https://neokyo.com/en/product/2 https://neokyo.com/en/product/3 usd",
            &table(),
            None,
        )
        .expect("should parse");
        assert_eq!(request.urls.len(), 3);
        assert_eq!(request.currency.as_deref(), Some("usd"));
    }

    #[test]
    fn no_default_currency_yields_none() {
        let request =
            parse_request("https://neokyo.com/en/product/1", &table(), None).expect("should parse");
        assert!(request.currency.is_none());
    }

    #[test]
    fn blank_comma_list_is_rejected() {
        assert!(parse_request(",", &table(), None).is_err());
    }
}
