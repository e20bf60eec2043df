//! Write-plan execution: text dump, image download, CSV append, spreadsheet.
//!
//! Every step is independently best-effort and reports its own outcome; a
//! failed image download never blocks the CSV append, and a partially
//! populated folder is accepted rather than rolled back.

mod spreadsheet;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use colored::Colorize;

use neokyo_core::persist::{ImageStep, WritePlan};
use neokyo_core::{Config, Conversion, ItemRecord, PlanOutcome};
use neokyo_scraper::PageClient;

/// Stable CSV column set; absent optionals become empty cells so rows never
/// shift regardless of which fields a given record carried.
const CSV_COLUMNS: [&str; 11] = [
    "title",
    "title_original",
    "seller",
    "item_id",
    "condition",
    "shipping",
    "price_yen",
    "converted_price",
    "converted_currency",
    "image_url",
    "url",
];

/// Plans and executes the writes for one record.
pub async fn save_product(
    client: &PageClient,
    record: &ItemRecord,
    url: &str,
    conversion: Option<&Conversion>,
    config: &Config,
) {
    if let Err(err) = fs::create_dir_all(&config.files.base_dir) {
        println!(
            "{}",
            format!("could not create {}: {err}", config.files.base_dir).red()
        );
        return;
    }

    match neokyo_core::plan(record, config, |path| path.exists()) {
        PlanOutcome::Skip { folder } => {
            println!(
                "{}\n",
                format!("data for this item already exists: {}", folder.display()).red()
            );
        }
        PlanOutcome::Write(write_plan) => {
            execute_plan(client, &write_plan, record, url, conversion, config).await;
        }
    }
}

async fn execute_plan(
    client: &PageClient,
    write_plan: &WritePlan,
    record: &ItemRecord,
    url: &str,
    conversion: Option<&Conversion>,
    config: &Config,
) {
    if let Err(err) = fs::create_dir_all(&write_plan.folder) {
        println!(
            "{}",
            format!(
                "could not create {}: {err}",
                write_plan.folder.display()
            )
            .red()
        );
        return;
    }

    if let Some(txt_path) = &write_plan.txt_path {
        match write_txt(txt_path, record, url) {
            Ok(()) => println!(
                "{}",
                format!("saved product data to: {}", txt_path.display()).green()
            ),
            Err(err) => println!("{}", format!("failed to save item.txt: {err}").red()),
        }
    }

    if let Some(image) = &write_plan.image {
        match save_image(client, image).await {
            Ok(()) => println!(
                "{}",
                format!("saved image to: {}", image.path.display()).green()
            ),
            Err(err) => println!("{}", format!("failed to save image: {err:#}").red()),
        }
    }

    if let Some(csv_path) = &write_plan.csv_path {
        match append_csv(csv_path, record, url, conversion) {
            Ok(()) => {
                println!(
                    "{}\n",
                    format!("appended product to: {}", csv_path.display()).green()
                );
                if let Some(spreadsheet_path) = &write_plan.spreadsheet_path {
                    match spreadsheet::export_from_csv(csv_path, spreadsheet_path) {
                        Ok(()) => println!(
                            "{}",
                            format!("spreadsheet created: {}", spreadsheet_path.display())
                                .cyan()
                        ),
                        Err(err) => println!(
                            "{}",
                            format!("could not create spreadsheet: {err:#}").yellow()
                        ),
                    }
                }
            }
            Err(err) => println!("{}", format!("failed to append csv: {err:#}").red()),
        }
    }

    if config.output.open_folder {
        if let Err(err) = open::that(&write_plan.folder) {
            println!(
                "{}",
                format!("could not open folder automatically: {err}").yellow()
            );
        }
    }
}

/// Writes every present field plus the source URL, one `key: value` per line.
fn write_txt(path: &Path, record: &ItemRecord, url: &str) -> anyhow::Result<()> {
    let mut contents = String::new();
    for (key, value) in record.all_fields() {
        writeln!(contents, "{key}: {value}")?;
    }
    writeln!(contents, "url: {url}")?;
    fs::write(path, contents)?;
    Ok(())
}

async fn save_image(client: &PageClient, image: &ImageStep) -> anyhow::Result<()> {
    let bytes = client.fetch_bytes(&image.url).await?;
    fs::write(&image.path, bytes)?;
    Ok(())
}

/// Appends one row, writing the header only when the file is new.
fn append_csv(
    path: &Path,
    record: &ItemRecord,
    url: &str,
    conversion: Option<&Conversion>,
) -> anyhow::Result<()> {
    let is_new = !path.exists();
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);

    if is_new {
        writer.write_record(CSV_COLUMNS)?;
    }

    let price_yen = record.price_yen.to_string();
    let converted_price = conversion
        .map(|c| c.amount.to_string())
        .unwrap_or_default();
    let converted_currency = conversion.map(|c| c.code.clone()).unwrap_or_default();
    writer.write_record([
        record.title.as_str(),
        record.title_original.as_str(),
        record.seller.as_deref().unwrap_or(""),
        record.item_id.as_str(),
        record.condition.as_deref().unwrap_or(""),
        record.shipping.as_deref().unwrap_or(""),
        price_yen.as_str(),
        converted_price.as_str(),
        converted_currency.as_str(),
        record.image_url.as_deref().unwrap_or(""),
        url,
    ])?;
    writer.flush()?;
    Ok(())
}
