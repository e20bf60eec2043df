//! Spreadsheet regeneration from the append-only CSV.
//!
//! The workbook is rebuilt wholesale on every append: URL columns become
//! real hyperlinks with short display text, the header row is bold, and
//! column widths track the widest cell up to a cap.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook};

const MAX_COLUMN_WIDTH: usize = 50;
const ROW_HEIGHT: f64 = 25.0;

/// Rebuilds `output` from the CSV at `csv_path`.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read or the workbook cannot be
/// written; the caller treats either as a non-fatal per-step failure.
pub fn export_from_csv(csv_path: &Path, output: &Path) -> anyhow::Result<()> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();
    let cell_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, u16::try_from(col)?, header, &header_format)?;
    }
    worksheet.set_row_height(0, ROW_HEIGHT)?;

    for (row_offset, result) in reader.records().enumerate() {
        let row = u32::try_from(row_offset)? + 1;
        let fields = result?;
        for (col, value) in fields.iter().enumerate() {
            let col_index = u16::try_from(col)?;
            match hyperlink_text(&headers, col, value) {
                Some(text) => {
                    worksheet.write_url_with_text(row, col_index, value, text)?;
                    widths[col] = widths[col].max(text.len());
                }
                None => {
                    worksheet.write_string_with_format(row, col_index, value, &cell_format)?;
                    widths[col] = widths[col].max(value.chars().count());
                }
            }
        }
        worksheet.set_row_height(row, ROW_HEIGHT)?;
    }

    for (col, width) in widths.iter().enumerate() {
        let capped = u32::try_from((width + 4).min(MAX_COLUMN_WIDTH))?;
        worksheet.set_column_width(u16::try_from(col)?, f64::from(capped))?;
    }

    workbook.save(output)?;
    Ok(())
}

/// Display text for link columns; non-link columns and non-http values
/// render as plain cells.
fn hyperlink_text(headers: &[String], col: usize, value: &str) -> Option<&'static str> {
    if !value.starts_with("http") {
        return None;
    }
    match headers.get(col).map(String::as_str) {
        Some("url") => Some("PRODUCT"),
        Some("image_url") => Some("IMAGE"),
        _ => None,
    }
}
