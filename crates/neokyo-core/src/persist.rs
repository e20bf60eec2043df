//! Persistence planning: folder naming, collision policy, and the write plan.
//!
//! Pure decision logic only. The CLI executes the resulting [`WritePlan`];
//! filesystem probing is injected so the planner stays testable.

use std::path::{Path, PathBuf};

use crate::config::{Config, FolderNameStyle, NamingConvention};
use crate::item::ItemRecord;

/// Fallback folder name when the selected source field sanitizes to nothing.
const FALLBACK_FOLDER: &str = "product";

/// The spreadsheet regenerated from the CSV after every append.
pub const SPREADSHEET_NAME: &str = "neokyo.xlsx";

/// Strips every character that is not alphanumeric, space, or underscore,
/// trims, and replaces spaces with underscores. Idempotent.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

/// Derives the destination folder name for a record.
///
/// `style` picks the source field; sanitization applies unless the naming
/// convention is [`NamingConvention::Raw`]. A name that ends up empty falls
/// back to `"product"` so the plan never targets the base directory itself.
#[must_use]
pub fn folder_name(
    record: &ItemRecord,
    style: FolderNameStyle,
    convention: NamingConvention,
) -> String {
    let source = match style {
        FolderNameStyle::ItemId => &record.item_id,
        FolderNameStyle::Original => &record.title_original,
        FolderNameStyle::Translated => &record.title,
    };
    let name = match convention {
        NamingConvention::Safe => sanitize_name(source),
        NamingConvention::Raw => source.trim().to_owned(),
    };
    if name.is_empty() {
        FALLBACK_FOLDER.to_owned()
    } else {
        name
    }
}

/// One planned image write: where the bytes come from and where they land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStep {
    pub url: String,
    pub path: PathBuf,
}

/// The set of writes the executor should attempt, each independently
/// best-effort. A step is `None` when its output flag is off (or, for the
/// image, when the record carries no image URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePlan {
    pub folder: PathBuf,
    pub txt_path: Option<PathBuf>,
    pub image: Option<ImageStep>,
    pub csv_path: Option<PathBuf>,
    pub spreadsheet_path: Option<PathBuf>,
}

/// Outcome of planning: either a plan to execute or a non-fatal skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The destination folder already exists and overwriting is disabled.
    Skip { folder: PathBuf },
    Write(WritePlan),
}

/// Plans the writes for one record.
///
/// `folder_exists` probes the filesystem (pass `Path::exists` in production;
/// tests inject a constant). An existing folder with `overwrite_existing`
/// off yields [`PlanOutcome::Skip`] — a skip, not an error.
pub fn plan(
    record: &ItemRecord,
    config: &Config,
    folder_exists: impl Fn(&Path) -> bool,
) -> PlanOutcome {
    let base_dir = Path::new(&config.files.base_dir);
    let name = folder_name(
        record,
        config.output.folder_name_style,
        config.files.naming_convention,
    );
    let folder = base_dir.join(name);

    if folder_exists(&folder) && !config.output.overwrite_existing {
        return PlanOutcome::Skip { folder };
    }

    let txt_path = config.output.save_txt.then(|| folder.join("item.txt"));

    let image = record.image_url.as_ref().and_then(|url| {
        config.output.save_images.then(|| ImageStep {
            url: url.clone(),
            path: folder.join(format!(
                "{}1.{}",
                config.files.image_prefix, config.files.image_format
            )),
        })
    });

    let csv_path = config
        .output
        .save_csv
        .then(|| base_dir.join(&config.files.csv_name));
    // The spreadsheet is regenerated from the CSV, so it rides the same flag.
    let spreadsheet_path = config.output.save_csv.then(|| PathBuf::from(SPREADSHEET_NAME));

    PlanOutcome::Write(WritePlan {
        folder,
        txt_path,
        image,
        csv_path,
        spreadsheet_path,
    })
}
