//! Run command: every stage in sequence.

use super::playlists::print_report;
use crate::cli::preflight::{self, check_input, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::{LanguageSelection, Pipeline};
use crate::summary::LanguageSummary;
use anyhow::Result;
use std::path::PathBuf;

/// Run detect, augment and playlists over the data directory.
pub async fn run_pipeline(
    languages: &str,
    catalog: Option<PathBuf>,
    min_size: Option<usize>,
    mut settings: Settings,
) -> Result<()> {
    let selection = LanguageSelection::parse(languages)?;
    let catalog = catalog.unwrap_or_else(|| settings.catalog_path());
    if let Some(min_size) = min_size {
        settings.playlist.min_size = min_size;
    }
    check_input(&catalog, "your catalog export")?;
    preflight::check(Operation::Run, &settings)?;

    let pipeline = Pipeline::new(settings);
    let spinner = Output::spinner("Running pipeline (this may take a while)...");
    let report = pipeline.run(&catalog, &selection).await?;
    spinner.finish_and_clear();

    Output::header("Metadata detection");
    Output::language_summary(&report.detected);

    Output::header("After lyrics");
    Output::kv("Looked up", &report.augment.stats.looked_up.to_string());
    Output::kv("Resolved from lyrics", &report.augment.stats.resolved_by_lyrics.to_string());
    Output::language_summary(&LanguageSummary::from_tracks(&report.augment.records));

    print_report(&report.playlists);
    if report.playlists.failed() > 0 {
        anyhow::bail!("{} playlist(s) failed", report.playlists.failed());
    }
    Ok(())
}
