//! Playlists command implementation.

use crate::cli::preflight::{self, check_input, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::{LanguageSelection, Pipeline};
use crate::playlist::{PlaylistOutcome, PlaylistReport};
use anyhow::Result;
use console::style;
use std::path::PathBuf;

/// Run the playlist creation stage.
pub async fn run_playlists(
    languages: &str,
    input: Option<PathBuf>,
    min_size: Option<usize>,
    dry_run: bool,
    mut settings: Settings,
) -> Result<()> {
    let selection = LanguageSelection::parse(languages)?;
    let input = input.unwrap_or_else(|| settings.augmented_path());
    if let Some(min_size) = min_size {
        settings.playlist.min_size = min_size;
    }
    check_input(&input, "lingo augment")?;

    let pipeline = Pipeline::new(settings);

    if dry_run {
        let groups = pipeline.groups(&input)?;
        let min_size = pipeline.settings().playlist.min_size;
        Output::header("Playlists (dry run)");
        for language in selection.resolve(&groups) {
            let count = groups.get(&language).map(|ids| ids.len()).unwrap_or(0);
            let name = pipeline.settings().playlist.playlist_name(&language);
            if count >= min_size {
                Output::list_item(&format!("{} ({} tracks)", style(name).bold(), count));
            } else {
                Output::list_item(&format!(
                    "{} {}",
                    name,
                    style(format!("skipped: {} tracks, need {}", count, min_size)).dim()
                ));
            }
        }
        return Ok(());
    }

    preflight::check(Operation::Playlists, pipeline.settings())?;
    let report = pipeline.create_playlists(&input, &selection).await?;
    print_report(&report);

    if report.failed() > 0 {
        anyhow::bail!("{} playlist(s) failed", report.failed());
    }
    Ok(())
}

/// Print one line per language, then the totals.
pub(crate) fn print_report(report: &PlaylistReport) {
    Output::header("Playlists");
    for (language, outcome) in &report.results {
        match outcome {
            PlaylistOutcome::Created { name, tracks, .. } => {
                Output::success(&format!("{} ({} tracks)", name, tracks));
            }
            PlaylistOutcome::Skipped { tracks } => {
                Output::info(&format!("Skipped {}: only {} tracks", language, tracks));
            }
            PlaylistOutcome::Failed { name, error } => {
                Output::error(&format!("{}: {}", name, error));
            }
        }
    }
    println!();
    Output::kv("Created", &report.created().to_string());
    Output::kv("Skipped", &report.skipped().to_string());
    Output::kv("Failed", &report.failed().to_string());
}
