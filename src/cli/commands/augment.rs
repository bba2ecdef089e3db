//! Augment command implementation.

use crate::catalog::load_scored;
use crate::cli::output::truncate;
use crate::cli::preflight::{self, check_input, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use crate::summary::LanguageSummary;
use anyhow::Result;
use std::path::PathBuf;

/// Run the resumable lyrics augmentation stage.
pub async fn run_augment(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    settings: Settings,
) -> Result<()> {
    let input = input.unwrap_or_else(|| settings.scored_path());
    let output = output.unwrap_or_else(|| settings.augmented_path());
    check_input(&input, "lingo detect")?;
    preflight::check(Operation::Augment, &settings)?;

    let tracks = load_scored(&input)?;
    let pending = tracks.iter().filter(|t| t.is_unknown()).count();
    Output::info(&format!(
        "{} tracks, {} without a language from metadata",
        tracks.len(),
        pending
    ));

    let pipeline = Pipeline::new(settings);
    let pb = Output::progress_bar(tracks.len() as u64, "Augmenting");
    let report = pipeline
        .augment_tracks(tracks, &output, |record| {
            pb.set_message(truncate(&record.scored.track.name, 40));
            pb.inc(1);
        })
        .await?;
    pb.finish_and_clear();

    let stats = &report.stats;
    Output::success(&format!("Wrote {} records -> {}", report.records.len(), output.display()));
    Output::kv("Resumed from checkpoint", &stats.reused.to_string());
    Output::kv("Resolved by metadata", &stats.from_metadata.to_string());
    Output::kv("Looked up", &stats.looked_up.to_string());
    Output::kv("Resolved from lyrics", &stats.resolved_by_lyrics.to_string());
    Output::kv("Known without lyrics", &stats.without_lyrics.to_string());
    Output::kv("Not found", &stats.not_found.to_string());

    Output::header("Languages");
    Output::language_summary(&LanguageSummary::from_tracks(&report.records));

    Ok(())
}
