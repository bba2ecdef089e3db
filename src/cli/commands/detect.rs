//! Detect command implementation.

use crate::cli::preflight::check_input;
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use crate::summary::LanguageSummary;
use anyhow::Result;
use std::path::PathBuf;

/// Run the metadata detection stage.
pub fn run_detect(input: Option<PathBuf>, output: Option<PathBuf>, settings: Settings) -> Result<()> {
    let input = input.unwrap_or_else(|| settings.catalog_path());
    let output = output.unwrap_or_else(|| settings.scored_path());
    check_input(&input, "your catalog export")?;

    let pipeline = Pipeline::new(settings);
    let spinner = Output::spinner("Detecting languages from metadata...");
    let scored = pipeline.detect(&input, &output)?;
    spinner.finish_and_clear();

    let summary = LanguageSummary::from_tracks(&scored);
    Output::success(&format!(
        "Labeled {} tracks -> {}",
        scored.len(),
        output.display()
    ));
    Output::header("Languages");
    Output::language_summary(&summary);

    let unknown = summary.count(crate::catalog::UNKNOWN);
    if unknown > 0 {
        println!();
        Output::info(&format!(
            "{} tracks are still unknown. Run `lingo augment` to try their lyrics.",
            unknown
        ));
    }

    Ok(())
}
