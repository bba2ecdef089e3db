//! Summary command implementation.

use crate::cli::Output;
use crate::summary::LanguageSummary;
use anyhow::{Context, Result};
use std::path::Path;

/// Print the language distribution of a track file.
pub fn run_summary(file: &Path) -> Result<()> {
    let summary = LanguageSummary::from_file(file)
        .with_context(|| format!("Failed to summarize {}", file.display()))?;

    Output::header(&format!("Languages in {}", file.display()));
    Output::language_summary(&summary);
    Ok(())
}
