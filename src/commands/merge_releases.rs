//! Merge two compiled release archives into one
//!
//! Usage: gantry merge-releases <release-1> <release-2> <target-path>
//!
//! Reads both archives, merges their jobs and compiled packages (rejecting
//! fingerprint conflicts), writes the merged release to a temporary archive,
//! and moves it to the target path. Nothing is written to the target path
//! unless every prior step succeeded.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::fs::move_file;
use crate::release::{merge, ReleaseReader, ReleaseWriter};

pub fn execute(
    reader: &dyn ReleaseReader,
    writer: &dyn ReleaseWriter,
    release_path_1: &Path,
    release_path_2: &Path,
    target_path: &Path,
) -> Result<()> {
    let mut release_1 = reader
        .read(release_path_1)
        .with_context(|| format!("Reading release '{}'", release_path_1.display()))?;

    let mut release_2 = reader
        .read(release_path_2)
        .with_context(|| format!("Reading release '{}'", release_path_2.display()))?;

    // On any failure from here on, the extracted sources are still removed
    // when the two releases drop.
    let merged = merge(&release_1, &release_2)?;

    let temp_path = writer
        .write(&merged, &[])
        .context("Writing merged release")?;

    move_file(&temp_path, target_path).context("Copying merged release to target path")?;

    release_1.clean_up()?;
    release_2.clean_up()?;

    println!(
        "Merged release '{}/{}' written to {}",
        merged.name.cyan(),
        merged.version.cyan(),
        target_path.display().to_string().green()
    );

    Ok(())
}
