//! Show the contents of a local release archive
//!
//! Usage: gantry inspect-release <path>

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::fs::sha256_file;
use crate::release::ReleaseReader;

pub fn execute(reader: &dyn ReleaseReader, path: &Path) -> Result<()> {
    let digest = sha256_file(path).context("Digesting release archive")?;

    let mut release = reader
        .read(path)
        .with_context(|| format!("Reading release '{}'", path.display()))?;

    println!(
        "Release {}/{}",
        release.name.cyan().bold(),
        release.version.cyan()
    );
    match &release.commit_hash {
        Some(commit) if release.uncommitted_changes => println!("Commit: {commit}+"),
        Some(commit) => println!("Commit: {commit}"),
        None => {}
    }
    println!("Archive sha256: {digest}");

    if !release.jobs.is_empty() {
        println!();
        println!("Jobs:");
        for job in &release.jobs {
            println!("  {}  {}", job.name.bold(), job.fingerprint.dimmed());
        }
    }

    if !release.compiled_packages.is_empty() {
        println!();
        println!("Compiled packages:");
        for pkg in &release.compiled_packages {
            println!(
                "  {}  {}  (stemcell {})",
                pkg.name.bold(),
                pkg.fingerprint.dimmed(),
                pkg.stemcell
            );
        }
    }

    if !release.packages.is_empty() {
        println!();
        println!(
            "{} {} source package(s) present; this release is not compiled:",
            "Warning:".yellow(),
            release.packages.len()
        );
        for pkg in &release.packages {
            println!("  {}  {}", pkg.name.bold(), pkg.fingerprint.dimmed());
        }
    }

    release.clean_up()?;

    Ok(())
}
