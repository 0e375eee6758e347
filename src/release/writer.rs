//! Writing release archives
//!
//! `ArchiveWriter` serializes a `Release` back into a gzipped tarball: it
//! stages `release.MF` and the artifact tarballs into a fresh directory,
//! compresses the staging directory, and returns the path of the resulting
//! temporary archive. The caller owns moving that archive to its final
//! location. Compiled packages whose fingerprints appear on the skip list
//! are listed in the manifest but their content is not staged.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;
use tracing::debug;

use super::Release;

/// Serializes a `Release` to a temporary archive path. Substitutable by a
/// test double; the real implementation is `ArchiveWriter`.
pub trait ReleaseWriter {
    fn write(&self, release: &Release, skip_fingerprints: &[String]) -> Result<PathBuf>;
}

#[derive(Debug, Default)]
pub struct ArchiveWriter;

impl ArchiveWriter {
    pub fn new() -> Self {
        ArchiveWriter
    }
}

impl ReleaseWriter for ArchiveWriter {
    fn write(&self, release: &Release, skip_fingerprints: &[String]) -> Result<PathBuf> {
        let staging =
            TempDir::with_prefix("gantry-staging-").context("Creating staging release dir")?;
        debug!(staging = %staging.path().display(), "staging release for writing");

        let manifest =
            serde_yaml::to_string(&release.manifest()).context("Serializing release manifest")?;
        let manifest_path = staging.path().join("release.MF");
        std::fs::write(&manifest_path, manifest)
            .with_context(|| format!("Writing release manifest '{}'", manifest_path.display()))?;

        stage_jobs(release, staging.path()).context("Writing jobs")?;
        stage_packages(release, staging.path(), skip_fingerprints).context("Writing packages")?;
        stage_compiled_packages(release, staging.path(), skip_fingerprints)
            .context("Writing compiled packages")?;

        let archive_path = compress(staging.path()).context("Compressing release")?;
        debug!(archive = %archive_path.display(), "wrote release archive");

        // Staging dir is removed when `staging` drops.
        Ok(archive_path)
    }
}

fn stage_jobs(release: &Release, staging: &Path) -> Result<()> {
    if release.jobs.is_empty() {
        return Ok(());
    }

    let jobs_dir = staging.join("jobs");
    std::fs::create_dir_all(&jobs_dir).context("Creating jobs/")?;

    for job in &release.jobs {
        let Some(source) = &job.archive_path else {
            bail!("Job '{}' has no archive to write", job.name);
        };
        let destination = jobs_dir.join(format!("{}.tgz", job.name));
        std::fs::copy(source, &destination)
            .with_context(|| format!("Copying job '{}' archive into staging dir", job.name))?;
    }

    Ok(())
}

fn stage_packages(release: &Release, staging: &Path, skip_fingerprints: &[String]) -> Result<()> {
    if release.packages.is_empty() {
        return Ok(());
    }

    let packages_dir = staging.join("packages");
    std::fs::create_dir_all(&packages_dir).context("Creating packages/")?;

    for pkg in &release.packages {
        if skip_fingerprints.contains(&pkg.fingerprint) {
            debug!(package = %pkg.name, "skipping package content");
            continue;
        }
        let Some(source) = &pkg.archive_path else {
            bail!("Package '{}' has no archive to write", pkg.name);
        };
        let destination = packages_dir.join(format!("{}.tgz", pkg.name));
        std::fs::copy(source, &destination)
            .with_context(|| format!("Copying package '{}' archive into staging dir", pkg.name))?;
    }

    Ok(())
}

fn stage_compiled_packages(
    release: &Release,
    staging: &Path,
    skip_fingerprints: &[String],
) -> Result<()> {
    if release.compiled_packages.is_empty() {
        return Ok(());
    }

    let packages_dir = staging.join("compiled_packages");
    std::fs::create_dir_all(&packages_dir).context("Creating compiled_packages/")?;

    for pkg in &release.compiled_packages {
        if skip_fingerprints.contains(&pkg.fingerprint) {
            debug!(package = %pkg.name, "skipping compiled package content");
            continue;
        }
        let Some(source) = &pkg.archive_path else {
            bail!("Compiled package '{}' has no archive to write", pkg.name);
        };
        let destination = packages_dir.join(format!("{}.tgz", pkg.name));
        std::fs::copy(source, &destination).with_context(|| {
            format!(
                "Copying compiled package '{}' archive into staging dir",
                pkg.name
            )
        })?;
    }

    Ok(())
}

/// Pack the staging directory into a gzipped tarball at a temporary path
/// that survives this call; the caller decides where it ends up.
fn compress(staging: &Path) -> Result<PathBuf> {
    compress_into(staging, &std::env::temp_dir())
}

/// The archive file stays owned by the tempfile handle until packing has
/// fully succeeded; a failure while packing removes it instead of leaking
/// an orphaned partial archive.
fn compress_into(staging: &Path, out_dir: &Path) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("gantry-release-")
        .suffix(".tgz")
        .tempfile_in(out_dir)
        .context("Creating release archive file")?;

    let encoder = GzEncoder::new(file.as_file(), Compression::default());
    let mut tar = tar::Builder::new(encoder);
    tar.append_dir_all(".", staging)
        .context("Packing staged release")?;
    tar.into_inner()
        .and_then(|encoder| encoder.finish())
        .context("Finishing release archive")?;

    let (_file, archive_path) = file.keep().context("Persisting release archive file")?;
    Ok(archive_path)
}
