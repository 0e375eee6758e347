//! Reading release archives
//!
//! A release archive is a gzipped tarball carrying a `release.MF` YAML
//! manifest at its root plus one artifact tarball per entry under `jobs/`,
//! `packages/`, and `compiled_packages/`. `ArchiveReader` extracts the
//! archive into a scratch directory owned by the resulting `Release`, so the
//! extracted artifacts stay available until the release is cleaned up.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use tempfile::TempDir;
use tracing::debug;

use super::job::Job;
use super::manifest::ReleaseManifest;
use super::pkg::{CompiledPackage, Package};
use super::Release;

/// Produces a `Release` from an archive or directory path. Substitutable by
/// a test double; the real implementation is `ArchiveReader`.
pub trait ReleaseReader {
    fn read(&self, path: &Path) -> Result<Release>;
}

#[derive(Debug, Default)]
pub struct ArchiveReader;

impl ArchiveReader {
    pub fn new() -> Self {
        ArchiveReader
    }
}

impl ReleaseReader for ArchiveReader {
    fn read(&self, path: &Path) -> Result<Release> {
        let scratch = TempDir::with_prefix("gantry-release-")
            .context("Creating extraction dir for release")?;

        extract_archive(path, scratch.path())
            .with_context(|| format!("Extracting release '{}'", path.display()))?;
        debug!(
            archive = %path.display(),
            extracted_to = %scratch.path().display(),
            "extracted release archive"
        );

        let manifest_path = scratch.path().join("release.MF");
        let manifest_content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Reading release manifest '{}'", manifest_path.display()))?;

        let manifest: ReleaseManifest =
            serde_yaml::from_str(&manifest_content).context("Parsing release manifest")?;

        release_from_manifest(manifest, scratch)
            .with_context(|| format!("Constructing release from '{}'", path.display()))
    }
}

fn extract_archive(archive_path: &Path, destination: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("Opening release archive '{}'", archive_path.display()))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive
        .unpack(destination)
        .context("Unpacking release archive")?;
    Ok(())
}

fn release_from_manifest(manifest: ReleaseManifest, scratch: TempDir) -> Result<Release> {
    let mut jobs = Vec::with_capacity(manifest.jobs.len());
    for entry in &manifest.jobs {
        jobs.push(Job {
            name: entry.name.clone(),
            fingerprint: entry.fingerprint.clone(),
            digest: entry.sha1.clone(),
            archive_path: Some(artifact_archive(scratch.path(), "jobs", &entry.name)?),
            package_names: Vec::new(),
        });
    }

    let mut packages = Vec::with_capacity(manifest.packages.len());
    for entry in &manifest.packages {
        packages.push(Package {
            name: entry.name.clone(),
            fingerprint: entry.fingerprint.clone(),
            digest: entry.sha1.clone(),
            archive_path: Some(artifact_archive(scratch.path(), "packages", &entry.name)?),
            dependency_names: entry.dependencies.clone(),
        });
    }

    let mut compiled_packages = Vec::with_capacity(manifest.compiled_packages.len());
    for entry in &manifest.compiled_packages {
        compiled_packages.push(CompiledPackage {
            name: entry.name.clone(),
            fingerprint: entry.fingerprint.clone(),
            stemcell: entry.stemcell.clone(),
            digest: entry.sha1.clone(),
            archive_path: Some(artifact_archive(
                scratch.path(),
                "compiled_packages",
                &entry.name,
            )?),
            dependency_names: entry.dependencies.clone(),
        });
    }

    Ok(Release {
        name: manifest.name,
        version: manifest.version,
        commit_hash: manifest.commit_hash,
        uncommitted_changes: manifest.uncommitted_changes,
        jobs,
        packages,
        compiled_packages,
        scratch: Some(scratch),
    })
}

/// Every manifest entry must have its artifact tarball in the extracted
/// tree; a listing without content is a broken archive.
fn artifact_archive(extracted: &Path, kind: &str, name: &str) -> Result<PathBuf> {
    let path = extracted.join(kind).join(format!("{name}.tgz"));
    if !path.is_file() {
        bail!("Missing archive for '{name}' (expected '{kind}/{name}.tgz')");
    }
    Ok(path)
}
