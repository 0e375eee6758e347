//! Release model and archive plumbing
//!
//! A `Release` is a named, versioned bundle of jobs and packages. Releases
//! read from an archive own a scratch directory holding the extracted
//! artifact archives; the scratch directory is removed when the release is
//! cleaned up (or dropped).
//!
//! Submodules:
//! - `job` / `pkg`: the artifact types
//! - `manifest`: the serializable `release.MF` form
//! - `merge`: combining two compiled releases into one
//! - `reader` / `writer`: archive extraction and serialization

pub mod job;
pub mod manifest;
pub mod merge;
pub mod pkg;
pub mod reader;
pub mod writer;

use anyhow::{Context, Result};
use tempfile::TempDir;

pub use job::Job;
pub use manifest::ReleaseManifest;
pub use merge::{merge, MergeError};
pub use pkg::{CompiledPackage, Package};
pub use reader::{ArchiveReader, ReleaseReader};
pub use writer::{ArchiveWriter, ReleaseWriter};

#[derive(Debug, Default)]
pub struct Release {
    pub name: String,
    pub version: String,
    pub commit_hash: Option<String>,
    pub uncommitted_changes: bool,
    pub jobs: Vec<Job>,
    /// Source-form packages. Non-empty means the release is not compiled.
    pub packages: Vec<Package>,
    pub compiled_packages: Vec<CompiledPackage>,
    /// Extraction scratch directory, present for releases read from an
    /// archive. Owned: dropping the release removes it from disk.
    pub scratch: Option<TempDir>,
}

impl Release {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Release {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// A release is compiled once it carries no source-form packages.
    pub fn is_compiled(&self) -> bool {
        self.packages.is_empty()
    }

    /// Remove the extraction scratch directory, if any. Idempotent; also
    /// happens implicitly on drop, but calling it explicitly surfaces
    /// removal errors instead of swallowing them.
    pub fn clean_up(&mut self) -> Result<()> {
        if let Some(scratch) = self.scratch.take() {
            let path = scratch.path().to_path_buf();
            scratch
                .close()
                .with_context(|| format!("Removing extracted release at '{}'", path.display()))?;
        }
        Ok(())
    }

    /// Project the release into its serializable `release.MF` form.
    pub fn manifest(&self) -> ReleaseManifest {
        ReleaseManifest {
            name: self.name.clone(),
            version: self.version.clone(),
            commit_hash: self.commit_hash.clone(),
            uncommitted_changes: self.uncommitted_changes,
            jobs: self
                .jobs
                .iter()
                .map(|job| manifest::JobEntry {
                    name: job.name.clone(),
                    version: job.fingerprint.clone(),
                    fingerprint: job.fingerprint.clone(),
                    sha1: job.digest.clone(),
                })
                .collect(),
            packages: self
                .packages
                .iter()
                .map(|pkg| manifest::PackageEntry {
                    name: pkg.name.clone(),
                    version: pkg.fingerprint.clone(),
                    fingerprint: pkg.fingerprint.clone(),
                    sha1: pkg.digest.clone(),
                    dependencies: pkg.dependency_names.clone(),
                })
                .collect(),
            compiled_packages: self
                .compiled_packages
                .iter()
                .map(|pkg| manifest::CompiledPackageEntry {
                    name: pkg.name.clone(),
                    version: pkg.fingerprint.clone(),
                    fingerprint: pkg.fingerprint.clone(),
                    stemcell: pkg.stemcell.clone(),
                    sha1: pkg.digest.clone(),
                    dependencies: pkg.dependency_names.clone(),
                })
                .collect(),
        }
    }
}
