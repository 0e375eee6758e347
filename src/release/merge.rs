//! Merging two compiled releases into one
//!
//! Two archives of the same release name/version, built independently, can
//! be combined as long as every artifact they both carry is content-identical.
//! Jobs and compiled packages are reconciled by name: one representative per
//! name survives, and a name carried by both sides with differing
//! fingerprints aborts the whole merge. Source-form packages make a release
//! ineligible; only fully compiled releases merge.
//!
//! The engine is pure: it never touches disk and never mutates its inputs.

use std::collections::HashMap;

use thiserror::Error;

use super::job::Job;
use super::pkg::CompiledPackage;
use super::Release;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("release names do not match: '{left}' vs '{right}'")]
    NameMismatch { left: String, right: String },

    #[error("release versions do not match: '{left}' vs '{right}'")]
    VersionMismatch { left: String, right: String },

    #[error("release '{0}' contains source packages; only compiled releases can be merged")]
    NotCompiled(String),

    #[error("job '{name}' has conflicting fingerprints: '{left}' vs '{right}'")]
    JobConflict {
        name: String,
        left: String,
        right: String,
    },

    #[error("compiled package '{name}' has conflicting fingerprints: '{left}' vs '{right}'")]
    PackageConflict {
        name: String,
        left: String,
        right: String,
    },
}

/// Artifacts that reconcile by name with fingerprint identity.
trait NamedArtifact: Clone {
    fn name(&self) -> &str;
    fn fingerprint(&self) -> &str;
}

impl NamedArtifact for Job {
    fn name(&self) -> &str {
        &self.name
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl NamedArtifact for CompiledPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Combine two compiled releases of the same name and version.
///
/// Preconditions are checked in order, short-circuiting on the first
/// failure: name equality, version equality, then compiled-only on each
/// input. Reconciliation then folds both job lists and both
/// compiled-package lists into name-keyed mappings; an artifact present on
/// both sides must have equal fingerprints or the merge fails with a
/// conflict naming it. No partial result is ever produced.
///
/// The merged release is a fresh value: it owns no scratch directory and
/// holds clones of the surviving artifacts, in first-seen order.
pub fn merge(first: &Release, second: &Release) -> Result<Release, MergeError> {
    if first.name != second.name {
        return Err(MergeError::NameMismatch {
            left: first.name.clone(),
            right: second.name.clone(),
        });
    }

    if first.version != second.version {
        return Err(MergeError::VersionMismatch {
            left: first.version.clone(),
            right: second.version.clone(),
        });
    }

    for release in [first, second] {
        if !release.is_compiled() {
            return Err(MergeError::NotCompiled(release.name.clone()));
        }
    }

    let jobs = reconcile(&first.jobs, &second.jobs, |name, left, right| {
        MergeError::JobConflict { name, left, right }
    })?;

    let compiled_packages = reconcile(
        &first.compiled_packages,
        &second.compiled_packages,
        |name, left, right| MergeError::PackageConflict { name, left, right },
    )?;

    Ok(Release {
        name: first.name.clone(),
        version: first.version.clone(),
        commit_hash: first.commit_hash.clone(),
        uncommitted_changes: first.uncommitted_changes || second.uncommitted_changes,
        jobs,
        packages: Vec::new(),
        compiled_packages,
        scratch: None,
    })
}

/// Fold both artifact lists into a name-keyed mapping, keeping the first
/// occurrence of each name. A repeated name is a harmless duplicate when
/// fingerprints match and a merge-aborting conflict when they differ.
fn reconcile<T, F>(first: &[T], second: &[T], conflict: F) -> Result<Vec<T>, MergeError>
where
    T: NamedArtifact,
    F: Fn(String, String, String) -> MergeError,
{
    let mut merged: Vec<T> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for artifact in first.iter().chain(second.iter()) {
        match index.get(artifact.name()) {
            None => {
                index.insert(artifact.name().to_string(), merged.len());
                merged.push(artifact.clone());
            }
            Some(&existing) => {
                let kept = &merged[existing];
                if kept.fingerprint() != artifact.fingerprint() {
                    return Err(conflict(
                        artifact.name().to_string(),
                        kept.fingerprint().to_string(),
                        artifact.fingerprint().to_string(),
                    ));
                }
            }
        }
    }

    Ok(merged)
}
