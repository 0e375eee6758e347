//! Job artifact within a release
//!
//! A job is a named runtime role definition. Its identity is the pair of
//! `name` and `fingerprint`: two jobs with equal names are the same artifact
//! iff their fingerprints are equal.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub fingerprint: String,
    /// Content digest of the job archive (the manifest `sha1` field).
    pub digest: String,
    /// Location of the job archive inside the owning release's scratch
    /// directory. Unset for releases constructed in memory.
    pub archive_path: Option<PathBuf>,
    /// Names of the packages this job depends on at runtime.
    pub package_names: Vec<String>,
}

impl Job {
    pub fn new(name: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Job {
            name: name.into(),
            fingerprint: fingerprint.into(),
            digest: String::new(),
            archive_path: None,
            package_names: Vec::new(),
        }
    }
}
