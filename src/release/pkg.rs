//! Package artifacts within a release
//!
//! Two forms exist: `Package` (source form, pre-compilation) and
//! `CompiledPackage` (compiled against a specific stemcell). A release that
//! still contains any source-form package is "not compiled" and cannot be
//! merged.

use std::path::PathBuf;

/// A source-form package, not yet compiled against a stemcell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub fingerprint: String,
    pub digest: String,
    pub archive_path: Option<PathBuf>,
    pub dependency_names: Vec<String>,
}

impl Package {
    pub fn new(name: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            fingerprint: fingerprint.into(),
            digest: String::new(),
            archive_path: None,
            dependency_names: Vec::new(),
        }
    }
}

/// A package compiled against a specific stemcell (OS/version slug).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPackage {
    pub name: String,
    pub fingerprint: String,
    /// OS/version slug of the stemcell this package was compiled against,
    /// e.g. `ubuntu-jammy/1.83`.
    pub stemcell: String,
    pub digest: String,
    pub archive_path: Option<PathBuf>,
    pub dependency_names: Vec<String>,
}

impl CompiledPackage {
    pub fn new(
        name: impl Into<String>,
        fingerprint: impl Into<String>,
        stemcell: impl Into<String>,
    ) -> Self {
        CompiledPackage {
            name: name.into(),
            fingerprint: fingerprint.into(),
            stemcell: stemcell.into(),
            digest: String::new(),
            archive_path: None,
            dependency_names: Vec::new(),
        }
    }
}
