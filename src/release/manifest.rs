//! Serde model of the `release.MF` manifest carried inside a release archive.
//!
//! The format follows the orchestrator's release tarball convention: a YAML
//! document listing jobs, source-form packages, and compiled packages by
//! name/fingerprint/digest. Empty sections are omitted when serializing so a
//! fully compiled release carries no `packages:` key at all. The per-entry
//! `version` field is written as the fingerprint; the fingerprint alone is
//! the identity on read.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub uncommitted_changes: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<JobEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<PackageEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compiled_packages: Vec<CompiledPackageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    pub name: String,
    pub version: String,
    pub fingerprint: String,
    pub sha1: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    pub version: String,
    pub fingerprint: String,
    pub sha1: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledPackageEntry {
    pub name: String,
    pub version: String,
    pub fingerprint: String,
    pub stemcell: String,
    pub sha1: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !value
}
