//! Shared test helpers for building release archive fixtures

use std::fs;
use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use gantry::release::manifest::{CompiledPackageEntry, JobEntry, ReleaseManifest};

/// Test helper: describe a release fixture by name/version plus
/// (name, fingerprint) pairs for its jobs and compiled packages.
pub struct FixtureRelease<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub jobs: Vec<(&'a str, &'a str)>,
    pub compiled_packages: Vec<(&'a str, &'a str)>,
}

/// Build a real `.tgz` release archive at `dest`: a `release.MF` manifest
/// plus one artifact tarball per entry, each holding recognizable content.
pub fn write_release_archive(dest: &Path, fixture: &FixtureRelease) {
    let staging = TempDir::new().expect("Failed to create staging directory");

    let manifest = ReleaseManifest {
        name: fixture.name.to_string(),
        version: fixture.version.to_string(),
        jobs: fixture
            .jobs
            .iter()
            .map(|(name, fingerprint)| JobEntry {
                name: name.to_string(),
                version: fingerprint.to_string(),
                fingerprint: fingerprint.to_string(),
                sha1: format!("{name}-sha"),
            })
            .collect(),
        compiled_packages: fixture
            .compiled_packages
            .iter()
            .map(|(name, fingerprint)| CompiledPackageEntry {
                name: name.to_string(),
                version: fingerprint.to_string(),
                fingerprint: fingerprint.to_string(),
                stemcell: "ubuntu-jammy/1.83".to_string(),
                sha1: format!("{name}-sha"),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };

    let manifest_yaml = serde_yaml::to_string(&manifest).expect("Failed to serialize manifest");
    fs::write(staging.path().join("release.MF"), manifest_yaml)
        .expect("Failed to write release.MF");

    if !fixture.jobs.is_empty() {
        let jobs_dir = staging.path().join("jobs");
        fs::create_dir_all(&jobs_dir).expect("Failed to create jobs dir");
        for (name, _) in &fixture.jobs {
            fs::write(jobs_dir.join(format!("{name}.tgz")), artifact_content(name))
                .expect("Failed to write job archive");
        }
    }

    if !fixture.compiled_packages.is_empty() {
        let pkgs_dir = staging.path().join("compiled_packages");
        fs::create_dir_all(&pkgs_dir).expect("Failed to create compiled_packages dir");
        for (name, _) in &fixture.compiled_packages {
            fs::write(pkgs_dir.join(format!("{name}.tgz")), artifact_content(name))
                .expect("Failed to write compiled package archive");
        }
    }

    let file = File::create(dest).expect("Failed to create archive file");
    let encoder = GzEncoder::new(file, Compression::default());
    let mut tar = tar::Builder::new(encoder);
    tar.append_dir_all(".", staging.path())
        .expect("Failed to pack archive");
    tar.into_inner()
        .and_then(|encoder| encoder.finish())
        .expect("Failed to finish archive");
}

/// Deterministic content for an artifact tarball, so reads can verify the
/// right bytes survived a merge.
pub fn artifact_content(name: &str) -> Vec<u8> {
    format!("{name}-content").into_bytes()
}
