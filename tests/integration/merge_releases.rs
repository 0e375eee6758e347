//! End-to-end merge tests over real release archives

use std::collections::HashSet;
use std::fs;

use gantry::commands::{inspect_release, merge_releases};
use gantry::release::{ArchiveReader, ArchiveWriter, ReleaseReader};

use super::helpers::{artifact_content, write_release_archive, FixtureRelease};

#[test]
fn test_merges_two_overlapping_archives() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path_1 = dir.path().join("release-1.tgz");
    let path_2 = dir.path().join("release-2.tgz");
    let target = dir.path().join("merged.tgz");

    write_release_archive(
        &path_1,
        &FixtureRelease {
            name: "rel",
            version: "v1",
            jobs: vec![("job-1", "fp-1"), ("job-2", "fp-2")],
            compiled_packages: vec![("pkg-1", "fpp-1"), ("pkg-2", "fpp-2")],
        },
    );
    write_release_archive(
        &path_2,
        &FixtureRelease {
            name: "rel",
            version: "v1",
            jobs: vec![("job-2", "fp-2"), ("job-3", "fp-3")],
            compiled_packages: vec![("pkg-2", "fpp-2")],
        },
    );

    merge_releases::execute(
        &ArchiveReader::new(),
        &ArchiveWriter::new(),
        &path_1,
        &path_2,
        &target,
    )
    .expect("Merge failed");

    let mut merged = ArchiveReader::new()
        .read(&target)
        .expect("Failed to read merged archive");

    assert_eq!(merged.name, "rel");
    assert_eq!(merged.version, "v1");
    assert!(merged.is_compiled());

    let job_names: HashSet<&str> = merged.jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(job_names, HashSet::from(["job-1", "job-2", "job-3"]));

    let pkg_names: HashSet<&str> = merged
        .compiled_packages
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(pkg_names, HashSet::from(["pkg-1", "pkg-2"]));

    // Artifact content survives the merge
    let job_1 = merged
        .jobs
        .iter()
        .find(|j| j.name == "job-1")
        .expect("job-1 missing");
    let archive_path = job_1.archive_path.as_ref().expect("job-1 has no archive");
    assert_eq!(fs::read(archive_path).unwrap(), artifact_content("job-1"));

    merged.clean_up().expect("Failed to clean up");
}

#[test]
fn test_conflicting_archives_leave_no_target_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path_1 = dir.path().join("release-1.tgz");
    let path_2 = dir.path().join("release-2.tgz");
    let target = dir.path().join("merged.tgz");

    write_release_archive(
        &path_1,
        &FixtureRelease {
            name: "rel",
            version: "v1",
            jobs: vec![("job-1", "fp-1")],
            compiled_packages: vec![],
        },
    );
    write_release_archive(
        &path_2,
        &FixtureRelease {
            name: "rel",
            version: "v1",
            jobs: vec![("job-1", "fp-other")],
            compiled_packages: vec![],
        },
    );

    let err = merge_releases::execute(
        &ArchiveReader::new(),
        &ArchiveWriter::new(),
        &path_1,
        &path_2,
        &target,
    )
    .expect_err("Merge should have failed");

    assert!(err.to_string().contains("job-1"));
    assert!(!target.exists());
}

#[test]
fn test_mismatched_names_fail_without_output() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path_1 = dir.path().join("release-1.tgz");
    let path_2 = dir.path().join("release-2.tgz");
    let target = dir.path().join("merged.tgz");

    write_release_archive(
        &path_1,
        &FixtureRelease {
            name: "rel-1",
            version: "v1",
            jobs: vec![],
            compiled_packages: vec![],
        },
    );
    write_release_archive(
        &path_2,
        &FixtureRelease {
            name: "rel-2",
            version: "v1",
            jobs: vec![],
            compiled_packages: vec![],
        },
    );

    let err = merge_releases::execute(
        &ArchiveReader::new(),
        &ArchiveWriter::new(),
        &path_1,
        &path_2,
        &target,
    )
    .expect_err("Merge should have failed");

    assert!(err.to_string().contains("names do not match"));
    assert!(!target.exists());
}

#[test]
fn test_unreadable_archive_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path_1 = dir.path().join("not-an-archive.tgz");
    fs::write(&path_1, b"garbage").unwrap();

    let err = merge_releases::execute(
        &ArchiveReader::new(),
        &ArchiveWriter::new(),
        &path_1,
        &dir.path().join("release-2.tgz"),
        &dir.path().join("merged.tgz"),
    )
    .expect_err("Read should have failed");

    assert!(err.to_string().contains("Reading release"));
}

#[test]
fn test_inspect_reads_a_real_archive() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("release.tgz");

    write_release_archive(
        &path,
        &FixtureRelease {
            name: "rel",
            version: "v1",
            jobs: vec![("job-1", "fp-1")],
            compiled_packages: vec![("pkg-1", "fpp-1")],
        },
    );

    inspect_release::execute(&ArchiveReader::new(), &path).expect("Inspect failed");
}
