//! Integration tests for gantry release archive handling
//!
//! These tests build real `.tgz` release archives on disk and exercise the
//! archive reader, writer, and merge command end to end.

pub mod helpers;
pub mod merge_releases;
