pub mod inspect_release;
pub mod merge_releases;
