//! Core domain logic shared by the library and the CLI

pub mod models;
pub mod physics;
pub mod progress;
pub mod report;
pub mod store;
pub mod syllabus;

/// Returns the current version of the `StudyHub` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
