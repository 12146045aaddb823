//! Core library for `StudyHub`
//!
//! Syllabus parsing and merging, tasks and academic progress, report
//! rendering, a local JSON document store, and the headless collision
//! simulation behind the animated background.

pub mod config;
pub mod core;
pub mod logger;

pub use crate::core::get_version;
