//! Syllabus text parsing and merging
//!
//! Admins paste loosely formatted syllabus text; [`parse_raw_syllabus`] turns it
//! into subjects and [`merge_subjects`] carries previously attached resource
//! links over to the freshly parsed list.

pub mod merge;
pub mod parser;

pub use merge::{merge_subjects, MergeOutcome};
pub use parser::{parse_raw_syllabus, parse_topics, DEFAULT_SECTION};
