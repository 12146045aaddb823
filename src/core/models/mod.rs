//! Document models for `StudyHub`

pub mod profile;
pub mod progress;
pub mod syllabus;
pub mod task;
pub mod testimonial;

pub use profile::{Preferences, Role, UserProfile};
pub use progress::AcademicProgress;
pub use syllabus::{ResourceKind, Subject, Syllabus, SyllabusKey, Topic, TopicResource};
pub use task::{Task, TopicRef};
pub use testimonial::{public_testimonials, Testimonial};

/// Lowercase a string into a filesystem- and key-safe slug
///
/// Alphanumeric runs are kept; everything else collapses into a single `-`.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
