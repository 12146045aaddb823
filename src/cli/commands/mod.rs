//! CLI command handlers for `StudyHub`.
//!
//! Each command lives in its own submodule. Handlers return `Err` with a
//! printable message; `main` reports it and sets the exit code.

pub mod config;
pub mod progress;
pub mod report;
pub mod review;
pub mod simulate;
pub mod syllabus;
pub mod todo;

use studyhub::config::Config;
use studyhub::core::models::{Role, Subject, Syllabus, UserProfile};
use studyhub::core::store::{check_document_id, LocalStore};
use studyhub::warn;

/// Open the document store at the configured data directory
pub fn open_store(config: &Config) -> LocalStore {
    LocalStore::new(&config.paths.data_dir)
}

/// The profile commands act as, built from `[user]` config
///
/// # Errors
/// Returns an error if the configured uid cannot name a document
pub fn acting_profile(config: &Config) -> Result<UserProfile, String> {
    check_document_id(&config.user.uid).map_err(|e| format!("Invalid user id: {e}"))?;
    let role = config.user.role.parse::<Role>().unwrap_or_else(|e| {
        warn!("{e}; acting as student");
        Role::Student
    });
    Ok(UserProfile::new(config.user.uid.clone(), role))
}

/// Find a subject by id or by case-insensitive name
pub fn resolve_subject<'a>(syllabus: &'a Syllabus, name_or_id: &str) -> Option<&'a Subject> {
    syllabus
        .subject(name_or_id)
        .or_else(|| syllabus.subject_by_name(name_or_id))
}

/// Locate an item whose id equals `id` or starts with it
///
/// # Errors
/// Returns an error if nothing matches or the prefix is ambiguous
pub fn find_by_id<T>(items: &[T], id: &str, id_of: impl Fn(&T) -> &str) -> Result<usize, String> {
    let id = id.trim();
    if id.is_empty() {
        return Err("An id is required".to_string());
    }
    if let Some(idx) = items.iter().position(|item| id_of(item) == id) {
        return Ok(idx);
    }
    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, item)| id_of(item).starts_with(id))
        .map(|(idx, _)| idx);
    match (matches.next(), matches.next()) {
        (Some(idx), None) => Ok(idx),
        (Some(_), Some(_)) => Err(format!("Id prefix '{id}' is ambiguous")),
        (None, _) => Err(format!("No entry with id '{id}'")),
    }
}

/// First eight characters of an id, for listings
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
