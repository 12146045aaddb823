//! Parser for admin-pasted syllabus text
//!
//! Input is line oriented:
//!
//! ```text
//! Section: Core
//! Mathematics: Calculus, Linear Algebra, Probability.
//! Physics: Mechanics, Optics
//! SECTION B - Electives
//! Economics: Micro, Macro
//! ```
//!
//! Parsing is best effort. Lines that don't fit the `Subject: topic, topic`
//! shape are skipped, never reported as errors.

use crate::core::models::{Subject, Topic};
use crate::debug;

/// Section assigned to subjects listed before any section header
pub const DEFAULT_SECTION: &str = "General";

/// Split a comma-separated topic list
///
/// Entries are trimmed, trailing periods stripped, and empty entries dropped.
///
/// # Examples
/// ```
/// use studyhub::core::syllabus::parse_topics;
/// assert_eq!(parse_topics("a, b,, c."), vec!["a", "b", "c"]);
/// ```
#[must_use]
pub fn parse_topics(text: &str) -> Vec<String> {
    text.split(',')
        .map(|entry| entry.trim().trim_end_matches('.').trim_end())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse raw syllabus text into subjects
///
/// # Arguments
/// * `text` - Multi-line syllabus text
///
/// # Returns
/// Subjects in line order, each with a fresh id, its enclosing section, and
/// topics without resources
#[must_use]
pub fn parse_raw_syllabus(text: &str) -> Vec<Subject> {
    let mut section = DEFAULT_SECTION.to_string();
    let mut subjects = Vec::new();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if is_section_header(line) {
            section = section_name(line);
            debug!("line {}: section '{section}'", line_no + 1);
            continue;
        }

        match parse_subject_line(line) {
            Some((name, topics)) => {
                let topics = topics.into_iter().map(Topic::new).collect();
                subjects.push(Subject::new(name, section.clone(), topics));
            }
            None => debug!("line {}: skipped '{line}'", line_no + 1),
        }
    }

    subjects
}

/// A header line's first word starts with "section", in any case
fn is_section_header(line: &str) -> bool {
    line.get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("section"))
}

/// Section name: text after the first colon, or the whole line when there is
/// no colon or nothing follows it
fn section_name(line: &str) -> String {
    line.split_once(':')
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(line)
        .to_string()
}

/// Split `Subject: topic, topic` at the first colon
fn parse_subject_line(line: &str) -> Option<(String, Vec<String>)> {
    let (name, rest) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let topics = parse_topics(rest);
    if topics.is_empty() {
        return None;
    }
    Some((name.to_string(), topics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topics_drops_empty_and_trailing_periods() {
        assert_eq!(parse_topics("a, b,, c."), vec!["a", "b", "c"]);
        assert_eq!(parse_topics("Limits..., Series ."), vec!["Limits", "Series"]);
        assert!(parse_topics(" , . ,").is_empty());
    }

    #[test]
    fn test_parse_topics_keeps_inner_periods() {
        assert_eq!(parse_topics("Node.js basics, v1.2 notes."), vec!["Node.js basics", "v1.2 notes"]);
    }

    #[test]
    fn test_single_section_single_subject() {
        let subjects = parse_raw_syllabus("Section: Core\nMath: Calculus, Algebra");
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "Math");
        assert_eq!(subjects[0].section, "Core");
        let names: Vec<&str> = subjects[0].topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Calculus", "Algebra"]);
        assert!(subjects[0].topics.iter().all(|t| t.resources.is_empty()));
    }

    #[test]
    fn test_default_section_before_header() {
        let subjects = parse_raw_syllabus("Chemistry: Bonds\nSECTION: Labs\nPhysics: Optics");
        assert_eq!(subjects[0].section, DEFAULT_SECTION);
        assert_eq!(subjects[1].section, "Labs");
    }

    #[test]
    fn test_header_without_colon_uses_whole_line() {
        let subjects = parse_raw_syllabus("Section B - Electives\nEconomics: Micro, Macro");
        assert_eq!(subjects[0].section, "Section B - Electives");

        let subjects = parse_raw_syllabus("Section:\nArt: Color");
        assert_eq!(subjects[0].section, "Section:");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "no colon here\n: orphan topics\nEmpty: , ,\n\nValid: One";
        let subjects = parse_raw_syllabus(text);
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "Valid");
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let subjects = parse_raw_syllabus("Networks: TCP: handshake, UDP");
        assert_eq!(subjects[0].name, "Networks");
        assert_eq!(subjects[0].topics[0].name, "TCP: handshake");
    }

    #[test]
    fn test_sections_prefix_word_counts_as_header() {
        // "Sections" still starts with "section"
        let subjects = parse_raw_syllabus("Sections: Theory\nLogic: Sets");
        assert_eq!(subjects[0].section, "Theory");
    }

    #[test]
    fn test_non_ascii_line_start_does_not_panic() {
        let subjects = parse_raw_syllabus("Ünïcödé: Ämter\nséction");
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "Ünïcödé");
    }
}
