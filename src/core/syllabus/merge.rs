//! Reconcile a re-parsed subject list with the stored one
//!
//! Subjects and topics are matched by case-insensitive name. A matched subject
//! keeps its stored id and a matched topic keeps its resource links; names,
//! sections, and ordering come from the freshly parsed list.
//!
//! Names that collide after case-folding are paired in order of appearance:
//! the n-th parsed "Math" takes over the n-th stored "MATH". Anything left
//! unpaired on the stored side is dropped and reported.

use crate::core::models::{Subject, Topic};
use crate::{info, warn};
use std::collections::{HashMap, VecDeque};

/// Result of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged subject list, in parsed order
    pub subjects: Vec<Subject>,
    /// Parsed subjects that matched a stored subject
    pub matched_subjects: usize,
    /// Topics that inherited resources from a stored topic
    pub matched_topics: usize,
    /// Stored subjects with no parsed counterpart
    pub dropped_subjects: Vec<String>,
    /// Stored topics with no parsed counterpart, as `(subject, topic)`
    pub dropped_topics: Vec<(String, String)>,
}

impl MergeOutcome {
    /// Whether any stored subject or topic was discarded
    #[must_use]
    pub fn dropped_anything(&self) -> bool {
        !self.dropped_subjects.is_empty() || !self.dropped_topics.is_empty()
    }
}

/// Merge freshly parsed subjects with previously stored ones
///
/// # Arguments
/// * `parsed` - Subjects from [`parse_raw_syllabus`](super::parse_raw_syllabus)
/// * `existing` - Subjects currently stored for the same syllabus
#[must_use]
pub fn merge_subjects(parsed: Vec<Subject>, existing: &[Subject]) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    let mut queues = name_queues(existing.iter().map(|s| s.name.as_str()), "subject");
    let mut used = vec![false; existing.len()];

    for mut subject in parsed {
        let Some(idx) = take_match(&mut queues, &subject.name) else {
            outcome.subjects.push(subject);
            continue;
        };
        used[idx] = true;
        outcome.matched_subjects += 1;

        let old = &existing[idx];
        subject.id.clone_from(&old.id);
        let (topics, matched, dropped) = merge_topics(subject.topics, &old.topics);
        subject.topics = topics;
        outcome.matched_topics += matched;
        outcome.dropped_topics.extend(
            dropped
                .into_iter()
                .map(|topic| (subject.name.clone(), topic)),
        );
        outcome.subjects.push(subject);
    }

    outcome.dropped_subjects = existing
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(s, _)| s.name.clone())
        .collect();

    if outcome.dropped_anything() {
        info!(
            "Syllabus merge dropped {} subject(s) and {} topic(s)",
            outcome.dropped_subjects.len(),
            outcome.dropped_topics.len()
        );
    }

    outcome
}

/// Returns the merged topics, the number matched, and the stored topic names dropped
fn merge_topics(parsed: Vec<Topic>, existing: &[Topic]) -> (Vec<Topic>, usize, Vec<String>) {
    let mut queues = name_queues(existing.iter().map(|t| t.name.as_str()), "topic");
    let mut used = vec![false; existing.len()];
    let mut matched = 0;

    let topics = parsed
        .into_iter()
        .map(|mut topic| {
            if let Some(idx) = take_match(&mut queues, &topic.name) {
                used[idx] = true;
                matched += 1;
                topic.resources.clone_from(&existing[idx].resources);
            }
            topic
        })
        .collect();

    let dropped = existing
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(t, _)| t.name.clone())
        .collect();

    (topics, matched, dropped)
}

/// Index stored names by their case-folded form, keeping appearance order
fn name_queues<'a>(
    names: impl Iterator<Item = &'a str>,
    what: &str,
) -> HashMap<String, VecDeque<usize>> {
    let mut queues: HashMap<String, VecDeque<usize>> = HashMap::new();
    for (idx, name) in names.enumerate() {
        let queue = queues.entry(fold(name)).or_default();
        if !queue.is_empty() {
            warn!("Duplicate {what} name '{name}' after case-folding; pairing in order");
        }
        queue.push_back(idx);
    }
    queues
}

fn take_match(queues: &mut HashMap<String, VecDeque<usize>>, name: &str) -> Option<usize> {
    queues.get_mut(&fold(name)).and_then(VecDeque::pop_front)
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ResourceKind, TopicResource};

    fn topic_with_link(name: &str, url: &str) -> Topic {
        let mut topic = Topic::new(name);
        topic
            .resources
            .push(TopicResource::new(name, url, ResourceKind::Video));
        topic
    }

    #[test]
    fn test_matched_topic_inherits_resources_ignoring_case() {
        let stored = vec![Subject::new(
            "MATH",
            "Core",
            vec![topic_with_link("CALCULUS", "https://v/calc")],
        )];
        let parsed = vec![Subject::new(
            "Math",
            "Core",
            vec![Topic::new("Calculus"), Topic::new("Algebra")],
        )];

        let outcome = merge_subjects(parsed, &stored);
        let math = &outcome.subjects[0];
        assert_eq!(math.id, stored[0].id);
        assert_eq!(math.name, "Math");
        assert_eq!(math.topics[0].name, "Calculus");
        assert_eq!(math.topics[0].resources[0].url, "https://v/calc");
        assert!(math.topics[1].resources.is_empty());
        assert_eq!(outcome.matched_subjects, 1);
        assert_eq!(outcome.matched_topics, 1);
        assert!(!outcome.dropped_anything());
    }

    #[test]
    fn test_unmatched_stored_entries_are_dropped_and_reported() {
        let stored = vec![
            Subject::new("Physics", "Core", vec![topic_with_link("Optics", "u1")]),
            Subject::new(
                "Math",
                "Core",
                vec![topic_with_link("Calculus", "u2"), topic_with_link("Geometry", "u3")],
            ),
        ];
        let parsed = vec![Subject::new("Math", "Core", vec![Topic::new("Calculus")])];

        let outcome = merge_subjects(parsed, &stored);
        assert_eq!(outcome.subjects.len(), 1);
        assert_eq!(outcome.dropped_subjects, vec!["Physics".to_string()]);
        assert_eq!(
            outcome.dropped_topics,
            vec![("Math".to_string(), "Geometry".to_string())]
        );
    }

    #[test]
    fn test_new_subject_keeps_generated_id() {
        let parsed = vec![Subject::new("Biology", "Core", vec![Topic::new("Cells")])];
        let id = parsed[0].id.clone();
        let outcome = merge_subjects(parsed, &[]);
        assert_eq!(outcome.subjects[0].id, id);
        assert_eq!(outcome.matched_subjects, 0);
    }

    #[test]
    fn test_duplicate_names_pair_in_order() {
        let stored = vec![
            Subject::new("Lab", "A", vec![topic_with_link("Setup", "first")]),
            Subject::new("LAB", "B", vec![topic_with_link("Setup", "second")]),
        ];
        let parsed = vec![
            Subject::new("lab", "A", vec![Topic::new("setup")]),
            Subject::new("Lab", "B", vec![Topic::new("SETUP")]),
        ];

        let outcome = merge_subjects(parsed, &stored);
        assert_eq!(outcome.subjects[0].id, stored[0].id);
        assert_eq!(outcome.subjects[1].id, stored[1].id);
        assert_eq!(outcome.subjects[0].topics[0].resources[0].url, "first");
        assert_eq!(outcome.subjects[1].topics[0].resources[0].url, "second");
    }

    #[test]
    fn test_section_comes_from_parsed_data() {
        let stored = vec![Subject::new("Art", "Old", vec![Topic::new("Color")])];
        let parsed = vec![Subject::new("Art", "New", vec![Topic::new("Color")])];
        let outcome = merge_subjects(parsed, &stored);
        assert_eq!(outcome.subjects[0].section, "New");
    }
}
