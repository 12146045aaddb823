//! Academic progress model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-user record of which syllabus topics are done
///
/// Maps subject id to topic name to completion. Topic names are matched
/// ignoring case; the first spelling written is the one stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicProgress {
    /// Owning user id
    pub owner: String,
    /// subject id -> topic name -> completed
    #[serde(default)]
    pub subjects: BTreeMap<String, BTreeMap<String, bool>>,
}

impl AcademicProgress {
    /// Empty progress for a user
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            subjects: BTreeMap::new(),
        }
    }

    /// Set a topic's completion. Returns `true` if the stored value changed.
    pub fn set(&mut self, subject_id: &str, topic: &str, done: bool) -> bool {
        let topics = self.subjects.entry(subject_id.to_string()).or_default();
        let folded = topic.to_lowercase();
        let existing = topics
            .iter_mut()
            .find(|(name, _)| name.to_lowercase() == folded);
        match existing {
            Some((_, value)) if *value == done => false,
            Some((_, value)) => {
                *value = done;
                true
            }
            None => {
                topics.insert(topic.to_string(), done);
                true
            }
        }
    }

    /// Whether a topic is marked done
    #[must_use]
    pub fn is_done(&self, subject_id: &str, topic: &str) -> bool {
        let folded = topic.to_lowercase();
        self.subjects.get(subject_id).is_some_and(|topics| {
            topics
                .iter()
                .any(|(name, done)| *done && name.to_lowercase() == folded)
        })
    }
}
