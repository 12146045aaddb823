//! Task (to-do) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Link from a task back to a syllabus topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRef {
    /// Document id of the syllabus
    pub syllabus_id: String,
    /// Subject id within that syllabus
    pub subject_id: String,
    /// Topic name
    pub topic: String,
}

/// A user-owned to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Generated task id
    pub id: String,
    /// Owning user id
    pub owner: String,
    /// Task title
    pub title: String,
    /// Due timestamp
    pub due: DateTime<Utc>,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// When the task was last completed
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Optional syllabus topic this task studies
    #[serde(default)]
    pub topic: Option<TopicRef>,
}

impl Task {
    /// Create an open task with a fresh id
    #[must_use]
    pub fn new(owner: impl Into<String>, title: impl Into<String>, due: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.into(),
            title: title.into(),
            due,
            completed: false,
            completed_at: None,
            topic: None,
        }
    }

    /// Attach a syllabus topic
    #[must_use]
    pub fn with_topic(mut self, topic: TopicRef) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Open and past its due time
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due < now
    }
}
