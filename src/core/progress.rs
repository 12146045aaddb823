//! Task completion and syllabus progress scoring
//!
//! Completing a task that links to a syllabus topic also marks that topic in
//! the user's [`AcademicProgress`]. The two documents are written together
//! through a [`WriteBatch`](crate::core::store::WriteBatch). Topics can also be
//! marked directly, so progress and tasks are allowed to disagree.

use crate::core::models::{AcademicProgress, Subject, Syllabus, Task};
use chrono::{DateTime, Utc};

/// Result of toggling a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskToggle {
    /// Completion state after the toggle
    pub completed: bool,
    /// Whether the progress document changed and needs writing
    pub progress_changed: bool,
}

/// Completion of one subject
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectCompletion {
    /// Subject id
    pub subject_id: String,
    /// Subject name
    pub name: String,
    /// Section the subject belongs to
    pub section: String,
    /// Topics marked done that still exist in the syllabus
    pub done: usize,
    /// Topics in the syllabus
    pub total: usize,
    /// `done / total` as a percentage; 0 for an empty subject
    pub percent: f64,
}

/// Completion of a whole syllabus
#[derive(Debug, Clone, PartialEq)]
pub struct SyllabusCompletion {
    /// Per-subject breakdown in syllabus order
    pub subjects: Vec<SubjectCompletion>,
    /// Topics done across all subjects
    pub done: usize,
    /// Topics across all subjects
    pub total: usize,
    /// Overall percentage, weighted by topic count
    pub percent: f64,
}

/// Flip a task's completion and mirror it into progress when linked to a topic
///
/// # Arguments
/// * `task` - Task to toggle
/// * `progress` - The owner's progress document
/// * `now` - Timestamp recorded as `completed_at` when completing
pub fn toggle_task(task: &mut Task, progress: &mut AcademicProgress, now: DateTime<Utc>) -> TaskToggle {
    task.completed = !task.completed;
    task.completed_at = task.completed.then_some(now);

    let progress_changed = task
        .topic
        .as_ref()
        .is_some_and(|link| progress.set(&link.subject_id, &link.topic, task.completed));

    TaskToggle {
        completed: task.completed,
        progress_changed,
    }
}

/// Mark a topic done or not done without going through a task
///
/// # Errors
/// Returns an error if the subject or topic is not part of the syllabus
pub fn mark_topic(
    syllabus: &Syllabus,
    progress: &mut AcademicProgress,
    subject_id: &str,
    topic: &str,
    done: bool,
) -> Result<bool, String> {
    let subject = syllabus
        .subject(subject_id)
        .ok_or_else(|| format!("Unknown subject id: '{subject_id}'"))?;
    let topic = subject
        .topic(topic)
        .ok_or_else(|| format!("Subject '{}' has no topic '{topic}'", subject.name))?;
    Ok(progress.set(&subject.id, &topic.name, done))
}

/// Completion of a single subject against its current topic list
///
/// Progress entries for topics no longer in the subject are ignored.
#[must_use]
pub fn subject_completion(subject: &Subject, progress: &AcademicProgress) -> SubjectCompletion {
    let total = subject.topics.len();
    let done = subject
        .topics
        .iter()
        .filter(|t| progress.is_done(&subject.id, &t.name))
        .count();
    SubjectCompletion {
        subject_id: subject.id.clone(),
        name: subject.name.clone(),
        section: subject.section.clone(),
        done,
        total,
        percent: percent(done, total),
    }
}

/// Completion of every subject plus the topic-weighted overall figure
#[must_use]
pub fn syllabus_completion(syllabus: &Syllabus, progress: &AcademicProgress) -> SyllabusCompletion {
    let subjects: Vec<SubjectCompletion> = syllabus
        .subjects
        .iter()
        .map(|s| subject_completion(s, progress))
        .collect();
    let done = subjects.iter().map(|s| s.done).sum();
    let total = subjects.iter().map(|s| s.total).sum();
    SyllabusCompletion {
        subjects,
        done,
        total,
        percent: percent(done, total),
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 * 100.0 / total as f64
    }
}
