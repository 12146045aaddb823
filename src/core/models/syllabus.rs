//! Syllabus document model

use super::slugify;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a syllabus document is addressed in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SyllabusKey {
    /// Competitive or entrance exam syllabus (e.g., "GATE CSE")
    Exam {
        /// Exam name
        name: String,
    },
    /// University course syllabus for one branch and semester
    University {
        /// University name
        university: String,
        /// Branch / major
        branch: String,
        /// Semester (1-based)
        semester: u8,
    },
}

impl SyllabusKey {
    /// Key for an exam syllabus
    #[must_use]
    pub fn exam(name: impl Into<String>) -> Self {
        Self::Exam { name: name.into() }
    }

    /// Key for a university syllabus
    #[must_use]
    pub fn university(university: impl Into<String>, branch: impl Into<String>, semester: u8) -> Self {
        Self::University {
            university: university.into(),
            branch: branch.into(),
            semester,
        }
    }

    /// Stable, lowercase document id used as the storage file name
    ///
    /// # Returns
    /// `exam_<slug>` for exams, `<university>_<branch>_sem<n>` for universities
    #[must_use]
    pub fn doc_id(&self) -> String {
        match self {
            Self::Exam { name } => format!("exam_{}", slugify(name)),
            Self::University {
                university,
                branch,
                semester,
            } => format!("{}_{}_sem{semester}", slugify(university), slugify(branch)),
        }
    }
}

impl fmt::Display for SyllabusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exam { name } => write!(f, "{name} (exam)"),
            Self::University {
                university,
                branch,
                semester,
            } => write!(f, "{university} / {branch} / semester {semester}"),
        }
    }
}

/// Kind of learning resource linked from a topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Video lecture or playlist
    Video,
    /// Notes, slides, or a PDF
    Document,
    /// Anything else
    #[default]
    Link,
}

/// External link attached to a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicResource {
    /// Link text
    pub title: String,
    /// Target URL
    pub url: String,
    /// Resource kind
    #[serde(default, rename = "type")]
    pub kind: ResourceKind,
}

impl TopicResource {
    /// Create a resource link
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            kind,
        }
    }
}

/// A single syllabus topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic name as shown to students
    pub name: String,
    /// Attached learning resources
    #[serde(default)]
    pub resources: Vec<TopicResource>,
}

impl Topic {
    /// Create a topic with no resources
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }
}

/// A subject and its ordered topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Generated identifier, stable across merges
    pub id: String,
    /// Subject name (e.g., "Mathematics")
    pub name: String,
    /// Section heading the subject was listed under
    pub section: String,
    /// Topics in syllabus order
    pub topics: Vec<Topic>,
}

impl Subject {
    /// Create a subject with a freshly generated id
    #[must_use]
    pub fn new(name: impl Into<String>, section: impl Into<String>, topics: Vec<Topic>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            section: section.into(),
            topics,
        }
    }

    /// Find a topic by name, ignoring case
    #[must_use]
    pub fn topic(&self, name: &str) -> Option<&Topic> {
        let folded = name.to_lowercase();
        self.topics.iter().find(|t| t.name.to_lowercase() == folded)
    }

    /// Total number of resource links across all topics
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.topics.iter().map(|t| t.resources.len()).sum()
    }
}

/// A syllabus document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllabus {
    /// Document key
    pub key: SyllabusKey,
    /// Subjects in syllabus order
    pub subjects: Vec<Subject>,
    /// Uid of the admin who last saved the document
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Syllabus {
    /// Create a syllabus document
    #[must_use]
    pub const fn new(key: SyllabusKey, subjects: Vec<Subject>) -> Self {
        Self {
            key,
            subjects,
            updated_by: None,
        }
    }

    /// Find a subject by id
    #[must_use]
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Find the first subject with a name, ignoring case
    #[must_use]
    pub fn subject_by_name(&self, name: &str) -> Option<&Subject> {
        let folded = name.to_lowercase();
        self.subjects.iter().find(|s| s.name.to_lowercase() == folded)
    }

    /// Section names in first-appearance order
    #[must_use]
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = Vec::new();
        for subject in &self.subjects {
            if !sections.contains(&subject.section.as_str()) {
                sections.push(&subject.section);
            }
        }
        sections
    }

    /// Total number of topics across all subjects
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.subjects.iter().map(|s| s.topics.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_university() {
        let key = SyllabusKey::university("Delhi Technological University", "CSE", 3);
        assert_eq!(key.doc_id(), "delhi-technological-university_cse_sem3");
    }

    #[test]
    fn test_doc_id_exam() {
        assert_eq!(SyllabusKey::exam("GATE CSE").doc_id(), "exam_gate-cse");
    }

    #[test]
    fn test_subject_ids_are_unique() {
        let a = Subject::new("Math", "Core", Vec::new());
        let b = Subject::new("Math", "Core", Vec::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_topic_lookup_ignores_case() {
        let subject = Subject::new("Math", "Core", vec![Topic::new("Calculus")]);
        assert!(subject.topic("CALCULUS").is_some());
        assert!(subject.topic("Algebra").is_none());
    }

    #[test]
    fn test_sections_keep_first_appearance_order() {
        let syllabus = Syllabus::new(
            SyllabusKey::exam("x"),
            vec![
                Subject::new("A", "Core", Vec::new()),
                Subject::new("B", "Electives", Vec::new()),
                Subject::new("C", "Core", Vec::new()),
            ],
        );
        assert_eq!(syllabus.sections(), vec!["Core", "Electives"]);
    }

    #[test]
    fn test_resource_kind_serialises_as_type() {
        let r = TopicResource::new("Lecture 1", "https://example.com/v", ResourceKind::Video);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"type\":\"video\""));
    }
}
