//! User profile model

use serde::{Deserialize, Serialize};

/// Account role; only admins may edit syllabus documents or moderate reviews
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user
    #[default]
    Student,
    /// Content maintainer
    Admin,
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: '{other}'")),
        }
    }
}

/// Theme and background-music choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Theme name (e.g., "dark", "light")
    pub theme: String,
    /// Whether the focus music player starts enabled
    pub music_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            music_enabled: false,
        }
    }
}

/// A user's profile document, created on first sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity provider user id
    pub uid: String,
    /// Name shown in the app
    #[serde(default)]
    pub display_name: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// University name
    #[serde(default)]
    pub university: String,
    /// Branch / major
    #[serde(default)]
    pub branch: String,
    /// Current semester (1-based)
    #[serde(default)]
    pub semester: u8,
    /// Role flag
    #[serde(default)]
    pub role: Role,
    /// UI preferences
    #[serde(default)]
    pub preferences: Preferences,
}

impl UserProfile {
    /// Create a profile with just an id and role
    #[must_use]
    pub fn new(uid: impl Into<String>, role: Role) -> Self {
        Self {
            uid: uid.into(),
            display_name: String::new(),
            email: String::new(),
            university: String::new(),
            branch: String::new(),
            semester: 0,
            role,
            preferences: Preferences::default(),
        }
    }

    /// Whether this user may modify syllabus documents and approve testimonials
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the academic fields needed to pick a syllabus are filled in
    #[must_use]
    pub fn has_academic_details(&self) -> bool {
        !self.university.trim().is_empty() && !self.branch.trim().is_empty() && self.semester > 0
    }
}
