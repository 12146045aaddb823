//! Testimonial (review) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-submitted review; hidden until a moderator approves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    /// Generated id
    pub id: String,
    /// Author display name or uid
    pub author: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    /// Review text
    pub message: String,
    /// Moderator approval flag
    #[serde(default)]
    pub approved: bool,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl Testimonial {
    /// Create an unapproved testimonial
    ///
    /// # Errors
    /// Returns an error if the rating is outside 1-5 or the message is blank
    pub fn new(
        author: impl Into<String>,
        rating: u8,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, String> {
        if !(1..=5).contains(&rating) {
            return Err(format!("Rating must be between 1 and 5, got {rating}"));
        }
        let message = message.into();
        if message.trim().is_empty() {
            return Err("Review message cannot be empty".to_string());
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            rating,
            message,
            approved: false,
            created_at,
        })
    }

    /// Mark as approved for public display
    pub fn approve(&mut self) {
        self.approved = true;
    }
}

/// Approved testimonials, newest first
#[must_use]
pub fn public_testimonials(all: &[Testimonial]) -> Vec<&Testimonial> {
    let mut public: Vec<&Testimonial> = all.iter().filter(|t| t.approved).collect();
    public.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    public
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Testimonial::new("a", 0, "meh", at(1)).is_err());
        assert!(Testimonial::new("a", 6, "wow", at(1)).is_err());
        assert!(Testimonial::new("a", 5, "  ", at(1)).is_err());
        assert!(Testimonial::new("a", 5, "Great", at(1)).is_ok());
    }

    #[test]
    fn test_only_approved_are_public_newest_first() {
        let mut old = Testimonial::new("a", 4, "old", at(1)).unwrap();
        let mut new = Testimonial::new("b", 5, "new", at(3)).unwrap();
        let pending = Testimonial::new("c", 3, "pending", at(2)).unwrap();
        old.approve();
        new.approve();

        let all = vec![old, pending, new];
        let public = public_testimonials(&all);
        assert_eq!(public.len(), 2);
        assert_eq!(public[0].message, "new");
        assert_eq!(public[1].message, "old");
    }
}
