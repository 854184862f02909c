//! Form input validation
//!
//! Checks run locally before anything is sent. Every failing field is
//! reported, not only the first.

use crate::error::ValidationErrors;
use crate::models::{CommentInput, InvitationInput, ReplyInput};
use crate::query::SearchQuery;

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 1000;
pub const CONTENT_MAX: usize = 500;
pub const CAPACITY_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

/// Local checks on user input
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn check_length(errors: &mut ValidationErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("must be at most {} characters", max));
    }
}

fn check_content(content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if content.trim().is_empty() {
        errors.add("content", "is required");
    }
    check_length(&mut errors, "content", content, CONTENT_MAX);
    errors.into_result()
}

impl Validate for InvitationInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.add("title", "is required");
        }
        check_length(&mut errors, "title", &self.title, TITLE_MAX);
        check_length(&mut errors, "description", &self.description, DESCRIPTION_MAX);

        if !CAPACITY_RANGE.contains(&self.capacity) {
            errors.add(
                "capacity",
                format!(
                    "must be between {} and {}",
                    CAPACITY_RANGE.start(),
                    CAPACITY_RANGE.end()
                ),
            );
        }
        if self.end_time <= self.start_time {
            errors.add("end_time", "must be after the start time");
        }

        errors.into_result()
    }
}

impl Validate for CommentInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_content(&self.content)
    }
}

impl Validate for ReplyInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_content(&self.content)
    }
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let (Some(min), Some(max)) = (self.min_capacity, self.max_capacity) {
            if min > max {
                errors.add("min_capacity", "must not exceed the maximum capacity");
            }
        }
        if let (Some(after), Some(before)) = (self.start_after, self.start_before) {
            if after > before {
                errors.add("start_after", "must not be later than the start-before date");
            }
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_datetime;

    fn input() -> InvitationInput {
        InvitationInput {
            title: "Board games".to_string(),
            description: "Bring snacks".to_string(),
            start_time: parse_datetime("2026-11-01 18:00").unwrap(),
            end_time: parse_datetime("2026-11-01 21:00").unwrap(),
            capacity: 4,
            tags: vec!["games".to_string()],
        }
    }

    #[test]
    fn test_valid_invitation() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_invitation_reports_every_field() {
        let bad = InvitationInput {
            title: "  ".to_string(),
            description: "x".repeat(DESCRIPTION_MAX + 1),
            end_time: input().start_time,
            capacity: 0,
            ..input()
        };

        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.field("title"), ["is required"]);
        assert_eq!(errors.field("description").len(), 1);
        assert_eq!(errors.field("capacity").len(), 1);
        assert_eq!(errors.field("end_time").len(), 1);
        assert_eq!(errors.errors().len(), 4);
    }

    #[test]
    fn test_title_length_counts_chars() {
        let ok = InvitationInput {
            title: "é".repeat(TITLE_MAX),
            ..input()
        };
        assert!(ok.validate().is_ok());

        let long = InvitationInput {
            title: "é".repeat(TITLE_MAX + 1),
            ..input()
        };
        assert!(!long.validate().unwrap_err().field("title").is_empty());
    }

    #[test]
    fn test_capacity_bounds() {
        for (capacity, valid) in [(1, true), (1000, true), (1001, false)] {
            let candidate = InvitationInput { capacity, ..input() };
            assert_eq!(candidate.validate().is_ok(), valid, "capacity {}", capacity);
        }
    }

    #[test]
    fn test_blank_content_rejected() {
        let comment = CommentInput {
            content: " \n ".to_string(),
        };
        assert_eq!(comment.validate().unwrap_err().field("content"), ["is required"]);

        let reply = ReplyInput {
            content: "y".repeat(CONTENT_MAX + 1),
        };
        assert_eq!(reply.validate().unwrap_err().field("content").len(), 1);

        assert!(ReplyInput {
            content: "see you there".to_string()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_search_query_ranges() {
        let query = SearchQuery {
            min_capacity: Some(10),
            max_capacity: Some(2),
            start_after: parse_datetime("2026-12-01 00:00"),
            start_before: parse_datetime("2026-11-01 00:00"),
            ..SearchQuery::default()
        };
        let errors = query.validate().unwrap_err();
        assert_eq!(errors.field("min_capacity").len(), 1);
        assert_eq!(errors.field("start_after").len(), 1);

        let open_ended = SearchQuery {
            min_capacity: Some(10),
            ..SearchQuery::default()
        };
        assert!(open_ended.validate().is_ok());
    }
}
