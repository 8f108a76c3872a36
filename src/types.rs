//! Core data types for the snag bug tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 500;

/// A tracked defect record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    /// Unique identifier, assigned by the store, strictly increasing.
    pub id: u64,

    /// Short summary of the defect (1-100 characters).
    pub title: String,

    /// Full description (1-500 characters).
    pub description: String,

    /// Impact classification.
    pub severity: Severity,

    /// Workflow state.
    pub status: Status,

    /// Who the bug is assigned to; empty string means unassigned.
    pub assignee: String,

    /// When the bug was created; set once, never changed.
    pub created_at: DateTime<Utc>,
}

/// Defect impact classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// The accepted wire values, for error messages.
    pub const ALLOWED: &'static str = "low, medium, high";

    /// Parse a wire value; `None` if it is not a member.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defect workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
}

impl Status {
    /// The accepted wire values, for error messages.
    pub const ALLOWED: &'static str = "open, in-progress, resolved";

    /// Parse a wire value; `None` if it is not a member.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Status::Open),
            "in-progress" => Some(Status::InProgress),
            "resolved" => Some(Status::Resolved),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in-progress",
            Status::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation errors for bug input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyTitle,
    TitleTooLong,
    EmptyDescription,
    DescriptionTooLong,
    InvalidSeverity(String),
    InvalidStatus(String),
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyTitle | ValidationError::TitleTooLong => "title",
            ValidationError::EmptyDescription | ValidationError::DescriptionTooLong => "description",
            ValidationError::InvalidSeverity(_) => "severity",
            ValidationError::InvalidStatus(_) => "status",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title is required and cannot be empty"),
            ValidationError::TitleTooLong => write!(f, "title exceeds {} characters", TITLE_MAX),
            ValidationError::EmptyDescription => {
                write!(f, "description is required and cannot be empty")
            }
            ValidationError::DescriptionTooLong => {
                write!(f, "description exceeds {} characters", DESCRIPTION_MAX)
            }
            ValidationError::InvalidSeverity(value) => {
                write!(
                    f,
                    "invalid severity '{}': must be one of: {}",
                    value,
                    Severity::ALLOWED
                )
            }
            ValidationError::InvalidStatus(value) => {
                write!(f, "invalid status '{}': must be one of: {}", value, Status::ALLOWED)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a title against the 1-100 character bound.
///
/// Lengths count Unicode scalar values, not bytes.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Check a description against the 1-500 character bound.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

impl Bug {
    /// Validate the record's field bounds.
    ///
    /// Severity and status need no check here: the enums cannot hold a
    /// non-member value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bug(title: &str, description: &str) -> Bug {
        Bug {
            id: 1,
            title: title.to_string(),
            description: description.to_string(),
            severity: Severity::Medium,
            status: Status::Open,
            assignee: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_severity_parse_round_trip() {
        for value in ["low", "medium", "high"] {
            let severity = Severity::parse(value).unwrap();
            assert_eq!(severity.as_str(), value);
        }
        assert_eq!(Severity::parse("critical"), None);
        assert_eq!(Severity::parse(""), None);
        assert_eq!(Severity::parse("High"), None);
    }

    #[test]
    fn test_status_parse_round_trip() {
        for value in ["open", "in-progress", "resolved"] {
            let status = Status::parse(value).unwrap();
            assert_eq!(status.as_str(), value);
        }
        assert_eq!(Status::parse("closed"), None);
        assert_eq!(Status::parse("in_progress"), None);
    }

    #[test]
    fn test_status_wire_form_is_kebab_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let parsed: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, Status::InProgress);
    }

    #[test]
    fn test_severity_wire_form_is_lowercase() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");
        assert!(serde_json::from_str::<Severity>("\"High\"").is_err());
    }

    #[test]
    fn test_bug_serializes_camel_case() {
        let bug = make_bug("Broken login", "Password field accepts blanks");
        let value = serde_json::to_value(&bug).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
        assert_eq!(value["severity"], "medium");
        assert_eq!(value["status"], "open");
    }

    #[test]
    fn test_bug_serialization_round_trip() {
        let bug = make_bug("Broken login", "Password field accepts blanks");
        let json = serde_json::to_string(&bug).unwrap();
        let parsed: Bug = serde_json::from_str(&json).unwrap();
        assert_eq!(bug, parsed);
    }

    #[test]
    fn test_validate_title_bounds() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert!(validate_title("x").is_ok());
        assert!(validate_title(&"x".repeat(100)).is_ok());
        assert_eq!(validate_title(&"x".repeat(101)), Err(ValidationError::TitleTooLong));
    }

    #[test]
    fn test_validate_title_counts_characters_not_bytes() {
        // 100 two-byte characters: 200 bytes, but within the bound.
        let title = "é".repeat(100);
        assert!(validate_title(&title).is_ok());
        assert_eq!(validate_title(&"é".repeat(101)), Err(ValidationError::TitleTooLong));
    }

    #[test]
    fn test_validate_description_bounds() {
        assert_eq!(validate_description(""), Err(ValidationError::EmptyDescription));
        assert!(validate_description(&"d".repeat(500)).is_ok());
        assert_eq!(
            validate_description(&"d".repeat(501)),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn test_validation_error_names_field() {
        assert_eq!(ValidationError::EmptyTitle.field(), "title");
        assert_eq!(ValidationError::TitleTooLong.field(), "title");
        assert_eq!(ValidationError::EmptyDescription.field(), "description");
        assert_eq!(ValidationError::InvalidSeverity("x".into()).field(), "severity");
        assert_eq!(ValidationError::InvalidStatus("x".into()).field(), "status");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidSeverity("urgent".to_string());
        assert_eq!(
            err.to_string(),
            "invalid severity 'urgent': must be one of: low, medium, high"
        );

        let err = ValidationError::InvalidStatus("closed".to_string());
        assert_eq!(
            err.to_string(),
            "invalid status 'closed': must be one of: open, in-progress, resolved"
        );
    }

    #[test]
    fn test_bug_validate() {
        assert!(make_bug("Valid", "Also valid").validate().is_ok());
        assert_eq!(
            make_bug("", "desc").validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            make_bug("title", &"d".repeat(501)).validate(),
            Err(ValidationError::DescriptionTooLong)
        );
    }
}
