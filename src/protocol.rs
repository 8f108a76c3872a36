//! Wire contract between the HTTP boundary and its clients.
//!
//! Every API response is wrapped in a uniform envelope: `{ success: true,
//! data, ... }` on success, `{ success: false, error: { message, details } }`
//! on failure. Unhandled internal errors use a bare `{ error: { message,
//! status } }` body instead.

use crate::types::{Bug, Severity, Status};
use serde::{Deserialize, Serialize};

/// Partial bug fields, as sent in create and update bodies.
///
/// Every field is optional; unknown body fields (including `id` and
/// `createdAt`) are ignored by deserialization and can never be merged
/// into a stored record. Enum fields stay raw strings here so that the
/// service owns membership validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BugInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl BugInput {
    /// A patch that changes only the status.
    pub fn status_change(status: Status) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }

    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.status.is_none()
            && self.assignee.is_none()
    }
}

/// Raw query parameters accepted by the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Filter values that were actually applied to a listing.
///
/// Both keys are always present on the wire; `null` marks an absent filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub severity: Option<Severity>,
    pub status: Option<Status>,
}

/// Result of the list operation: the filtered records, their count, and
/// the normalized filters that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub bugs: Vec<Bug>,
    pub count: usize,
    pub filters: AppliedFilters,
}

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<AppliedFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiSuccess<T> {
    /// Envelope around a single record, no extras.
    pub fn record(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            filters: None,
            message: None,
        }
    }

    /// Envelope around a record with a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::record(data)
        }
    }
}

impl ApiSuccess<Vec<Bug>> {
    /// Envelope around a listing, carrying count and applied filters.
    pub fn listing(listing: Listing) -> Self {
        Self {
            success: true,
            data: listing.bugs,
            count: Some(listing.count),
            filters: Some(listing.filters),
            message: None,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    // Internal-error bodies omit the flag; absent means failed.
    #[serde(default)]
    pub success: bool,
    pub error: ErrorBody,
}

impl ApiError {
    pub fn new(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                message: message.into(),
                details,
            },
        }
    }
}

/// The `error` object inside a failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Body shape outside the regular envelopes: `{ error: { message, status } }`.
///
/// Used for unhandled internal errors (500) and for requests that match no
/// route (404).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnhandledError {
    pub error: UnhandledErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnhandledErrorDetail {
    pub message: String,
    pub status: u16,
}

impl UnhandledError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            error: UnhandledErrorDetail {
                message: message.into(),
                status,
            },
        }
    }

    /// Internal failure the handlers could not recover from.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, 500)
    }

    /// Request matched no route.
    pub fn not_found() -> Self {
        Self::new("Not Found", 404)
    }
}

/// Health check response; not enveloped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

/// Either side of the envelope, as decoded by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success(ApiSuccess<T>),
    Failure(ApiError),
}
