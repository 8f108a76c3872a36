//! The bug service: validation, filtering, lookup, creation, partial update.
//!
//! The service is the only writer to the store. Every operation validates
//! its input completely before any mutation, so a failure never leaves the
//! store partially changed.

use crate::protocol::{AppliedFilters, BugInput, ListParams, Listing};
use crate::store::BugStore;
use crate::types::{
    Bug, Severity, Status, ValidationError, validate_description, validate_title,
};
use chrono::Utc;

/// Errors a service operation can fail with.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// A query filter value is not a member of its enum.
    InvalidParameter {
        parameter: &'static str,
        allowed: &'static str,
    },
    /// A path id is not a positive integer.
    InvalidId,
    /// A body field violates its rule; carries the offending field.
    Validation(ValidationError),
    /// No bug has the given id.
    NotFound(u64),
    /// Unexpected failure while processing.
    Internal(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::InvalidParameter { parameter, allowed } => {
                write!(f, "invalid {} parameter: must be one of: {}", parameter, allowed)
            }
            ServiceError::InvalidId => write!(f, "bug id must be a positive integer"),
            ServiceError::Validation(e) => write!(f, "{}", e),
            ServiceError::NotFound(id) => write!(f, "no bug found with ID {}", id),
            ServiceError::Internal(message) => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        ServiceError::Validation(e)
    }
}

/// Validation, filtering, and CRUD over a [`BugStore`].
pub struct BugService {
    store: BugStore,
}

impl BugService {
    /// Wrap a store; the service becomes its sole writer.
    pub fn new(store: BugStore) -> Self {
        Self { store }
    }

    /// List bugs, narrowed by the recognized filters.
    ///
    /// Filters are applied sequentially (severity, then status) as
    /// AND-composed equality predicates over a snapshot of the store; the
    /// order cannot change the result set. Empty filter values are treated
    /// as absent, like unfilled form fields. A present non-member value
    /// fails with [`ServiceError::InvalidParameter`].
    pub fn list(&self, params: &ListParams) -> Result<Listing, ServiceError> {
        let mut bugs = self.store.snapshot();

        let severity = match present(params.severity.as_deref()) {
            Some(raw) => Some(Severity::parse(raw).ok_or(ServiceError::InvalidParameter {
                parameter: "severity",
                allowed: Severity::ALLOWED,
            })?),
            None => None,
        };
        if let Some(severity) = severity {
            bugs.retain(|bug| bug.severity == severity);
        }

        let status = match present(params.status.as_deref()) {
            Some(raw) => Some(Status::parse(raw).ok_or(ServiceError::InvalidParameter {
                parameter: "status",
                allowed: Status::ALLOWED,
            })?),
            None => None,
        };
        if let Some(status) = status {
            bugs.retain(|bug| bug.status == status);
        }

        Ok(Listing {
            count: bugs.len(),
            bugs,
            filters: AppliedFilters { severity, status },
        })
    }

    /// Look up a single bug by its raw path id.
    pub fn get(&self, raw_id: &str) -> Result<Bug, ServiceError> {
        let id = parse_id(raw_id)?;
        self.store
            .find_by_id(id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    /// Create a bug from the given input.
    ///
    /// `title` and `description` are required; `severity` defaults to
    /// medium and `status` to open when omitted. The store assigns the id
    /// and the creation timestamp. Nothing is appended on failure.
    pub fn create(&mut self, input: &BugInput) -> Result<Bug, ServiceError> {
        let title = input.title.as_deref().unwrap_or("");
        validate_title(title)?;
        let description = input.description.as_deref().unwrap_or("");
        validate_description(description)?;
        let severity = parse_severity_field(input.severity.as_deref())?.unwrap_or(Severity::Medium);
        let status = parse_status_field(input.status.as_deref())?.unwrap_or(Status::Open);

        let bug = Bug {
            id: self.store.next_id(),
            title: title.to_string(),
            description: description.to_string(),
            severity,
            status,
            assignee: input.assignee.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };

        Ok(self.store.append(bug).clone())
    }

    /// Partially update the bug with the given raw path id.
    ///
    /// Each supplied field is validated (title, description, severity,
    /// status, in that order) before anything is written; the first
    /// failure aborts the whole update. `id` and `createdAt` can never
    /// change. An empty patch returns the record unchanged.
    pub fn update(&mut self, raw_id: &str, patch: &BugInput) -> Result<Bug, ServiceError> {
        let id = parse_id(raw_id)?;
        let existing = self
            .store
            .find_by_id(id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))?;

        if let Some(title) = patch.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(description) = patch.description.as_deref() {
            validate_description(description)?;
        }
        let severity = parse_severity_field(patch.severity.as_deref())?;
        let status = parse_status_field(patch.status.as_deref())?;

        let updated = Bug {
            id: existing.id,
            title: patch.title.clone().unwrap_or(existing.title),
            description: patch.description.clone().unwrap_or(existing.description),
            severity: severity.unwrap_or(existing.severity),
            status: status.unwrap_or(existing.status),
            assignee: patch.assignee.clone().unwrap_or(existing.assignee),
            created_at: existing.created_at,
        };

        self.store
            .replace(id, updated)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }
}

/// Treat empty strings as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn parse_id(raw: &str) -> Result<u64, ServiceError> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::InvalidId),
    }
}

fn parse_severity_field(raw: Option<&str>) -> Result<Option<Severity>, ServiceError> {
    match raw {
        None => Ok(None),
        Some(value) => Severity::parse(value)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidSeverity(value.to_string()).into()),
    }
}

fn parse_status_field(raw: Option<&str>) -> Result<Option<Status>, ServiceError> {
    match raw {
        None => Ok(None),
        Some(value) => Status::parse(value)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidStatus(value.to_string()).into()),
    }
}
