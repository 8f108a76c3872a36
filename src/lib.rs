//! snag: a minimal bug tracker library.
//!
//! Bugs live in an in-memory store behind a validating service. The service
//! is exposed over a small REST API and consumed by a blocking client plus
//! a detail view that applies status changes optimistically.
//!
//! # Example
//!
//! ```
//! use snag::{BugInput, BugService, BugStore, Status};
//!
//! let mut service = BugService::new(BugStore::new());
//!
//! let input = BugInput {
//!     title: Some("Login button unresponsive".to_string()),
//!     description: Some("Clicking login does nothing".to_string()),
//!     ..BugInput::default()
//! };
//! let bug = service.create(&input).unwrap();
//! assert_eq!(bug.id, 1);
//!
//! let patch = BugInput {
//!     status: Some("resolved".to_string()),
//!     ..BugInput::default()
//! };
//! let updated = service.update("1", &patch).unwrap();
//! assert_eq!(updated.status, Status::Resolved);
//! ```

mod store;
mod types;

pub mod client;
pub mod protocol;
pub mod server;
pub mod service;
pub mod view;

// Re-export public API
pub use client::ApiClient;
pub use protocol::{
    ApiError, ApiSuccess, AppliedFilters, BugInput, Envelope, ErrorBody, HealthStatus, ListParams,
    Listing, UnhandledError,
};
pub use server::{AppState, ServerConfig, app};
pub use service::{BugService, ServiceError};
pub use store::BugStore;
pub use types::{Bug, DESCRIPTION_MAX, Severity, Status, TITLE_MAX, ValidationError};
pub use view::DetailView;
