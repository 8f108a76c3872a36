//! Shared test infrastructure for snag integration tests.
//!
//! Provides TestEnv helper for consistent service setup.

#![allow(dead_code)]

use snag::{Bug, BugInput, BugService, BugStore, ListParams, Listing, ServiceError};

/// Test environment around a bug service.
pub struct TestEnv {
    pub service: BugService,
}

impl TestEnv {
    /// Create a test environment with an empty store; ids start at 1.
    pub fn new() -> Self {
        Self {
            service: BugService::new(BugStore::new()),
        }
    }

    /// Create a test environment pre-loaded with the sample dataset
    /// (ids 1 through 5).
    pub fn seeded() -> Self {
        Self {
            service: BugService::new(BugStore::seeded()),
        }
    }

    /// Create a bug with default severity and status.
    pub fn create_bug(&mut self, title: &str) -> Bug {
        self.service
            .create(&BugInput {
                title: Some(title.to_string()),
                description: Some("test description".to_string()),
                ..BugInput::default()
            })
            .expect("Failed to create bug")
    }

    /// Create a bug with explicit severity and status.
    pub fn create_bug_with(&mut self, title: &str, severity: &str, status: &str) -> Bug {
        self.service
            .create(&BugInput {
                title: Some(title.to_string()),
                description: Some("test description".to_string()),
                severity: Some(severity.to_string()),
                status: Some(status.to_string()),
                ..BugInput::default()
            })
            .expect("Failed to create bug")
    }

    /// Create a bug assigned to someone.
    pub fn create_assigned(&mut self, title: &str, assignee: &str) -> Bug {
        self.service
            .create(&BugInput {
                title: Some(title.to_string()),
                description: Some("test description".to_string()),
                assignee: Some(assignee.to_string()),
                ..BugInput::default()
            })
            .expect("Failed to create bug")
    }

    /// List without filters.
    pub fn list_all(&self) -> Listing {
        self.service
            .list(&ListParams::default())
            .expect("Failed to list bugs")
    }

    /// List with the given raw filter values.
    pub fn list_filtered(&self, severity: Option<&str>, status: Option<&str>) -> Listing {
        self.list_result(severity, status).expect("Failed to list bugs")
    }

    /// Like [`list_filtered`](Self::list_filtered) but keeps the error.
    pub fn list_result(
        &self,
        severity: Option<&str>,
        status: Option<&str>,
    ) -> Result<Listing, ServiceError> {
        self.service.list(&ListParams {
            severity: severity.map(String::from),
            status: status.map(String::from),
        })
    }

    /// Count of bugs matching the given filters.
    pub fn count_filtered(&self, severity: Option<&str>, status: Option<&str>) -> usize {
        self.list_filtered(severity, status).count
    }

    /// Total stored bugs.
    pub fn total_count(&self) -> usize {
        self.list_all().count
    }

    /// Fetch a bug, panicking if absent.
    pub fn get_bug(&self, id: u64) -> Bug {
        self.service
            .get(&id.to_string())
            .expect("Failed to get bug")
    }

    /// Update a bug's status field only.
    pub fn patch_status(&mut self, id: u64, status: &str) -> Bug {
        self.service
            .update(
                &id.to_string(),
                &BugInput {
                    status: Some(status.to_string()),
                    ..BugInput::default()
                },
            )
            .expect("Failed to update bug")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
