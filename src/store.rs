//! In-memory bug storage.
//!
//! The store is pure storage: an insertion-ordered sequence of records plus
//! the next-id counter. No validation happens here; the service layer owns
//! the rules and is the only writer.

use crate::types::{Bug, Severity, Status};
use chrono::{DateTime, Utc};

/// Owns the canonical bug collection and the id counter.
#[derive(Debug)]
pub struct BugStore {
    bugs: Vec<Bug>,
    next_id: u64,
}

impl BugStore {
    /// Create an empty store with the counter at 1.
    pub fn new() -> Self {
        Self {
            bugs: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store pre-loaded with the sample dataset (ids 1-5).
    pub fn seeded() -> Self {
        let bugs = vec![
            seed_bug(
                1,
                "Login form validation fails on empty password",
                "When users submit the login form with an empty password field, the validation \
                 doesn't trigger and the form submits with a blank password.",
                Severity::High,
                Status::Open,
                "john.doe@company.com",
                "2024-01-15T10:30:00Z",
            ),
            seed_bug(
                2,
                "Mobile navigation menu doesn't close on item selection",
                "On mobile devices, when a user selects a navigation menu item, the menu remains \
                 open instead of closing automatically.",
                Severity::Medium,
                Status::InProgress,
                "jane.smith@company.com",
                "2024-01-14T14:20:00Z",
            ),
            seed_bug(
                3,
                "Dashboard charts not loading in Safari",
                "The analytics charts on the dashboard page fail to render in Safari browser \
                 versions 14 and below.",
                Severity::Medium,
                Status::Resolved,
                "mike.wilson@company.com",
                "2024-01-12T09:15:00Z",
            ),
            seed_bug(
                4,
                "Email notifications contain broken image links",
                "All email notifications sent to users contain broken image links for the \
                 company logo and icons.",
                Severity::Low,
                Status::Open,
                "",
                "2024-01-10T16:45:00Z",
            ),
            seed_bug(
                5,
                "Database connection timeout during peak hours",
                "The application experiences database connection timeouts during peak usage \
                 hours (2-4 PM EST), causing 500 errors for users.",
                Severity::High,
                Status::InProgress,
                "alex.rodriguez@company.com",
                "2024-01-08T11:00:00Z",
            ),
        ];

        Self { bugs, next_id: 6 }
    }

    /// Return the current counter value, then increment it.
    ///
    /// Ids handed out are strictly increasing and never reused within a
    /// process lifetime.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a record to the end of the sequence and return it.
    pub fn append(&mut self, bug: Bug) -> &Bug {
        self.bugs.push(bug);
        // Just pushed, so the sequence is non-empty.
        &self.bugs[self.bugs.len() - 1]
    }

    /// Look up a record by id.
    pub fn find_by_id(&self, id: u64) -> Option<&Bug> {
        self.bugs.iter().find(|bug| bug.id == id)
    }

    /// Overwrite the record with the matching id.
    ///
    /// Returns `None` when no record has that id; the store is unchanged.
    pub fn replace(&mut self, id: u64, record: Bug) -> Option<&Bug> {
        let index = self.bugs.iter().position(|bug| bug.id == id)?;
        self.bugs[index] = record;
        Some(&self.bugs[index])
    }

    /// A detached copy of the full sequence, in insertion order.
    ///
    /// Callers never observe later store mutation through the copy.
    pub fn snapshot(&self) -> Vec<Bug> {
        self.bugs.clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.bugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }
}

impl Default for BugStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_bug(
    id: u64,
    title: &str,
    description: &str,
    severity: Severity,
    status: Status,
    assignee: &str,
    created_at: &str,
) -> Bug {
    Bug {
        id,
        title: title.to_string(),
        description: description.to_string(),
        severity,
        status,
        assignee: assignee.to_string(),
        created_at: seed_time(created_at),
    }
}

// Seed timestamps are fixed literals; fall back to now rather than panic.
fn seed_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u64, title: &str) -> Bug {
        Bug {
            id,
            title: title.to_string(),
            description: "A description".to_string(),
            severity: Severity::Medium,
            status: Status::Open,
            assignee: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_next_id_increments() {
        let mut store = BugStore::new();
        assert_eq!(store.next_id(), 1);
        assert_eq!(store.next_id(), 2);
        assert_eq!(store.next_id(), 3);
    }

    #[test]
    fn test_append_and_find() {
        let mut store = BugStore::new();
        let id = store.next_id();
        store.append(sample(id, "First"));

        let found = store.find_by_id(id).unwrap();
        assert_eq!(found.title, "First");
        assert!(store.find_by_id(99).is_none());
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut store = BugStore::new();
        for title in ["a", "b", "c"] {
            let id = store.next_id();
            store.append(sample(id, title));
        }

        let titles: Vec<String> = store.snapshot().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_replace_existing() {
        let mut store = BugStore::new();
        let id = store.next_id();
        store.append(sample(id, "Before"));

        let replaced = store.replace(id, sample(id, "After")).unwrap();
        assert_eq!(replaced.title, "After");
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id(id).unwrap().title, "After");
    }

    #[test]
    fn test_replace_missing_returns_none() {
        let mut store = BugStore::new();
        assert!(store.replace(42, sample(42, "Ghost")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = BugStore::new();
        let id = store.next_id();
        store.append(sample(id, "Original"));

        let snapshot = store.snapshot();
        store.replace(id, sample(id, "Changed"));

        assert_eq!(snapshot[0].title, "Original");
    }

    #[test]
    fn test_seeded_dataset() {
        let mut store = BugStore::seeded();
        assert_eq!(store.len(), 5);

        let ids: Vec<u64> = store.snapshot().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        // Counter continues after the seed records.
        assert_eq!(store.next_id(), 6);

        let high: Vec<&Bug> = store
            .bugs
            .iter()
            .filter(|b| b.severity == Severity::High)
            .collect();
        assert_eq!(high.len(), 2);

        // Bug 4 is unassigned.
        assert_eq!(store.find_by_id(4).unwrap().assignee, "");
    }

    #[test]
    fn test_seed_timestamps_parse() {
        let store = BugStore::seeded();
        let first = store.find_by_id(1).unwrap();
        assert_eq!(first.created_at.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }
}
