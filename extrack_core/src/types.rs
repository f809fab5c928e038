//! Core domain types for the exercise tracker.
//!
//! - User identity and records
//! - Exercise log entries
//! - Output views echoed back to callers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identity
// ============================================================================

/// Opaque unique user identifier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Allocate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = crate::Error;

    /// A malformed id can never resolve to a record, so it reports as not found.
    fn from_str(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| crate::Error::id_not_found())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One exercise entry in a user's log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub description: String,
    pub duration: u32,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// A user not yet persisted; the store assigns the id on insert
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
}

/// A stored user record
///
/// `count` is private and only changes together with `log`, through
/// [`User::push_entry`]. Records read back from storage have `count`
/// recomputed from the log.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "StoredUser")]
pub struct User {
    #[serde(rename = "_id")]
    id: UserId,
    username: String,
    count: usize,
    log: Vec<Entry>,
}

impl User {
    /// Build an empty user with a known id
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            count: 0,
            log: Vec::new(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Number of entries ever appended
    pub fn count(&self) -> usize {
        self.count
    }

    /// Entries in append order
    pub fn log(&self) -> &[Entry] {
        &self.log
    }

    /// Append an entry and refresh the derived count in one step
    pub fn push_entry(&mut self, entry: Entry) -> &Entry {
        self.log.push(entry);
        self.count = self.log.len();
        &self.log[self.count - 1]
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// On-disk shape of a user, accepted as-is and repaired into a [`User`]
#[derive(Deserialize)]
struct StoredUser {
    #[serde(rename = "_id")]
    id: UserId,
    username: String,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    log: Vec<Entry>,
}

impl From<StoredUser> for User {
    fn from(stored: StoredUser) -> Self {
        let count = stored.log.len();
        if let Some(recorded) = stored.count {
            if recorded != count {
                tracing::warn!(
                    "User {} recorded count {} but has {} entries; using {}",
                    stored.id,
                    recorded,
                    count,
                    count
                );
            }
        }
        User {
            id: stored.id,
            username: stored.username,
            count,
            log: stored.log,
        }
    }
}

// ============================================================================
// Views
// ============================================================================

/// Id and name only, as returned by user listing and creation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
}

/// Echo of a freshly appended entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseReceipt {
    pub username: String,
    pub description: String,
    pub duration: u32,
    /// Long display form, e.g. `Sat Sep 09 2023`
    pub date: String,
    #[serde(rename = "_id")]
    pub id: UserId,
}

/// One entry of a log view with its display-form date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntryView {
    pub description: String,
    pub duration: u32,
    pub date: String,
}

/// Filtered and limited view of a user's log
///
/// `count` is the stored entry count, not `log.len()`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogView {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntryView>,
}
