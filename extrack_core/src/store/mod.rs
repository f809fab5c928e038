//! Storage collaborators for user records.
//!
//! The log service only talks to a [`UserStore`]; callers construct the
//! store they want and hand it in.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::{NewUser, Result, User, UserId};

/// File name of the JSON store inside the data directory
pub const STORE_FILE_NAME: &str = "users.json";

/// Selection applied by [`UserStore::find_all`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Exact username match
    pub username: Option<String>,
}

impl UserFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn username(name: impl Into<String>) -> Self {
        Self {
            username: Some(name.into()),
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.username
            .as_deref()
            .map_or(true, |name| user.username() == name)
    }
}

/// Persistence for whole user records
pub trait UserStore {
    /// Store a new user, assigning its id
    fn insert(&mut self, user: NewUser) -> Result<User>;

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>>;

    /// Users matching `filter`, in insertion order
    fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>>;

    /// Replace the stored record with the same id
    fn save(&mut self, user: &User) -> Result<User>;
}
