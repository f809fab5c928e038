//! User registration and listing, returning id and name only.

use crate::service::ExerciseLog;
use crate::store::{UserFilter, UserStore};
use crate::{Result, UserSummary};

/// Thin view over an [`ExerciseLog`] for user management
#[derive(Debug)]
pub struct UserDirectory<'a, S> {
    log: &'a mut ExerciseLog<S>,
}

impl<'a, S: UserStore> UserDirectory<'a, S> {
    pub fn new(log: &'a mut ExerciseLog<S>) -> Self {
        Self { log }
    }

    pub fn register(&mut self, username: &str) -> Result<UserSummary> {
        self.log.create_user(username).map(|u| u.summary())
    }

    pub fn list(&self) -> Result<Vec<UserSummary>> {
        self.list_matching(&UserFilter::all())
    }

    pub fn list_matching(&self, filter: &UserFilter) -> Result<Vec<UserSummary>> {
        Ok(self
            .log
            .find_users(filter)?
            .iter()
            .map(|u| u.summary())
            .collect())
    }
}
