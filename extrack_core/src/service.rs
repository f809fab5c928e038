//! Exercise log operations over an injected [`UserStore`].
//!
//! Each operation is a short fetch → mutate → save sequence. Nothing here
//! coordinates concurrent callers: two appends racing on the same user can
//! lose one of the entries (last write wins).

use crate::query::{self, LogQuery};
use crate::store::{UserFilter, UserStore};
use crate::{dates, Entry, Error, ExerciseReceipt, LogView, NewUser, Result, User, UserId};

/// Input for [`ExerciseLog::append_entry`], as received from a caller
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewExercise {
    pub description: String,
    /// Raw duration text; must be a non-negative whole number
    pub duration: String,
    /// Raw date text; unparseable or missing dates resolve to today
    pub date: Option<String>,
}

/// User records and their exercise logs
#[derive(Debug)]
pub struct ExerciseLog<S> {
    store: S,
}

impl<S: UserStore> ExerciseLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a user with an empty log
    pub fn create_user(&mut self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("username is required".into()));
        }

        let user = self.store.insert(NewUser {
            username: username.to_string(),
        })?;
        tracing::info!(user = %user.id(), username = %user.username(), "Created user");
        Ok(user)
    }

    /// Every user, in creation order
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.find_users(&UserFilter::all())
    }

    pub fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let users = self.store.find_all(filter)?;
        tracing::debug!("Found {} users", users.len());
        Ok(users)
    }

    pub fn find_user(&self, id: &UserId) -> Result<User> {
        self.store.find_by_id(id)?.ok_or_else(Error::id_not_found)
    }

    /// Append an entry to a user's log and persist the whole record
    pub fn append_entry(
        &mut self,
        id: &UserId,
        exercise: &NewExercise,
    ) -> Result<(User, ExerciseReceipt)> {
        let mut user = self.find_user(id)?;

        let description = exercise.description.trim();
        if description.is_empty() {
            return Err(Error::Validation("description is required".into()));
        }
        let duration = parse_duration(&exercise.duration)?;
        let date = dates::normalize(exercise.date.as_deref());

        user.push_entry(Entry {
            description: description.to_string(),
            duration,
            date: date.date,
        });
        let saved = self.store.save(&user)?;

        tracing::info!(
            user = %saved.id(),
            count = saved.count(),
            date = %date.canonical,
            "Appended exercise"
        );

        let receipt = ExerciseReceipt {
            username: saved.username().to_string(),
            description: description.to_string(),
            duration,
            date: date.display,
            id: saved.id(),
        };
        Ok((saved, receipt))
    }

    /// Filtered, limited view of a user's log
    pub fn query_log(&self, id: &UserId, params: &LogQuery) -> Result<LogView> {
        let user = self.find_user(id)?;
        query::query(&user, params)
    }
}

/// Strict whole-number duration
fn parse_duration(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("duration is required".into()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| Error::Validation(format!("duration must be a whole number: {}", trimmed)))
}
