//! Filtered, limited views of a user's exercise log.
//!
//! - Each supplied bound is inclusive and applied on its own; a query with
//!   only `from` keeps everything on or after it.
//! - `limit > 0` keeps the first `limit` matching entries; anything else
//!   means no truncation.
//! - The view's `count` is the stored total, not the number of entries shown.

use crate::{dates, Entry, Error, LogEntryView, LogView, Result, User};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional retrieval parameters, as received from a caller
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
}

impl LogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, date: impl Into<String>) -> Self {
        self.from = Some(date.into());
        self
    }

    pub fn to(mut self, date: impl Into<String>) -> Self {
        self.to = Some(date.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Fill in `limit` when the caller left it out
    pub fn with_default_limit(mut self, default_limit: Option<i64>) -> Self {
        if self.limit.is_none() {
            self.limit = default_limit;
        }
        self
    }
}

/// Inclusive date bounds, either side optional
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    fn parse(query: &LogQuery) -> Result<Self> {
        Ok(Self {
            from: parse_bound("from", query.from.as_deref())?,
            to: parse_bound("to", query.to.as_deref())?,
        })
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| from <= date) && self.to.map_or(true, |to| date <= to)
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(input) => dates::parse_date(input)
            .map(Some)
            .ok_or_else(|| Error::Validation(format!("invalid '{}' date: {}", name, input))),
    }
}

/// Parse raw limit text; blank means absent
///
/// Only whole numbers are accepted. Fractions such as `1.5` are rejected
/// rather than rounded.
pub fn parse_limit(raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(input) => input
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::Validation(format!("limit must be a whole number: {}", input))),
    }
}

/// Entries of `user` selected by `query`, in log order
pub fn select_entries<'a>(user: &'a User, query: &LogQuery) -> Result<Vec<&'a Entry>> {
    let range = DateRange::parse(query)?;
    let matching = user.log().iter().filter(|e| range.contains(e.date));

    let selected: Vec<&Entry> = match query.limit {
        Some(limit) if limit > 0 => {
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            matching.take(limit).collect()
        }
        _ => matching.collect(),
    };

    tracing::debug!(
        user = %user.id(),
        stored = user.count(),
        selected = selected.len(),
        "Selected log entries"
    );
    Ok(selected)
}

/// Build the response view of `user`'s log
pub fn query(user: &User, query: &LogQuery) -> Result<LogView> {
    let log = select_entries(user, query)?
        .into_iter()
        .map(|entry| LogEntryView {
            description: entry.description.clone(),
            duration: entry.duration,
            date: dates::display(entry.date),
        })
        .collect();

    Ok(LogView {
        id: user.id(),
        username: user.username().to_string(),
        count: user.count(),
        log,
    })
}
