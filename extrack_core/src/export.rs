//! CSV export of a user's exercise log.
//!
//! Rows follow the same filter and limit rules as [`crate::query`], with
//! dates in their canonical `YYYY-MM-DD` form.

use crate::query::{select_entries, LogQuery};
use crate::{dates, Entry, Result, User};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    description: &'a str,
    duration: u32,
    date: String,
}

impl<'a> From<&'a Entry> for CsvRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        CsvRow {
            description: &entry.description,
            duration: entry.duration,
            date: dates::canonical(entry.date),
        }
    }
}

/// Write the selected entries as CSV with a header row.
///
/// Returns the number of rows written.
pub fn write_log_csv<W: Write>(user: &User, query: &LogQuery, out: W) -> Result<usize> {
    let entries = select_entries(user, query)?;

    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(out);
    if entries.is_empty() {
        // serialize() emits headers lazily, so write them by hand
        writer.write_record(["description", "duration", "date"])?;
    }
    for entry in &entries {
        writer.serialize(CsvRow::from(*entry))?;
    }
    writer.flush()?;

    Ok(entries.len())
}

/// Export to a file, creating parent directories and syncing to disk
pub fn export_log_to_path(user: &User, query: &LogQuery, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let count = write_log_csv(user, query, &file)?;
    file.sync_all()?;

    tracing::info!("Exported {} entries for {} to {:?}", count, user.id(), path);
    Ok(count)
}
