//! JSON file persistence for user records with file locking.
//!
//! Every user lives in one JSON document. Writers take an exclusive lock on
//! a sibling `.lock` file, rewrite the whole document to a temp file and
//! rename it over the original; readers take a shared lock. A single
//! operation never observes a torn file, but separate load and save calls
//! from two processes can still interleave (last write wins).

use super::{UserFilter, UserStore, STORE_FILE_NAME};
use crate::{Error, NewUser, Result, User, UserId};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Top-level layout of the store file
#[derive(Debug, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    users: Vec<User>,
}

/// File-backed [`UserStore`]
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store using the standard file name inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Open (creating if needed) the lock file guarding the store
    fn open_lock(&self) -> Result<File> {
        std::fs::create_dir_all(self.parent_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(self.lock_path())?;
        Ok(file)
    }

    /// Read every user under a shared lock
    fn load(&self) -> Result<Vec<User>> {
        if !self.path.exists() {
            tracing::debug!("No store file at {:?}, treating as empty", self.path);
            return Ok(Vec::new());
        }

        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let users = self.read_unlocked();
        lock.unlock()?;
        users
    }

    /// Load, modify and rewrite the document under an exclusive lock
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<User>) -> Result<T>,
    {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;

        // Lock is released when `lock` is dropped on the error paths
        let mut users = self.read_unlocked()?;
        let out = f(&mut users)?;
        self.write_unlocked(&users)?;

        lock.unlock()?;
        Ok(out)
    }

    fn read_unlocked(&self) -> Result<Vec<User>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let mut contents = String::new();
        std::io::BufReader::new(&file).read_to_string(&mut contents)?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let doc: StoreDocument = serde_json::from_str(&contents).map_err(|e| {
            tracing::warn!("Failed to parse store file {:?}: {}", self.path, e);
            Error::Storage(format!("corrupt store file {:?}: {}", self.path, e))
        })?;

        tracing::debug!("Loaded {} users from {:?}", doc.users.len(), self.path);
        Ok(doc.users)
    }

    /// Atomically replace the store file:
    /// 1. Write to a temp file in the same directory
    /// 2. Sync to disk
    /// 3. Rename over the original
    fn write_unlocked(&self, users: &[User]) -> Result<()> {
        let temp = NamedTempFile::new_in(self.parent_dir())?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, &StoreDocumentRef { users })?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} users to {:?}", users.len(), self.path);
        Ok(())
    }
}

/// Borrowing twin of [`StoreDocument`] for writes
#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    users: &'a [User],
}

impl UserStore for JsonFileStore {
    fn insert(&mut self, user: NewUser) -> Result<User> {
        self.update(|users| {
            let created = User::new(UserId::new(), user.username);
            users.push(created.clone());
            Ok(created)
        })
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.load()?.into_iter().find(|u| u.id() == *id))
    }

    fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|u| filter.matches(u))
            .collect())
    }

    fn save(&mut self, user: &User) -> Result<User> {
        self.update(|users| {
            let slot = users
                .iter_mut()
                .find(|u| u.id() == user.id())
                .ok_or_else(Error::id_not_found)?;
            *slot = user.clone();
            Ok(user.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entry;
    use chrono::NaiveDate;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.into(),
        }
    }

    #[test]
    fn test_insert_and_reload_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(temp_dir.path());

        let alice = store.insert(new_user("alice")).unwrap();

        // A fresh handle sees the same data
        let reopened = JsonFileStore::in_dir(temp_dir.path());
        let found = reopened.find_by_id(&alice.id()).unwrap().unwrap();
        assert_eq!(found.username(), "alice");
        assert_eq!(found.count(), 0);
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("nested").join("users.json"));

        assert!(store.find_all(&UserFilter::all()).unwrap().is_empty());
        assert!(store.find_by_id(&UserId::new()).unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_whole_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(temp_dir.path());

        let mut user = store.insert(new_user("alice")).unwrap();
        store.insert(new_user("bob")).unwrap();

        user.push_entry(Entry {
            description: "run".into(),
            duration: 30,
            date: NaiveDate::from_ymd_opt(2023, 9, 9).unwrap(),
        });
        store.save(&user).unwrap();

        let all = store.find_all(&UserFilter::all()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].count(), 1);
        assert_eq!(all[1].count(), 0);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"date\":\"2023-09-09\""));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(temp_dir.path());
        std::fs::write(store.path(), "{ invalid json }").unwrap();

        let err = store.find_all(&UserFilter::all()).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        // The corrupt file is left in place for manual recovery
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "{ invalid json }");
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(temp_dir.path());
        store.insert(new_user("alice")).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "users.json" && name != "users.json.lock")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only the store and its lock, found extras: {:?}",
            extras
        );
    }
}
