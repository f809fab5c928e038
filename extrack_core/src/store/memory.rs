use super::{UserFilter, UserStore};
use crate::{Error, NewUser, Result, User, UserId};

/// In-process store, mostly for tests and one-shot callers
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    users: Vec<User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for MemoryStore {
    fn insert(&mut self, user: NewUser) -> Result<User> {
        let user = User::new(UserId::new(), user.username);
        self.users.push(user.clone());
        Ok(user)
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.id() == *id).cloned())
    }

    fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }

    fn save(&mut self, user: &User) -> Result<User> {
        let slot = self
            .users
            .iter_mut()
            .find(|u| u.id() == user.id())
            .ok_or_else(Error::id_not_found)?;
        *slot = user.clone();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.into(),
        }
    }

    #[test]
    fn test_insert_assigns_distinct_ids() {
        let mut store = MemoryStore::new();
        let a = store.insert(new_user("alice")).unwrap();
        let b = store.insert(new_user("alice")).unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_find_all_keeps_insertion_order_and_filters() {
        let mut store = MemoryStore::new();
        store.insert(new_user("carol")).unwrap();
        store.insert(new_user("alice")).unwrap();
        store.insert(new_user("bob")).unwrap();

        let names: Vec<String> = store
            .find_all(&UserFilter::all())
            .unwrap()
            .iter()
            .map(|u| u.username().to_string())
            .collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);

        let bobs = store.find_all(&UserFilter::username("bob")).unwrap();
        assert_eq!(bobs.len(), 1);
    }

    #[test]
    fn test_save_unknown_user_is_not_found() {
        let mut store = MemoryStore::new();
        let stranger = User::new(UserId::new(), "ghost");

        let err = store.save(&stranger).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
