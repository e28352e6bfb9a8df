use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::{NewUser, StoreError, UserRecord, UserStore};

/// In-process store backing the test suites, nothing survives a restart.
///
/// The inspection helpers read through a poisoned lock.
#[derive(Default)]
pub struct MemoryUserStore {
    username_index: RwLock<HashMap<Box<str>, Uuid>>,
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_username(&self, username: &str) -> Option<UserRecord> {
        let id = self.username_index.read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()?;

        self.users.read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        let mut usernames_writer = self.username_index.write()
            .map_err(|_err| StoreError::Unavailable("failed to write username_index rwlock".into()))?;
        let mut users_writer = self.users.write()
            .map_err(|_err| StoreError::Unavailable("failed to write users rwlock".into()))?;

        if usernames_writer.contains_key(&new_user.username) {
            return Err(StoreError::DuplicateUsername);
        }

        let mut id = Uuid::new_v4();

        while users_writer.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let record = UserRecord::create(id, new_user);

        usernames_writer.insert(record.username.clone(), id);
        users_writer.insert(id, record.clone());

        Ok(record)
    }
}
