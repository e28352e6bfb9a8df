//! User persistence.
//!
//! The registration route only ever sees [`UserStore`]. Uniqueness of the
//! username is the store's job, callers never check beforehand.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::RegisteredUser;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod mongo;

pub use memory::MemoryUserStore;
pub use mongo::MongoUserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("store unavailable: {0}")]
    Unavailable(Box<str>),
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Box<str>,
    pub password: Box<str>,
}

/// A persisted user.
///
/// The password is kept exactly as it was submitted. No hashing happens
/// anywhere in the registration path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: Box<str>,
    pub password: Box<str>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    fn create(id: Uuid, new_user: NewUser) -> Self {
        UserRecord {
            id,
            username: new_user.username,
            password: new_user.password,
            created_at: Utc::now(),
        }
    }

    pub fn public(&self) -> RegisteredUser {
        RegisteredUser {
            id: self.id,
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// creates exactly one record or fails with
    /// [`StoreError::DuplicateUsername`] leaving the existing one untouched
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, StoreError>;
}
