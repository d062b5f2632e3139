use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::User;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Insert collided with an existing email key.
    #[error("duplicate key")]
    DuplicateKey,
    /// Update targeted a record that no longer exists.
    #[error("record not found")]
    NotFound,
}

/// Credential store seam. Single-record operations, each atomic; email is
/// the unique key.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Option<User>;

    /// Lookup matching either the username or the email.
    async fn find_by_identifier(&self, identifier: &str) -> Option<User>;

    async fn insert(&self, user: User) -> Result<(), StoreError>;

    /// Overwrites bio and picture unconditionally, including with None.
    async fn update_profile(
        &self,
        email: &str,
        bio: Option<String>,
        picture: Option<String>,
    ) -> Result<(), StoreError>;

    async fn update_password(&self, email: &str, password_hash: String)
        -> Result<(), StoreError>;
}

/// In-memory store keyed by email.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.lock().await.get(email).cloned()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Option<User> {
        let users = self.users.lock().await;
        if let Some(user) = users.get(identifier) {
            return Some(user.clone());
        }
        users.values().find(|u| u.username == identifier).cloned()
    }

    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::DuplicateKey);
        }
        users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn update_profile(
        &self,
        email: &str,
        bio: Option<String>,
        picture: Option<String>,
    ) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(email).ok_or(StoreError::NotFound)?;
        user.bio = bio;
        user.profile_picture = picture;
        Ok(())
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(email).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash;
        Ok(())
    }
}
