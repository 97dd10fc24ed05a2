//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user stamped with the current time
    pub fn new(id: Uuid, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the initial history entry recording this user's first password
    pub fn initial_history_entry(&self) -> PasswordHistoryEntry {
        PasswordHistoryEntry::new(self.id, self.password_hash.clone())
    }
}

/// Append-only record of a password hash a user has held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PasswordHistoryEntry {
    pub fn new(user_id: Uuid, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
