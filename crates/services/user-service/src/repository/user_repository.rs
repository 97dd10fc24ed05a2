//! User repository implementation with transactional registration.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::password_history::{self, Entity as PasswordHistoryEntity};
use super::entities::user::{self, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{PasswordHistoryEntry, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user together with its first password history entry.
    ///
    /// Both rows commit together or not at all. A username or email already
    /// taken fails with `DuplicateIdentity`, decided by the store's unique
    /// indexes rather than a prior lookup.
    async fn register(
        &self,
        username: String,
        password_hash: String,
        email: String,
    ) -> AppResult<Uuid>;

    /// Remove a user and its password history in one transaction
    async fn unregister(&self, id: Uuid) -> AppResult<()>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Password history for a user, oldest first
    async fn password_history(&self, user_id: Uuid) -> AppResult<Vec<PasswordHistoryEntry>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` succeeds and rolls back when it fails. A transaction
    /// dropped without commit is rolled back by SeaORM as well.
    async fn execute_transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                &'a DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

async fn insert_user(txn: &DatabaseTransaction, user: &User) -> AppResult<()> {
    let active_model = user::ActiveModel {
        id: Set(user.id),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    };

    active_model.insert(txn).await.map_err(|e| {
        tracing::debug!("Failed to insert user: {}", e);
        AppError::from(e)
    })?;
    Ok(())
}

async fn insert_history(txn: &DatabaseTransaction, entry: &PasswordHistoryEntry) -> AppResult<()> {
    let active_model = password_history::ActiveModel {
        id: Set(entry.id),
        user_id: Set(entry.user_id),
        password_hash: Set(entry.password_hash.clone()),
        created_at: Set(entry.created_at),
    };

    active_model.insert(txn).await.map_err(|e| {
        tracing::debug!("Failed to insert password history: {}", e);
        AppError::from(e)
    })?;
    Ok(())
}

#[async_trait]
impl UserRepository for UserStore {
    async fn register(
        &self,
        username: String,
        password_hash: String,
        email: String,
    ) -> AppResult<Uuid> {
        let user = User::new(Uuid::new_v4(), username, email, password_hash);
        let history = user.initial_history_entry();

        let id = self
            .execute_transaction(move |txn| {
                Box::pin(async move {
                    insert_user(txn, &user).await?;
                    insert_history(txn, &history).await?;
                    Ok(user.id)
                })
            })
            .await?;

        tracing::debug!(user_id = %id, "User and password history committed");
        Ok(id)
    }

    async fn unregister(&self, id: Uuid) -> AppResult<()> {
        let removed = self
            .execute_transaction(move |txn| {
                Box::pin(async move {
                    PasswordHistoryEntity::delete_many()
                        .filter(password_history::Column::UserId.eq(id))
                        .exec(txn)
                        .await?;
                    let result = UserEntity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected)
                })
            })
            .await?;

        if removed == 0 {
            tracing::warn!(user_id = %id, "Unregister found no user to remove");
        }
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn password_history(&self, user_id: Uuid) -> AppResult<Vec<PasswordHistoryEntry>> {
        let models = PasswordHistoryEntity::find()
            .filter(password_history::Column::UserId.eq(user_id))
            .order_by_asc(password_history::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(PasswordHistoryEntry::from).collect())
    }
}
