//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod password_history;
pub mod user;

pub use password_history::{
    ActiveModel as PasswordHistoryActiveModel, Entity as PasswordHistoryEntity,
};
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity};
