//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The store's unique index rejected the write.
        Duplicate { message: String } => "user repository duplicate: {message}",
        /// The targeted row vanished before the write landed.
        NotFound { message: String } => "user repository record missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return the stored record.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by its unique name.
    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError>;

    /// Every account, ordered by id.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite the mutable fields of an existing account. Fails with
    /// `NotFound` when the account was deleted meanwhile.
    async fn update(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Delete an account, returning `false` when no row matched.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
