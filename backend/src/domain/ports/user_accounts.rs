//! Driving port for account registration, login and administration.
//!
//! Inbound adapters call this port without knowing which repository or
//! hashing backend sits behind it, so handler tests can swap in doubles.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Principal, Registration, User, UserChanges, UserId};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    pub ttl_seconds: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create an account; fails with `conflict` when the name is taken.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Verify credentials and issue a session token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;

    async fn get_by_id(&self, id: UserId) -> Result<User, Error>;

    async fn get_all(&self) -> Result<Vec<User>, Error>;

    /// Apply the supplied fields, re-hashing the password only when present.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, Error>;

    async fn delete(&self, id: UserId) -> Result<(), Error>;

    /// Load the account behind an authenticated principal.
    async fn get_me(&self, principal: &Principal) -> Result<User, Error>;
}
