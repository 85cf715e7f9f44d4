//! Identity service: registration, login and account administration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    LoginOutcome, PasswordHashError, PasswordHasher, TokenService, UserAccounts,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewUser, Principal, Registration, User, UserChanges, UserId,
    UserName,
};

const USER_NOT_FOUND: &str = "user not found";
const USER_EXISTS: &str = "user already exists";
const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { message } => {
            warn!(%message, "user write rejected by unique index");
            Error::conflict(USER_EXISTS)
        }
        UserPersistenceError::NotFound { message } => {
            warn!(%message, "user vanished before write");
            Error::not_found(USER_NOT_FOUND)
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal(error.to_string())
}

/// Account service implementing the [`UserAccounts`] driving port.
#[derive(Clone)]
pub struct UserAccountService<R, H, T> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<R, H, T> UserAccountService<R, H, T> {
    pub fn new(users: Arc<R>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<R, H, T> UserAccountService<R, H, T>
where
    R: UserRepository,
{
    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                warn!(user_id = %id, "user not found");
                Error::not_found(USER_NOT_FOUND)
            })
    }

    async fn ensure_name_free(&self, name: &UserName) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_name(name)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            warn!(name = %name, "user name already taken");
            return Err(Error::conflict(USER_EXISTS));
        }
        Ok(())
    }
}

#[async_trait]
impl<R, H, T> UserAccounts for UserAccountService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            name,
            password,
            role,
        } = registration;
        self.ensure_name_free(&name).await?;

        let password_digest = self.hasher.hash(&password).await.map_err(map_hash_error)?;
        let user = self
            .users
            .insert(&NewUser {
                name,
                password_digest,
                role,
            })
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        // A name that fails validation cannot belong to any stored account.
        let Ok(name) = UserName::new(credentials.name()) else {
            warn!("login rejected: unknown user");
            return Err(Error::not_found(USER_NOT_FOUND));
        };
        let user = self
            .users
            .find_by_name(&name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                warn!(name = %name, "login rejected: unknown user");
                Error::not_found(USER_NOT_FOUND)
            })?;

        let verified = self
            .hasher
            .verify(credentials.password(), &user.password_digest)
            .await
            .map_err(map_hash_error)?;
        if !verified {
            warn!(user_id = %user.id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self.tokens.issue(&user).map_err(|err| {
            error!(error = %err, user_id = %user.id, "failed to issue token");
            Error::internal(format!("failed to generate token: {err}"))
        })?;

        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome {
            user,
            token: issued.token,
            ttl_seconds: issued.ttl_seconds,
        })
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, Error> {
        self.require_user(id).await
    }

    async fn get_all(&self) -> Result<Vec<User>, Error> {
        self.users.list_all().await.map_err(map_repository_error)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, Error> {
        let mut user = self.require_user(id).await?;
        let UserChanges {
            name,
            password,
            role,
        } = changes;

        if let Some(name) = name {
            if name != user.name {
                self.ensure_name_free(&name).await?;
            }
            user.name = name;
        }
        if let Some(password) = password {
            user.password_digest = self.hasher.hash(&password).await.map_err(map_hash_error)?;
        }
        if let Some(role) = role {
            user.role = role;
        }

        let updated = self
            .users
            .update(&user)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %updated.id, "user updated");
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        let deleted = self.users.delete(id).await.map_err(map_repository_error)?;
        if !deleted {
            warn!(user_id = %id, "delete rejected: user not found");
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn get_me(&self, principal: &Principal) -> Result<User, Error> {
        self.require_user(principal.user_id).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
