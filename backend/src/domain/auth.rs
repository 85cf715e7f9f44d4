//! Authentication primitives: login credentials and the resolved principal.
//!
//! Handlers build [`LoginCredentials`] from raw payload strings before
//! talking to a port, and the access gate turns a verified token into a
//! [`Principal`] that role checks run against.

use std::fmt;

use zeroize::Zeroizing;

use super::{Error, Role, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the identity service.
///
/// ## Invariants
/// - `name` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use aircraft_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "secret1").unwrap();
/// assert_eq!(creds.name(), "alice");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    name: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw name/password inputs.
    pub fn try_from_parts(name: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = name.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyName);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            name: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Authenticated identity resolved from a request token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

impl Principal {
    /// Require `required`, with [`Role::Admin`] passing every gate.
    ///
    /// # Examples
    /// ```
    /// use aircraft_backend::domain::{Principal, Role, UserId};
    ///
    /// let admin = Principal { user_id: UserId::new(1), name: "root".into(), role: Role::Admin };
    /// assert!(admin.authorize(Role::Mechanic).is_ok());
    /// ```
    pub fn authorize(&self, required: Role) -> Result<(), Error> {
        if self.role == required || self.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::forbidden("insufficient permissions"))
        }
    }

    /// Allow access to `user_id`'s own resources, or to any of them for an admin.
    pub fn authorize_self_or_admin(&self, user_id: UserId) -> Result<(), Error> {
        if self.user_id == user_id || self.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::forbidden("insufficient permissions"))
        }
    }
}
