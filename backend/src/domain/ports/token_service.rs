//! Port for issuing and verifying signed session tokens.

use crate::domain::{Principal, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token was well formed but its expiry has passed.
        Expired => "token has expired",
        /// The token failed signature, issuer or format checks.
        Invalid => "invalid token",
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// A freshly signed token and how long it stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub ttl_seconds: i64,
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying `user`'s id, name and role.
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError>;

    /// Resolve a presented token into the principal it was issued for.
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}
