//! HS256 JWT implementation of the [`TokenService`] port.
//!
//! Time checks use the injected [`Clock`] instead of the system time so
//! expiry can be exercised deterministically.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{IssuedToken, TokenError, TokenService};
use crate::domain::{Principal, Role, User, UserId};

/// `iss` claim stamped on and required of every token.
pub const TOKEN_ISSUER: &str = "aircraft-system";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    name: String,
    role: String,
    iat: i64,
    nbf: i64,
    exp: i64,
    iss: String,
    sub: String,
}

/// Signs and verifies session tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service whose tokens stay valid for `exp_hours`.
    ///
    /// Lifetimes too large to represent saturate; [`TokenService::issue`]
    /// then refuses to sign rather than stamping a wrapped expiry.
    pub fn new(secret: &str, exp_hours: i64, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        // Expiry and not-before are checked against the injected clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds: exp_hours.saturating_mul(3600),
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
        let now = self.clock.utc().timestamp();
        let exp = now
            .checked_add(self.ttl_seconds)
            .ok_or_else(|| TokenError::signing("token expiry out of range"))?;
        let claims = Claims {
            user_id: user.id.get(),
            name: user.name.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
            iat: now,
            nbf: now,
            exp,
            iss: TOKEN_ISSUER.to_owned(),
            sub: user.id.to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken {
            token,
            ttl_seconds: self.ttl_seconds,
        })
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                debug!(kind = ?err.kind(), "token rejected");
                TokenError::invalid()
            })?
            .claims;

        let now = self.clock.utc().timestamp();
        if now >= claims.exp {
            return Err(TokenError::expired());
        }
        if now < claims.nbf {
            return Err(TokenError::invalid());
        }

        let role: Role = claims.role.parse().map_err(|_| TokenError::invalid())?;
        Ok(Principal {
            user_id: UserId::new(claims.user_id),
            name: claims.name,
            role,
        })
    }
}
