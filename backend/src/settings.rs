//! Process configuration loaded via OrthoConfig.
//!
//! Values layer CLI flags over `AIRCRAFT_*` environment variables and
//! optional configuration files. [`AppSettings::validate`] runs once at
//! startup; the server refuses to start on a [`SettingsError`].

use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TOKEN_EXP_HOURS: i64 = 24;
pub const DEFAULT_PORT: u16 = 8080;
/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_EXP_HOURS: i64 = 8_760;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("AIRCRAFT_SECRET must be set to a non-empty value")]
    MissingSecret,
    #[error("token expiry must be between 1 and 8760 hours, got {hours}")]
    InvalidTokenExpiry { hours: i64 },
}

#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AIRCRAFT")]
pub struct AppSettings {
    /// HMAC key used to sign session tokens.
    pub secret: Option<String>,
    /// Token lifetime in hours.
    #[ortho_config(default = 24)]
    pub token_exp_hours: i64,
    /// PostgreSQL connection string. Without it every store-backed call
    /// answers `service_unavailable`.
    pub database_url: Option<String>,
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Mark the auth cookie `Secure`. Unset means `true`.
    pub cookie_secure: Option<bool>,
    /// Apply embedded migrations before serving. Unset means `true`.
    pub run_migrations: Option<bool>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("token_exp_hours", &self.token_exp_hours)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("port", &self.port)
            .field("cookie_secure", &self.cookie_secure())
            .field("run_migrations", &self.run_migrations())
            .finish()
    }
}

impl AppSettings {
    /// Check the values that have no safe fallback.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.signing_secret()?;
        if !(1..=MAX_TOKEN_EXP_HOURS).contains(&self.token_exp_hours) {
            return Err(SettingsError::InvalidTokenExpiry {
                hours: self.token_exp_hours,
            });
        }
        Ok(())
    }

    /// The configured signing secret, rejecting blank values.
    pub fn signing_secret(&self) -> Result<&str, SettingsError> {
        self.secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(SettingsError::MissingSecret)
    }

    /// The configured database URL, treating a blank value as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
