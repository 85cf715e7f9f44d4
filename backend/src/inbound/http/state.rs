//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{Fleet, PartLifecycle, TokenService, UserAccounts};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserAccounts>,
    pub fleet: Arc<dyn Fleet>,
    pub parts: Arc<dyn PartLifecycle>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserAccounts>,
    pub fleet: Arc<dyn Fleet>,
    pub parts: Arc<dyn PartLifecycle>,
    pub tokens: Arc<dyn TokenService>,
    /// Whether the auth cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl HttpState {
    /// Construct state from the ports bundle.
    pub fn new(ports: HttpStatePorts, cookie_secure: bool) -> Self {
        let HttpStatePorts {
            users,
            fleet,
            parts,
            tokens,
        } = ports;
        Self {
            users,
            fleet,
            parts,
            tokens,
            cookie_secure,
        }
    }
}
