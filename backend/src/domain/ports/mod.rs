//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenService`]) are
//! implemented by outbound adapters. Driving ports ([`UserAccounts`],
//! [`Fleet`], [`PartLifecycle`]) are implemented by the domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod fleet;
mod part_lifecycle;
mod part_repository;
mod password_hasher;
mod plane_repository;
mod token_service;
mod user_accounts;
mod user_repository;

pub use fleet::Fleet;
#[cfg(test)]
pub use fleet::MockFleet;
#[cfg(test)]
pub use part_lifecycle::MockPartLifecycle;
pub use part_lifecycle::PartLifecycle;
#[cfg(test)]
pub use part_repository::MockPartRepository;
pub use part_repository::{PartPersistenceError, PartRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use plane_repository::MockPlaneRepository;
pub use plane_repository::{PlanePersistenceError, PlaneRepository};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{IssuedToken, TokenError, TokenService};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{LoginOutcome, UserAccounts};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
