//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! records. Row structs (`models.rs`) and table definitions (`schema.rs`)
//! stay private to this module. Every call runs under a fixed timeout and
//! all failures are classified into the port's persistence error.
//!
//! # Example
//!
//! ```ignore
//! use aircraft_backend::outbound::persistence::{DbPool, PoolConfig, DieselPlaneRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/aircraft")).await?;
//! let planes = DieselPlaneRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_part_repository;
mod diesel_plane_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod unconfigured_store;

pub use diesel_part_repository::DieselPartRepository;
pub use diesel_plane_repository::DieselPlaneRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
pub use unconfigured_store::UnconfiguredStore;
