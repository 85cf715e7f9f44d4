//! Domain primitives, ports and services.
//!
//! Purpose: hold the aircraft maintenance rules independently of HTTP and
//! storage. Types here carry no serde or framework derives except
//! [`Error`], which is the wire payload for every failure.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure taxonomy.
//! - User, Plane, Part and their validated field newtypes.
//! - Principal: authenticated identity with the admin-override role gate.
//! - UserAccountService, FleetService, PartLifecycleService: driving ports.

pub mod auth;
pub mod error;
pub mod fleet_service;
pub mod part;
pub mod part_service;
pub mod plane;
pub mod ports;
mod text;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{LoginCredentials, LoginValidationError, Principal};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::fleet_service::FleetService;
pub use self::part::{
    Category, DEFAULT_MAINTENANCE_THRESHOLD, MaintenanceThreshold, NewPart, Part, PartChanges,
    PartId, PartName, PartValidationError, PlaneWithParts, SerialNumber, UsageExceedsLimit,
    UsageHours, UsageLimitHours, parts_needing_maintenance, usage_percent,
};
pub use self::part_service::PartLifecycleService;
pub use self::plane::{NewPlane, Plane, PlaneChanges, PlaneId, PlaneModel, TailNumber};
pub use self::text::TextLengthError;
pub use self::trace_id::TraceId;
pub use self::user::{
    NewUser, Password, PasswordDigest, Registration, Role, User, UserChanges, UserId, UserName,
    UserValidationError,
};
pub use self::user_service::UserAccountService;
