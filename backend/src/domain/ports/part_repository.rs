//! Port abstraction for part persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Category, NewPart, Part, PartId, PlaneId, SerialNumber, UsageHours};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by part repository adapters.
    pub enum PartPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "part repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "part repository query failed: {message}",
        /// The store's unique index rejected the write.
        Duplicate { message: String } => "part repository duplicate: {message}",
        /// The targeted row vanished before the write landed.
        NotFound { message: String } => "part repository record missing: {message}",
        /// A usage write was refused because the stored limit is lower.
        UsageLimitExceeded { limit: String } => "part usage exceeds stored limit {limit}",
    }
}

/// Port for part storage.
///
/// Listing methods return rows ordered by id ascending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartRepository: Send + Sync {
    async fn insert(&self, part: &NewPart) -> Result<Part, PartPersistenceError>;

    async fn find_by_id(&self, id: PartId) -> Result<Option<Part>, PartPersistenceError>;

    async fn find_by_serial_number(
        &self,
        serial_number: &SerialNumber,
    ) -> Result<Option<Part>, PartPersistenceError>;

    /// Parts on `plane_id`, narrowed to `category` when one is given.
    async fn list_by_plane(
        &self,
        plane_id: PlaneId,
        category: Option<Category>,
    ) -> Result<Vec<Part>, PartPersistenceError>;

    async fn list_all(&self) -> Result<Vec<Part>, PartPersistenceError>;

    /// Persist name, serial number, category and limit. Usage is not written.
    /// Fails with `NotFound` when the part was deleted meanwhile.
    async fn update_details(&self, part: &Part) -> Result<Part, PartPersistenceError>;

    /// Persist only the usage hours column.
    ///
    /// The write and the limit comparison are one atomic step: a value above
    /// the limit stored at write time yields
    /// [`PartPersistenceError::UsageLimitExceeded`] and leaves usage as it was.
    async fn update_usage(
        &self,
        id: PartId,
        usage_hours: UsageHours,
    ) -> Result<Part, PartPersistenceError>;

    async fn delete(&self, id: PartId) -> Result<bool, PartPersistenceError>;
}
