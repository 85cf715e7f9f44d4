//! Driving port for installed parts, usage updates and maintenance alerts.

use async_trait::async_trait;

use crate::domain::{
    Category, Error, MaintenanceThreshold, NewPart, Part, PartChanges, PartId, PlaneId,
    PlaneWithParts, UsageHours,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartLifecycle: Send + Sync {
    /// Install a part on an existing plane with a globally unique serial.
    async fn add_part(&self, part: NewPart) -> Result<Part, Error>;

    async fn get_part(&self, id: PartId) -> Result<Part, Error>;

    /// Parts on a plane, optionally narrowed to one category.
    async fn get_parts_by_plane(
        &self,
        plane_id: PlaneId,
        category: Option<Category>,
    ) -> Result<Vec<Part>, Error>;

    async fn get_all_parts(&self) -> Result<Vec<Part>, Error>;

    /// Update descriptive fields and the limit. Usage hours are untouched.
    async fn update_part(&self, id: PartId, changes: PartChanges) -> Result<Part, Error>;

    /// Record new usage; rejected with `usage_exceeds_limit` past the limit.
    async fn update_part_usage(&self, id: PartId, usage_hours: UsageHours) -> Result<Part, Error>;

    async fn delete_part(&self, id: PartId) -> Result<(), Error>;

    /// Parts at or above `threshold` percent, highest usage first.
    async fn get_parts_needing_maintenance(
        &self,
        threshold: MaintenanceThreshold,
    ) -> Result<Vec<Part>, Error>;

    async fn get_plane_with_parts(&self, plane_id: PlaneId) -> Result<PlaneWithParts, Error>;
}
