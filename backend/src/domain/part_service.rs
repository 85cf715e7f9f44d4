//! Part lifecycle service: installation, usage accounting and maintenance
//! alerts.
//!
//! Parts depend on their plane existing, so this service reads the plane
//! repository as well. The fleet service never reads parts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::fleet_service::{PLANE_NOT_FOUND, map_plane_repository_error};
use crate::domain::ports::{PartLifecycle, PartPersistenceError, PartRepository, PlaneRepository};
use crate::domain::{
    Category, Error, MaintenanceThreshold, NewPart, Part, PartChanges, PartId, Plane, PlaneId,
    PlaneWithParts, SerialNumber, UsageHours, parts_needing_maintenance,
};

const PART_NOT_FOUND: &str = "plane part not found";
const PART_EXISTS: &str = "plane part with this serial number already exists";
const USAGE_EXCEEDS_LIMIT: &str = "usage hours cannot exceed limit";

fn map_part_repository_error(error: PartPersistenceError) -> Error {
    match error {
        PartPersistenceError::Connection { message } => {
            error!(%message, "part repository unavailable");
            Error::service_unavailable(format!("part repository unavailable: {message}"))
        }
        PartPersistenceError::Query { message } => {
            error!(%message, "part repository query failed");
            Error::internal(format!("part repository error: {message}"))
        }
        PartPersistenceError::Duplicate { message } => {
            warn!(%message, "part write rejected by unique index");
            Error::conflict(PART_EXISTS)
        }
        PartPersistenceError::NotFound { message } => {
            warn!(%message, "part vanished before write");
            Error::not_found(PART_NOT_FOUND)
        }
        PartPersistenceError::UsageLimitExceeded { limit } => {
            warn!(%limit, "usage write refused by stored limit");
            Error::usage_exceeds_limit(USAGE_EXCEEDS_LIMIT)
        }
    }
}

/// Part service implementing the [`PartLifecycle`] driving port.
#[derive(Clone)]
pub struct PartLifecycleService<P, Q> {
    parts: Arc<P>,
    planes: Arc<Q>,
}

impl<P, Q> PartLifecycleService<P, Q> {
    pub fn new(parts: Arc<P>, planes: Arc<Q>) -> Self {
        Self { parts, planes }
    }
}

impl<P, Q> PartLifecycleService<P, Q>
where
    P: PartRepository,
    Q: PlaneRepository,
{
    async fn require_plane(&self, plane_id: PlaneId) -> Result<Plane, Error> {
        self.planes
            .find_by_id(plane_id)
            .await
            .map_err(map_plane_repository_error)?
            .ok_or_else(|| {
                warn!(plane_id = %plane_id, "plane not found");
                Error::not_found(PLANE_NOT_FOUND)
            })
    }

    async fn require_part(&self, id: PartId) -> Result<Part, Error> {
        self.parts
            .find_by_id(id)
            .await
            .map_err(map_part_repository_error)?
            .ok_or_else(|| {
                warn!(part_id = %id, "part not found");
                Error::not_found(PART_NOT_FOUND)
            })
    }

    async fn ensure_serial_free(&self, serial_number: &SerialNumber) -> Result<(), Error> {
        let existing = self
            .parts
            .find_by_serial_number(serial_number)
            .await
            .map_err(map_part_repository_error)?;
        if existing.is_some() {
            warn!(serial_number = %serial_number, "serial number already installed");
            return Err(Error::conflict(PART_EXISTS));
        }
        Ok(())
    }
}

#[async_trait]
impl<P, Q> PartLifecycle for PartLifecycleService<P, Q>
where
    P: PartRepository,
    Q: PlaneRepository,
{
    async fn add_part(&self, part: NewPart) -> Result<Part, Error> {
        self.require_plane(part.plane_id).await?;
        self.ensure_serial_free(&part.serial_number).await?;
        let created = self
            .parts
            .insert(&part)
            .await
            .map_err(map_part_repository_error)?;
        info!(
            part_id = %created.id,
            plane_id = %created.plane_id,
            serial_number = %created.serial_number,
            "part installed"
        );
        Ok(created)
    }

    async fn get_part(&self, id: PartId) -> Result<Part, Error> {
        self.require_part(id).await
    }

    async fn get_parts_by_plane(
        &self,
        plane_id: PlaneId,
        category: Option<Category>,
    ) -> Result<Vec<Part>, Error> {
        self.require_plane(plane_id).await?;
        self.parts
            .list_by_plane(plane_id, category)
            .await
            .map_err(map_part_repository_error)
    }

    async fn get_all_parts(&self) -> Result<Vec<Part>, Error> {
        self.parts.list_all().await.map_err(map_part_repository_error)
    }

    async fn update_part(&self, id: PartId, changes: PartChanges) -> Result<Part, Error> {
        let current = self.require_part(id).await?;
        let (part, serial_changed) = current.apply(changes);
        if serial_changed {
            self.ensure_serial_free(&part.serial_number).await?;
        }
        let updated = self
            .parts
            .update_details(&part)
            .await
            .map_err(map_part_repository_error)?;
        info!(part_id = %updated.id, "part updated");
        Ok(updated)
    }

    async fn update_part_usage(&self, id: PartId, usage_hours: UsageHours) -> Result<Part, Error> {
        let part = self.require_part(id).await?;
        if let Err(rejection) = part.check_usage(usage_hours) {
            warn!(
                part_id = %id,
                requested = rejection.requested,
                limit = rejection.limit,
                "usage update rejected: exceeds limit"
            );
            return Err(Error::usage_exceeds_limit(USAGE_EXCEEDS_LIMIT));
        }
        let updated = self
            .parts
            .update_usage(id, usage_hours)
            .await
            .map_err(map_part_repository_error)?;
        info!(
            part_id = %id,
            usage_hours = updated.usage_hours.get(),
            usage_percent = updated.usage_percent(),
            "part usage recorded"
        );
        Ok(updated)
    }

    async fn delete_part(&self, id: PartId) -> Result<(), Error> {
        let deleted = self
            .parts
            .delete(id)
            .await
            .map_err(map_part_repository_error)?;
        if !deleted {
            warn!(part_id = %id, "delete rejected: part not found");
            return Err(Error::not_found(PART_NOT_FOUND));
        }
        info!(part_id = %id, "part removed");
        Ok(())
    }

    async fn get_parts_needing_maintenance(
        &self,
        threshold: MaintenanceThreshold,
    ) -> Result<Vec<Part>, Error> {
        let parts = self
            .parts
            .list_all()
            .await
            .map_err(map_part_repository_error)?;
        let flagged = parts_needing_maintenance(parts, threshold);
        info!(
            threshold = threshold.get(),
            count = flagged.len(),
            "maintenance alerts evaluated"
        );
        Ok(flagged)
    }

    async fn get_plane_with_parts(&self, plane_id: PlaneId) -> Result<PlaneWithParts, Error> {
        let plane = self.require_plane(plane_id).await?;
        let parts = self
            .parts
            .list_by_plane(plane_id, None)
            .await
            .map_err(map_part_repository_error)?;
        Ok(PlaneWithParts { plane, parts })
    }
}

#[cfg(test)]
#[path = "part_service_tests.rs"]
mod tests;
