//! Fleet service: plane registration and maintenance of plane records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{Fleet, PlanePersistenceError, PlaneRepository};
use crate::domain::{Error, NewPlane, Plane, PlaneChanges, PlaneId, TailNumber};

pub(crate) const PLANE_NOT_FOUND: &str = "plane not found";
const PLANE_EXISTS: &str = "plane with this tail number already exists";

pub(crate) fn map_plane_repository_error(error: PlanePersistenceError) -> Error {
    match error {
        PlanePersistenceError::Connection { message } => {
            error!(%message, "plane repository unavailable");
            Error::service_unavailable(format!("plane repository unavailable: {message}"))
        }
        PlanePersistenceError::Query { message } => {
            error!(%message, "plane repository query failed");
            Error::internal(format!("plane repository error: {message}"))
        }
        PlanePersistenceError::Duplicate { message } => {
            warn!(%message, "plane write rejected by unique index");
            Error::conflict(PLANE_EXISTS)
        }
        PlanePersistenceError::NotFound { message } => {
            warn!(%message, "plane vanished before write");
            Error::not_found(PLANE_NOT_FOUND)
        }
    }
}

/// Plane service implementing the [`Fleet`] driving port.
#[derive(Clone)]
pub struct FleetService<P> {
    planes: Arc<P>,
}

impl<P> FleetService<P> {
    pub fn new(planes: Arc<P>) -> Self {
        Self { planes }
    }
}

impl<P> FleetService<P>
where
    P: PlaneRepository,
{
    async fn ensure_tail_free(&self, tail_number: &TailNumber) -> Result<(), Error> {
        let existing = self
            .planes
            .find_by_tail_number(tail_number)
            .await
            .map_err(map_plane_repository_error)?;
        if existing.is_some() {
            warn!(tail_number = %tail_number, "tail number already registered");
            return Err(Error::conflict(PLANE_EXISTS));
        }
        Ok(())
    }
}

#[async_trait]
impl<P> Fleet for FleetService<P>
where
    P: PlaneRepository,
{
    async fn create_plane(&self, plane: NewPlane) -> Result<Plane, Error> {
        self.ensure_tail_free(&plane.tail_number).await?;
        let created = self
            .planes
            .insert(&plane)
            .await
            .map_err(map_plane_repository_error)?;
        info!(plane_id = %created.id, tail_number = %created.tail_number, "plane created");
        Ok(created)
    }

    async fn get_plane(&self, id: PlaneId) -> Result<Plane, Error> {
        self.planes
            .find_by_id(id)
            .await
            .map_err(map_plane_repository_error)?
            .ok_or_else(|| {
                warn!(plane_id = %id, "plane not found");
                Error::not_found(PLANE_NOT_FOUND)
            })
    }

    async fn get_plane_by_tail(&self, tail_number: &TailNumber) -> Result<Plane, Error> {
        self.planes
            .find_by_tail_number(tail_number)
            .await
            .map_err(map_plane_repository_error)?
            .ok_or_else(|| {
                warn!(tail_number = %tail_number, "plane not found");
                Error::not_found(PLANE_NOT_FOUND)
            })
    }

    async fn get_all_planes(&self) -> Result<Vec<Plane>, Error> {
        self.planes.list_all().await.map_err(map_plane_repository_error)
    }

    async fn update_plane(&self, id: PlaneId, changes: PlaneChanges) -> Result<Plane, Error> {
        let current = self.get_plane(id).await?;
        let (plane, tail_changed) = current.apply(changes);
        if tail_changed {
            self.ensure_tail_free(&plane.tail_number).await?;
        }
        let updated = self
            .planes
            .update(&plane)
            .await
            .map_err(map_plane_repository_error)?;
        info!(plane_id = %updated.id, "plane updated");
        Ok(updated)
    }

    async fn delete_plane(&self, id: PlaneId) -> Result<(), Error> {
        let deleted = self
            .planes
            .delete(id)
            .await
            .map_err(map_plane_repository_error)?;
        if !deleted {
            warn!(plane_id = %id, "delete rejected: plane not found");
            return Err(Error::not_found(PLANE_NOT_FOUND));
        }
        info!(plane_id = %id, "plane deleted");
        Ok(())
    }
}
