//! Driving port for plane management.

use async_trait::async_trait;

use crate::domain::{Error, NewPlane, Plane, PlaneChanges, PlaneId, TailNumber};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fleet: Send + Sync {
    /// Register a plane; fails with `conflict` when the tail number is taken.
    async fn create_plane(&self, plane: NewPlane) -> Result<Plane, Error>;

    async fn get_plane(&self, id: PlaneId) -> Result<Plane, Error>;

    async fn get_plane_by_tail(&self, tail_number: &TailNumber) -> Result<Plane, Error>;

    /// Every plane ordered by id; empty when none exist.
    async fn get_all_planes(&self) -> Result<Vec<Plane>, Error>;

    /// Apply changes, re-checking tail number uniqueness when it moves.
    async fn update_plane(&self, id: PlaneId, changes: PlaneChanges) -> Result<Plane, Error>;

    async fn delete_plane(&self, id: PlaneId) -> Result<(), Error>;
}
