//! Port abstraction for plane persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewPlane, Plane, PlaneId, TailNumber};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by plane repository adapters.
    pub enum PlanePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "plane repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "plane repository query failed: {message}",
        /// The store's unique index rejected the write.
        Duplicate { message: String } => "plane repository duplicate: {message}",
        /// The targeted row vanished before the write landed.
        NotFound { message: String } => "plane repository record missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaneRepository: Send + Sync {
    async fn insert(&self, plane: &NewPlane) -> Result<Plane, PlanePersistenceError>;

    async fn find_by_id(&self, id: PlaneId) -> Result<Option<Plane>, PlanePersistenceError>;

    async fn find_by_tail_number(
        &self,
        tail_number: &TailNumber,
    ) -> Result<Option<Plane>, PlanePersistenceError>;

    /// Every plane, ordered by id.
    async fn list_all(&self) -> Result<Vec<Plane>, PlanePersistenceError>;

    /// Fails with `NotFound` when the plane was deleted meanwhile.
    async fn update(&self, plane: &Plane) -> Result<Plane, PlanePersistenceError>;

    /// Delete a plane, returning `false` when no row matched. Parts are kept.
    async fn delete(&self, id: PlaneId) -> Result<bool, PlanePersistenceError>;
}
