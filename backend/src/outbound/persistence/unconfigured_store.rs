//! Repository stand-in used when no database URL is configured.
//!
//! Every call fails as a connection error, which the services surface as
//! `503 Service Unavailable`. Only the health endpoints keep working.

use async_trait::async_trait;

use crate::domain::ports::{
    PartPersistenceError, PartRepository, PlanePersistenceError, PlaneRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Category, NewPart, NewPlane, NewUser, Part, PartId, Plane, PlaneId, SerialNumber, TailNumber,
    UsageHours, User, UserId, UserName,
};

const NOT_CONFIGURED: &str = "database is not configured";

/// Store that answers every call with a connection failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl UserRepository for UnconfiguredStore {
    async fn insert(&self, _user: &NewUser) -> Result<User, UserPersistenceError> {
        Err(UserPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Err(UserPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn find_by_name(&self, _name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        Err(UserPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Err(UserPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn update(&self, _user: &User) -> Result<User, UserPersistenceError> {
        Err(UserPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn delete(&self, _id: UserId) -> Result<bool, UserPersistenceError> {
        Err(UserPersistenceError::connection(NOT_CONFIGURED))
    }
}

#[async_trait]
impl PlaneRepository for UnconfiguredStore {
    async fn insert(&self, _plane: &NewPlane) -> Result<Plane, PlanePersistenceError> {
        Err(PlanePersistenceError::connection(NOT_CONFIGURED))
    }

    async fn find_by_id(&self, _id: PlaneId) -> Result<Option<Plane>, PlanePersistenceError> {
        Err(PlanePersistenceError::connection(NOT_CONFIGURED))
    }

    async fn find_by_tail_number(
        &self,
        _tail_number: &TailNumber,
    ) -> Result<Option<Plane>, PlanePersistenceError> {
        Err(PlanePersistenceError::connection(NOT_CONFIGURED))
    }

    async fn list_all(&self) -> Result<Vec<Plane>, PlanePersistenceError> {
        Err(PlanePersistenceError::connection(NOT_CONFIGURED))
    }

    async fn update(&self, _plane: &Plane) -> Result<Plane, PlanePersistenceError> {
        Err(PlanePersistenceError::connection(NOT_CONFIGURED))
    }

    async fn delete(&self, _id: PlaneId) -> Result<bool, PlanePersistenceError> {
        Err(PlanePersistenceError::connection(NOT_CONFIGURED))
    }
}

#[async_trait]
impl PartRepository for UnconfiguredStore {
    async fn insert(&self, _part: &NewPart) -> Result<Part, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn find_by_id(&self, _id: PartId) -> Result<Option<Part>, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn find_by_serial_number(
        &self,
        _serial_number: &SerialNumber,
    ) -> Result<Option<Part>, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn list_by_plane(
        &self,
        _plane_id: PlaneId,
        _category: Option<Category>,
    ) -> Result<Vec<Part>, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn list_all(&self) -> Result<Vec<Part>, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn update_details(&self, _part: &Part) -> Result<Part, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn update_usage(
        &self,
        _id: PartId,
        _usage_hours: UsageHours,
    ) -> Result<Part, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }

    async fn delete(&self, _id: PartId) -> Result<bool, PartPersistenceError> {
        Err(PartPersistenceError::connection(NOT_CONFIGURED))
    }
}
