//! PostgreSQL-backed [`PlaneRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PlanePersistenceError, PlaneRepository};
use crate::domain::{NewPlane, Plane, PlaneId, PlaneModel, TailNumber};

use super::diesel_basic_error_mapping::{
    StoreFailure, invalid_row, map_diesel_error, map_pool_error, with_store_timeout,
};
use super::models::{PlaneFields, PlaneRow};
use super::pool::DbPool;
use super::schema::planes;

/// Diesel-backed plane storage.
#[derive(Clone)]
pub struct DieselPlaneRepository {
    pool: DbPool,
}

impl DieselPlaneRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_plane(operation: &'static str, row: PlaneRow) -> Result<Plane, StoreFailure> {
    Ok(Plane {
        id: PlaneId::new(row.id),
        tail_number: TailNumber::new(&row.tail_number).map_err(|err| invalid_row(operation, err))?,
        model: PlaneModel::new(&row.model).map_err(|err| invalid_row(operation, err))?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl PlaneRepository for DieselPlaneRepository {
    async fn insert(&self, plane: &NewPlane) -> Result<Plane, PlanePersistenceError> {
        const OP: &str = "insert plane";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = diesel::insert_into(planes::table)
                .values(&PlaneFields {
                    tail_number: plane.tail_number.as_str(),
                    model: plane.model.as_str(),
                })
                .returning(PlaneRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            row_to_plane(OP, row)
        })
        .await
        .map_err(Into::into)
    }

    async fn find_by_id(&self, id: PlaneId) -> Result<Option<Plane>, PlanePersistenceError> {
        const OP: &str = "find plane by id";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = planes::table
                .find(id.get())
                .select(PlaneRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(OP, err))?;
            row.map(|row| row_to_plane(OP, row)).transpose()
        })
        .await
        .map_err(Into::into)
    }

    async fn find_by_tail_number(
        &self,
        tail_number: &TailNumber,
    ) -> Result<Option<Plane>, PlanePersistenceError> {
        const OP: &str = "find plane by tail number";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = planes::table
                .filter(planes::tail_number.eq(tail_number.as_str()))
                .select(PlaneRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(OP, err))?;
            row.map(|row| row_to_plane(OP, row)).transpose()
        })
        .await
        .map_err(Into::into)
    }

    async fn list_all(&self) -> Result<Vec<Plane>, PlanePersistenceError> {
        const OP: &str = "list planes";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let rows = planes::table
                .order(planes::id.asc())
                .select(PlaneRow::as_select())
                .load(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            rows.into_iter().map(|row| row_to_plane(OP, row)).collect()
        })
        .await
        .map_err(Into::into)
    }

    async fn update(&self, plane: &Plane) -> Result<Plane, PlanePersistenceError> {
        const OP: &str = "update plane";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = diesel::update(planes::table.find(plane.id.get()))
                .set(&PlaneFields {
                    tail_number: plane.tail_number.as_str(),
                    model: plane.model.as_str(),
                })
                .returning(PlaneRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            row_to_plane(OP, row)
        })
        .await
        .map_err(Into::into)
    }

    async fn delete(&self, id: PlaneId) -> Result<bool, PlanePersistenceError> {
        const OP: &str = "delete plane";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let deleted = diesel::delete(planes::table.find(id.get()))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            Ok(deleted > 0)
        })
        .await
        .map_err(Into::into)
    }
}
