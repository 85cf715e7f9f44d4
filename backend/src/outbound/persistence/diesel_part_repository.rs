//! PostgreSQL-backed [`PartRepository`] implementation using Diesel.
//!
//! Usage hours are written by exactly one statement, [`update_usage`], so a
//! details update can never clobber a concurrent usage report. That
//! statement carries the limit check in its `WHERE` clause, so a limit
//! lowered after the service read the part still holds.
//!
//! [`update_usage`]: PartRepository::update_usage

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PartPersistenceError, PartRepository};
use crate::domain::{
    Category, NewPart, Part, PartId, PartName, PlaneId, SerialNumber, UsageHours, UsageLimitHours,
};

use super::diesel_basic_error_mapping::{
    StoreFailure, invalid_row, map_diesel_error, map_pool_error, with_store_timeout,
};
use super::models::{NewPartRow, PartDetailsUpdate, PartRow};
use super::pool::DbPool;
use super::schema::plane_parts;

/// Result of the limit-guarded usage write.
enum UsageWrite {
    Recorded(Part),
    Refused { limit: f64 },
}

/// Diesel-backed part storage.
#[derive(Clone)]
pub struct DieselPartRepository {
    pool: DbPool,
}

impl DieselPartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_part(operation: &'static str, row: PartRow) -> Result<Part, StoreFailure> {
    Ok(Part {
        id: PartId::new(row.id),
        plane_id: PlaneId::new(row.plane_id),
        part_name: PartName::new(&row.part_name).map_err(|err| invalid_row(operation, err))?,
        serial_number: SerialNumber::new(&row.serial_number).map_err(|err| invalid_row(operation, err))?,
        category: Category::new(&row.category).map_err(|err| invalid_row(operation, err))?,
        usage_hours: UsageHours::new(row.usage_hours).map_err(|err| invalid_row(operation, err))?,
        usage_limit_hours: UsageLimitHours::new(row.usage_limit_hours)
            .map_err(|err| invalid_row(operation, err))?,
        installed_at: row.installed_at,
    })
}

fn rows_to_parts(operation: &'static str, rows: Vec<PartRow>) -> Result<Vec<Part>, StoreFailure> {
    rows.into_iter()
        .map(|row| row_to_part(operation, row))
        .collect()
}

#[async_trait]
impl PartRepository for DieselPartRepository {
    async fn insert(&self, part: &NewPart) -> Result<Part, PartPersistenceError> {
        const OP: &str = "insert part";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = diesel::insert_into(plane_parts::table)
                .values(&NewPartRow {
                    plane_id: part.plane_id.get(),
                    part_name: part.part_name.as_str(),
                    serial_number: part.serial_number.as_str(),
                    category: part.category.as_str(),
                    usage_hours: part.usage_hours.get(),
                    usage_limit_hours: part.usage_limit_hours.get(),
                })
                .returning(PartRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            row_to_part(OP, row)
        })
        .await
        .map_err(Into::into)
    }

    async fn find_by_id(&self, id: PartId) -> Result<Option<Part>, PartPersistenceError> {
        const OP: &str = "find part by id";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = plane_parts::table
                .find(id.get())
                .select(PartRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(OP, err))?;
            row.map(|row| row_to_part(OP, row)).transpose()
        })
        .await
        .map_err(Into::into)
    }

    async fn find_by_serial_number(
        &self,
        serial_number: &SerialNumber,
    ) -> Result<Option<Part>, PartPersistenceError> {
        const OP: &str = "find part by serial number";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = plane_parts::table
                .filter(plane_parts::serial_number.eq(serial_number.as_str()))
                .select(PartRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(OP, err))?;
            row.map(|row| row_to_part(OP, row)).transpose()
        })
        .await
        .map_err(Into::into)
    }

    async fn list_by_plane(
        &self,
        plane_id: PlaneId,
        category: Option<Category>,
    ) -> Result<Vec<Part>, PartPersistenceError> {
        const OP: &str = "list parts by plane";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let mut query = plane_parts::table
                .filter(plane_parts::plane_id.eq(plane_id.get()))
                .into_boxed();
            if let Some(category) = category.as_ref() {
                query = query.filter(plane_parts::category.eq(category.as_str()));
            }
            let rows = query
                .order(plane_parts::id.asc())
                .select(PartRow::as_select())
                .load(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            rows_to_parts(OP, rows)
        })
        .await
        .map_err(Into::into)
    }

    async fn list_all(&self) -> Result<Vec<Part>, PartPersistenceError> {
        const OP: &str = "list parts";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let rows = plane_parts::table
                .order(plane_parts::id.asc())
                .select(PartRow::as_select())
                .load(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            rows_to_parts(OP, rows)
        })
        .await
        .map_err(Into::into)
    }

    async fn update_details(&self, part: &Part) -> Result<Part, PartPersistenceError> {
        const OP: &str = "update part";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = diesel::update(plane_parts::table.find(part.id.get()))
                .set(&PartDetailsUpdate {
                    part_name: part.part_name.as_str(),
                    serial_number: part.serial_number.as_str(),
                    category: part.category.as_str(),
                    usage_limit_hours: part.usage_limit_hours.get(),
                })
                .returning(PartRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            row_to_part(OP, row)
        })
        .await
        .map_err(Into::into)
    }

    async fn update_usage(
        &self,
        id: PartId,
        usage_hours: UsageHours,
    ) -> Result<Part, PartPersistenceError> {
        const OP: &str = "update part usage";
        let outcome = with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = diesel::update(
                plane_parts::table
                    .find(id.get())
                    .filter(plane_parts::usage_limit_hours.ge(usage_hours.get())),
            )
            .set(plane_parts::usage_hours.eq(usage_hours.get()))
            .returning(PartRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(OP, err))?;
            if let Some(row) = row {
                return row_to_part(OP, row).map(UsageWrite::Recorded);
            }
            // Nothing matched: either the row is gone or its limit is lower.
            let limit = plane_parts::table
                .find(id.get())
                .select(plane_parts::usage_limit_hours)
                .first::<f64>(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            Ok(UsageWrite::Refused { limit })
        })
        .await?;

        match outcome {
            UsageWrite::Recorded(part) => Ok(part),
            UsageWrite::Refused { limit } => {
                Err(PartPersistenceError::usage_limit_exceeded(limit.to_string()))
            }
        }
    }

    async fn delete(&self, id: PartId) -> Result<bool, PartPersistenceError> {
        const OP: &str = "delete part";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let deleted = diesel::delete(plane_parts::table.find(id.get()))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            Ok(deleted > 0)
        })
        .await
        .map_err(Into::into)
    }
}
