//! PostgreSQL-backed [`UserRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, PasswordDigest, Role, User, UserId, UserName};

use super::diesel_basic_error_mapping::{
    StoreFailure, invalid_row, map_diesel_error, map_pool_error, with_store_timeout,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed account storage.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(operation: &'static str, row: UserRow) -> Result<User, StoreFailure> {
    let name = UserName::new(&row.name).map_err(|err| invalid_row(operation, err))?;
    let role: Role = row.role.parse().map_err(|err| invalid_row(operation, err))?;
    Ok(User {
        id: UserId::new(row.id),
        name,
        password_digest: PasswordDigest::new(row.password_digest),
        role,
        created_at: row.created_at,
    })
}

fn rows_to_users(operation: &'static str, rows: Vec<UserRow>) -> Result<Vec<User>, StoreFailure> {
    rows.into_iter()
        .map(|row| row_to_user(operation, row))
        .collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        const OP: &str = "insert user";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = diesel::insert_into(users::table)
                .values(&NewUserRow {
                    name: user.name.as_str(),
                    password_digest: user.password_digest.as_str(),
                    role: user.role.as_str(),
                })
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            row_to_user(OP, row)
        })
        .await
        .map_err(Into::into)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        const OP: &str = "find user by id";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = users::table
                .find(id.get())
                .select(UserRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(OP, err))?;
            row.map(|row| row_to_user(OP, row)).transpose()
        })
        .await
        .map_err(Into::into)
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        const OP: &str = "find user by name";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = users::table
                .filter(users::name.eq(name.as_str()))
                .select(UserRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(OP, err))?;
            row.map(|row| row_to_user(OP, row)).transpose()
        })
        .await
        .map_err(Into::into)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        const OP: &str = "list users";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let rows = users::table
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            rows_to_users(OP, rows)
        })
        .await
        .map_err(Into::into)
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        const OP: &str = "update user";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let row = diesel::update(users::table.find(user.id.get()))
                .set(&UserUpdate {
                    name: user.name.as_str(),
                    password_digest: user.password_digest.as_str(),
                    role: user.role.as_str(),
                })
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            row_to_user(OP, row)
        })
        .await
        .map_err(Into::into)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        const OP: &str = "delete user";
        with_store_timeout(OP, async {
            let mut conn = self.pool.get().await.map_err(|err| map_pool_error(OP, err))?;
            let deleted = diesel::delete(users::table.find(id.get()))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(OP, err))?;
            Ok(deleted > 0)
        })
        .await
        .map_err(Into::into)
    }
}
