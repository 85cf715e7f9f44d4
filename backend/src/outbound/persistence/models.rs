//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain records, re-validating every field on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{plane_parts, planes, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub password_digest: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub password_digest: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub password_digest: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = planes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaneRow {
    pub id: i64,
    pub tail_number: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = planes)]
pub(crate) struct PlaneFields<'a> {
    pub tail_number: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = plane_parts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PartRow {
    pub id: i64,
    pub plane_id: i64,
    pub part_name: String,
    pub serial_number: String,
    pub category: String,
    pub usage_hours: f64,
    pub usage_limit_hours: f64,
    pub installed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plane_parts)]
pub(crate) struct NewPartRow<'a> {
    pub plane_id: i64,
    pub part_name: &'a str,
    pub serial_number: &'a str,
    pub category: &'a str,
    pub usage_hours: f64,
    pub usage_limit_hours: f64,
}

/// Details changeset. `usage_hours` is written only by the usage update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = plane_parts)]
pub(crate) struct PartDetailsUpdate<'a> {
    pub part_name: &'a str,
    pub serial_number: &'a str,
    pub category: &'a str,
    pub usage_limit_hours: f64,
}
