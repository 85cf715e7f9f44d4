//! Response bodies shared by the user, plane and part handlers.
//!
//! Domain records never serialise directly. These views drop the password
//! digest and attach the derived `usage_percent` to every part.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Part, Plane, PlaneWithParts, User};

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "mechanic")]
    pub role: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at,
        }
    }
}

/// Body returned by a successful login. The token is also set as a cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "logged out successfully")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaneResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "N12345")]
    pub tail_number: String,
    #[schema(example = "737")]
    pub model: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<&Plane> for PlaneResponse {
    fn from(plane: &Plane) -> Self {
        Self {
            id: plane.id.get(),
            tail_number: plane.tail_number.as_str().to_owned(),
            model: plane.model.as_str().to_owned(),
            created_at: plane.created_at,
        }
    }
}

/// Part view with the derived usage percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartResponse {
    pub id: i64,
    pub plane_id: i64,
    #[schema(example = "Left engine")]
    pub part_name: String,
    #[schema(example = "ENG-0001")]
    pub serial_number: String,
    #[schema(example = "engine")]
    pub category: String,
    #[schema(example = 450.0)]
    pub usage_hours: f64,
    #[schema(example = 500.0)]
    pub usage_limit_hours: f64,
    /// `usage_hours / usage_limit_hours * 100`.
    #[schema(example = 90.0)]
    pub usage_percent: f64,
    #[schema(value_type = String, format = DateTime)]
    pub installed_at: DateTime<Utc>,
}

impl From<&Part> for PartResponse {
    fn from(part: &Part) -> Self {
        Self {
            id: part.id.get(),
            plane_id: part.plane_id.get(),
            part_name: part.part_name.as_str().to_owned(),
            serial_number: part.serial_number.as_str().to_owned(),
            category: part.category.as_str().to_owned(),
            usage_hours: part.usage_hours.get(),
            usage_limit_hours: part.usage_limit_hours.get(),
            usage_percent: part.usage_percent(),
            installed_at: part.installed_at,
        }
    }
}

pub(crate) fn part_views(parts: &[Part]) -> Vec<PartResponse> {
    parts.iter().map(PartResponse::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaneWithPartsResponse {
    pub plane: PlaneResponse,
    pub parts: Vec<PartResponse>,
}

impl From<&PlaneWithParts> for PlaneWithPartsResponse {
    fn from(value: &PlaneWithParts) -> Self {
        Self {
            plane: PlaneResponse::from(&value.plane),
            parts: part_views(&value.parts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{part, user};
    use rstest::rstest;

    #[rstest]
    fn user_view_never_carries_the_digest() {
        let body = serde_json::to_value(UserResponse::from(&user(3, "bob", Role::Admin)))
            .expect("serialise");
        assert_eq!(body["role"], "admin");
        assert!(body.get("password_digest").is_none());
        assert!(body.get("password").is_none());
    }

    #[rstest]
    #[case(45.0, 60.0, 75.0)]
    #[case(0.0, 10.0, 0.0)]
    #[case(500.0, 500.0, 100.0)]
    fn part_view_derives_usage_percent(
        #[case] hours: f64,
        #[case] limit: f64,
        #[case] expected: f64,
    ) {
        let view = PartResponse::from(&part(1, 1, hours, limit));
        assert_eq!(view.usage_percent, expected);
    }
}
