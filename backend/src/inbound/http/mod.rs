//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`api_scope`] mounts every `/api` route. Literal path segments are
//! registered ahead of the `{id}` captures they would otherwise shadow.

use actix_web::{Scope, web};

use crate::domain::Error;

pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod parts;
pub mod planes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Build the `/api` scope with JSON and query rejections mapped onto
/// `invalid_request`.
pub fn api_scope() -> Scope {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| Error::invalid_request(err.to_string()).into());
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| Error::invalid_request(err.to_string()).into());

    web::scope("/api")
        .app_data(json_config)
        .app_data(query_config)
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(parts::maintenance_alerts)
        .service(parts::get_all_parts)
        .service(parts::get_part)
        .service(parts::update_part_usage)
        .service(parts::update_part)
        .service(parts::delete_part)
        .service(planes::get_plane_by_tail)
        .service(parts::get_parts_by_plane)
        .service(parts::add_part)
        .service(planes::get_plane_with_parts)
        .service(planes::list_planes)
        .service(planes::create_plane)
        .service(planes::get_plane)
        .service(planes::update_plane)
        .service(planes::delete_plane)
}
