//! Fleet API handlers.
//!
//! ```text
//! POST /api/planes {"tail_number":"N12345","model":"737"}
//! GET /api/planes
//! GET /api/planes/tail/{tail_number}
//! GET|PUT|DELETE /api/planes/{id}
//! GET /api/planes/{id}/with-parts
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, NewPlane, PlaneChanges, PlaneId, PlaneModel, Principal, TailNumber};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PlaneResponse, PlaneWithPartsResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, text_length_error};

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreatePlaneRequest {
    #[schema(example = "N12345")]
    pub tail_number: String,
    #[schema(example = "737")]
    pub model: String,
}

/// Partial plane update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdatePlaneRequest {
    #[serde(default)]
    pub tail_number: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl TryFrom<CreatePlaneRequest> for NewPlane {
    type Error = Error;

    fn try_from(value: CreatePlaneRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            tail_number: TailNumber::new(&value.tail_number).map_err(text_length_error)?,
            model: PlaneModel::new(&value.model).map_err(text_length_error)?,
        })
    }
}

impl TryFrom<UpdatePlaneRequest> for PlaneChanges {
    type Error = Error;

    fn try_from(value: UpdatePlaneRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            tail_number: value
                .tail_number
                .map(TailNumber::new)
                .transpose()
                .map_err(text_length_error)?,
            model: value
                .model
                .map(PlaneModel::new)
                .transpose()
                .map_err(text_length_error)?,
        })
    }
}

pub(crate) fn plane_id(raw: &str) -> Result<PlaneId, Error> {
    parse_id(raw, FieldName::new("id"), "invalid plane ID").map(PlaneId::new)
}

/// Register an aircraft.
#[utoipa::path(
    post,
    path = "/api/planes",
    request_body = CreatePlaneRequest,
    responses(
        (status = 201, description = "Plane created", body = PlaneResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Tail number already registered", body = ErrorSchema)
    ),
    tags = ["planes"],
    operation_id = "createPlane"
)]
#[post("/planes")]
pub async fn create_plane(
    state: web::Data<HttpState>,
    _principal: Principal,
    payload: web::Json<CreatePlaneRequest>,
) -> ApiResult<HttpResponse> {
    let plane = NewPlane::try_from(payload.into_inner())?;
    let created = state.fleet.create_plane(plane).await?;
    Ok(HttpResponse::Created().json(PlaneResponse::from(&created)))
}

#[utoipa::path(
    get,
    path = "/api/planes",
    responses(
        (status = 200, description = "Every plane, ordered by id", body = [PlaneResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["planes"],
    operation_id = "listPlanes"
)]
#[get("/planes")]
pub async fn list_planes(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<PlaneResponse>>> {
    let planes = state.fleet.get_all_planes().await?;
    Ok(web::Json(planes.iter().map(PlaneResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/planes/tail/{tail_number}",
    params(("tail_number" = String, Path, description = "Registration mark")),
    responses(
        (status = 200, description = "Plane", body = PlaneResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Plane not found", body = ErrorSchema)
    ),
    tags = ["planes"],
    operation_id = "getPlaneByTail"
)]
#[get("/planes/tail/{tail_number}")]
pub async fn get_plane_by_tail(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaneResponse>> {
    let tail_number = TailNumber::new(path.as_str()).map_err(text_length_error)?;
    let plane = state.fleet.get_plane_by_tail(&tail_number).await?;
    Ok(web::Json(PlaneResponse::from(&plane)))
}

/// A plane with every part installed on it.
#[utoipa::path(
    get,
    path = "/api/planes/{id}/with-parts",
    params(("id" = i64, Path, description = "Plane identifier")),
    responses(
        (status = 200, description = "Plane and parts", body = PlaneWithPartsResponse),
        (status = 400, description = "Invalid plane ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Plane not found", body = ErrorSchema)
    ),
    tags = ["planes"],
    operation_id = "getPlaneWithParts"
)]
#[get("/planes/{id}/with-parts")]
pub async fn get_plane_with_parts(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaneWithPartsResponse>> {
    let id = plane_id(&path)?;
    let view = state.parts.get_plane_with_parts(id).await?;
    Ok(web::Json(PlaneWithPartsResponse::from(&view)))
}

#[utoipa::path(
    get,
    path = "/api/planes/{id}",
    params(("id" = i64, Path, description = "Plane identifier")),
    responses(
        (status = 200, description = "Plane", body = PlaneResponse),
        (status = 400, description = "Invalid plane ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Plane not found", body = ErrorSchema)
    ),
    tags = ["planes"],
    operation_id = "getPlane"
)]
#[get("/planes/{id}")]
pub async fn get_plane(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaneResponse>> {
    let id = plane_id(&path)?;
    let plane = state.fleet.get_plane(id).await?;
    Ok(web::Json(PlaneResponse::from(&plane)))
}

#[utoipa::path(
    put,
    path = "/api/planes/{id}",
    params(("id" = i64, Path, description = "Plane identifier")),
    request_body = UpdatePlaneRequest,
    responses(
        (status = 200, description = "Updated plane", body = PlaneResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Plane not found", body = ErrorSchema),
        (status = 409, description = "Tail number already registered", body = ErrorSchema)
    ),
    tags = ["planes"],
    operation_id = "updatePlane"
)]
#[put("/planes/{id}")]
pub async fn update_plane(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
    payload: web::Json<UpdatePlaneRequest>,
) -> ApiResult<web::Json<PlaneResponse>> {
    let id = plane_id(&path)?;
    let changes = PlaneChanges::try_from(payload.into_inner())?;
    let plane = state.fleet.update_plane(id, changes).await?;
    Ok(web::Json(PlaneResponse::from(&plane)))
}

/// Delete a plane. Its parts are left in place.
#[utoipa::path(
    delete,
    path = "/api/planes/{id}",
    params(("id" = i64, Path, description = "Plane identifier")),
    responses(
        (status = 204, description = "Plane deleted"),
        (status = 400, description = "Invalid plane ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Plane not found", body = ErrorSchema)
    ),
    tags = ["planes"],
    operation_id = "deletePlane"
)]
#[delete("/planes/{id}")]
pub async fn delete_plane(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = plane_id(&path)?;
    state.fleet.delete_plane(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
