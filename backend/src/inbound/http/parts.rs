//! Part lifecycle API handlers.
//!
//! ```text
//! POST /api/planes/{id}/parts
//! GET /api/planes/{id}/parts?category=engine
//! GET /api/planes/parts
//! GET|PUT|DELETE /api/planes/parts/{part_id}
//! PUT /api/planes/parts/{part_id}/usage {"usage_hours":450}
//! GET /api/planes/maintenance/alerts?threshold=80
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Category, Error, NewPart, PartChanges, PartId, PartName, PlaneId, Principal, Role,
    SerialNumber, UsageHours, UsageLimitHours,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PartResponse, part_views};
use crate::inbound::http::planes::plane_id;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_threshold, part_validation_error, text_length_error,
};

/// Body for installing a part on a plane.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AddPartRequest {
    #[schema(example = "Left engine")]
    pub part_name: String,
    #[schema(example = "ENG-0001")]
    pub serial_number: String,
    #[schema(example = "engine")]
    pub category: String,
    /// Hours already consumed. Defaults to zero.
    #[serde(default)]
    pub usage_hours: Option<f64>,
    #[schema(example = 500.0)]
    pub usage_limit_hours: f64,
}

/// Partial details update. Usage hours go through the usage endpoint.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdatePartRequest {
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub usage_limit_hours: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUsageRequest {
    #[schema(example = 450.0)]
    pub usage_hours: f64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Only return parts in this category.
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThresholdQuery {
    /// Percentage of the limit, 0 to 100. Defaults to 80.
    pub threshold: Option<String>,
}

impl AddPartRequest {
    fn into_new_part(self, plane_id: PlaneId) -> Result<NewPart, Error> {
        Ok(NewPart {
            plane_id,
            part_name: PartName::new(&self.part_name).map_err(text_length_error)?,
            serial_number: SerialNumber::new(&self.serial_number).map_err(text_length_error)?,
            category: Category::new(&self.category).map_err(text_length_error)?,
            usage_hours: UsageHours::new(self.usage_hours.unwrap_or(0.0))
                .map_err(part_validation_error)?,
            usage_limit_hours: UsageLimitHours::new(self.usage_limit_hours)
                .map_err(part_validation_error)?,
        })
    }
}

impl TryFrom<UpdatePartRequest> for PartChanges {
    type Error = Error;

    fn try_from(value: UpdatePartRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            part_name: value
                .part_name
                .map(PartName::new)
                .transpose()
                .map_err(text_length_error)?,
            serial_number: value
                .serial_number
                .map(SerialNumber::new)
                .transpose()
                .map_err(text_length_error)?,
            category: value
                .category
                .map(Category::new)
                .transpose()
                .map_err(text_length_error)?,
            usage_limit_hours: value
                .usage_limit_hours
                .map(UsageLimitHours::new)
                .transpose()
                .map_err(part_validation_error)?,
        })
    }
}

fn part_id(raw: &str) -> Result<PartId, Error> {
    parse_id(raw, FieldName::new("partId"), "invalid part ID").map(PartId::new)
}

/// An empty `category` query behaves as no filter.
fn category_filter(raw: Option<String>) -> Result<Option<Category>, Error> {
    raw.filter(|value| !value.trim().is_empty())
        .map(Category::new)
        .transpose()
        .map_err(text_length_error)
}

/// Install a part on a plane.
#[utoipa::path(
    post,
    path = "/api/planes/{id}/parts",
    params(("id" = i64, Path, description = "Plane identifier")),
    request_body = AddPartRequest,
    responses(
        (status = 201, description = "Part installed", body = PartResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Plane not found", body = ErrorSchema),
        (status = 409, description = "Serial number already installed", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "addPart"
)]
#[post("/planes/{id}/parts")]
pub async fn add_part(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
    payload: web::Json<AddPartRequest>,
) -> ApiResult<HttpResponse> {
    let plane_id = plane_id(&path)?;
    let part = payload.into_inner().into_new_part(plane_id)?;
    let created = state.parts.add_part(part).await?;
    Ok(HttpResponse::Created().json(PartResponse::from(&created)))
}

#[utoipa::path(
    get,
    path = "/api/planes/{id}/parts",
    params(("id" = i64, Path, description = "Plane identifier"), CategoryQuery),
    responses(
        (status = 200, description = "Parts on the plane, ordered by id", body = [PartResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Plane not found", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "getPartsByPlane"
)]
#[get("/planes/{id}/parts")]
pub async fn get_parts_by_plane(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
    query: web::Query<CategoryQuery>,
) -> ApiResult<web::Json<Vec<PartResponse>>> {
    let plane_id = plane_id(&path)?;
    let category = category_filter(query.into_inner().category)?;
    let parts = state.parts.get_parts_by_plane(plane_id, category).await?;
    Ok(web::Json(part_views(&parts)))
}

#[utoipa::path(
    get,
    path = "/api/planes/parts",
    responses(
        (status = 200, description = "Every installed part", body = [PartResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "getAllParts"
)]
#[get("/planes/parts")]
pub async fn get_all_parts(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<PartResponse>>> {
    let parts = state.parts.get_all_parts().await?;
    Ok(web::Json(part_views(&parts)))
}

#[utoipa::path(
    get,
    path = "/api/planes/parts/{part_id}",
    params(("part_id" = i64, Path, description = "Part identifier")),
    responses(
        (status = 200, description = "Part", body = PartResponse),
        (status = 400, description = "Invalid part ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Part not found", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "getPart"
)]
#[get("/planes/parts/{part_id}")]
pub async fn get_part(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<web::Json<PartResponse>> {
    let id = part_id(&path)?;
    let part = state.parts.get_part(id).await?;
    Ok(web::Json(PartResponse::from(&part)))
}

#[utoipa::path(
    put,
    path = "/api/planes/parts/{part_id}",
    params(("part_id" = i64, Path, description = "Part identifier")),
    request_body = UpdatePartRequest,
    responses(
        (status = 200, description = "Updated part", body = PartResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Part not found", body = ErrorSchema),
        (status = 409, description = "Serial number already installed", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "updatePart"
)]
#[put("/planes/parts/{part_id}")]
pub async fn update_part(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
    payload: web::Json<UpdatePartRequest>,
) -> ApiResult<web::Json<PartResponse>> {
    let id = part_id(&path)?;
    let changes = PartChanges::try_from(payload.into_inner())?;
    let part = state.parts.update_part(id, changes).await?;
    Ok(web::Json(PartResponse::from(&part)))
}

/// Record accumulated usage. Mechanics and admins only.
#[utoipa::path(
    put,
    path = "/api/planes/parts/{part_id}/usage",
    params(("part_id" = i64, Path, description = "Part identifier")),
    request_body = UpdateUsageRequest,
    responses(
        (status = 200, description = "Updated part", body = PartResponse),
        (status = 400, description = "Invalid usage or limit exceeded", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Mechanic role required", body = ErrorSchema),
        (status = 404, description = "Part not found", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "updatePartUsage"
)]
#[put("/planes/parts/{part_id}/usage")]
pub async fn update_part_usage(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
    payload: web::Json<UpdateUsageRequest>,
) -> ApiResult<web::Json<PartResponse>> {
    principal.authorize(Role::Mechanic)?;
    let id = part_id(&path)?;
    let hours = UsageHours::new(payload.usage_hours).map_err(part_validation_error)?;
    let part = state.parts.update_part_usage(id, hours).await?;
    info!(part_id = %id, usage_hours = hours.get(), user_id = %principal.user_id, "part usage recorded");
    Ok(web::Json(PartResponse::from(&part)))
}

#[utoipa::path(
    delete,
    path = "/api/planes/parts/{part_id}",
    params(("part_id" = i64, Path, description = "Part identifier")),
    responses(
        (status = 204, description = "Part removed"),
        (status = 400, description = "Invalid part ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Part not found", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "deletePart"
)]
#[delete("/planes/parts/{part_id}")]
pub async fn delete_part(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = part_id(&path)?;
    state.parts.delete_part(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Parts at or above the threshold percentage, highest usage first.
#[utoipa::path(
    get,
    path = "/api/planes/maintenance/alerts",
    params(ThresholdQuery),
    responses(
        (status = 200, description = "Parts due for maintenance", body = [PartResponse]),
        (status = 400, description = "Invalid threshold value", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["parts"],
    operation_id = "getMaintenanceAlerts"
)]
#[get("/planes/maintenance/alerts")]
pub async fn maintenance_alerts(
    state: web::Data<HttpState>,
    _principal: Principal,
    query: web::Query<ThresholdQuery>,
) -> ApiResult<web::Json<Vec<PartResponse>>> {
    let threshold = parse_threshold(query.threshold.as_deref())?;
    let parts = state.parts.get_parts_needing_maintenance(threshold).await?;
    Ok(web::Json(part_views(&parts)))
}
