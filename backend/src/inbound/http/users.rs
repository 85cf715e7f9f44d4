//! Users API handlers.
//!
//! ```text
//! POST /api/users/register {"name":"alice","password":"secret1"}
//! POST /api/users/login {"name":"alice","password":"secret1"}
//! POST /api/users/logout
//! GET /api/users/me
//! GET /api/users
//! GET|PUT|DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    Error, ErrorCode, LoginCredentials, LoginValidationError, Password, Principal, Registration,
    Role, UserChanges, UserId, UserName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{auth_cookie, cleared_auth_cookie};
use crate::inbound::http::dto::{LoginResponse, MessageResponse, UserResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, empty_field_error, parse_id, registration_role, update_role, user_validation_error,
};

/// Registration body for `POST /api/users/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "secret1")]
    pub password: String,
    /// One of `user`, `mechanic` or `admin`. Defaults to `user`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Login body for `POST /api/users/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "secret1")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.password)
    }
}

/// Partial account update. Blank or absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// One of `user` or `admin`; changing it requires the admin role.
    #[serde(default)]
    pub role: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: UserName::new(&value.name).map_err(user_validation_error)?,
            password: Password::new(value.password).map_err(user_validation_error)?,
            role: registration_role(value.role.as_deref())?,
        })
    }
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: non_blank(value.name)
                .map(UserName::new)
                .transpose()
                .map_err(user_validation_error)?,
            password: non_blank(value.password)
                .map(Password::new)
                .transpose()
                .map_err(user_validation_error)?,
            role: update_role(value.role.as_deref())?,
        })
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyName => empty_field_error(FieldName::new("name")),
        LoginValidationError::EmptyPassword => empty_field_error(FieldName::new("password")),
    }
}

fn user_id(raw: &str) -> Result<UserId, Error> {
    parse_id(raw, FieldName::new("id"), "invalid user ID").map(UserId::new)
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.users.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Verify credentials, set the `auth_token` cookie and return the token.
///
/// Unknown names and wrong passwords are indistinguishable to the client.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "auth_token session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let outcome = state
        .users
        .login(&credentials)
        .await
        .map_err(|err| match err.code() {
            ErrorCode::NotFound => {
                warn!("login rejected: unknown user");
                Error::unauthorized("invalid credentials")
            }
            _ => err,
        })?;
    let cookie = auth_cookie(
        outcome.token.clone(),
        outcome.ttl_seconds,
        state.cookie_secure,
    );
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        user: UserResponse::from(&outcome.user),
        token: outcome.token,
    }))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/users/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_auth_cookie(state.cookie_secure))
        .json(MessageResponse {
            message: "logged out successfully".to_owned(),
        })
}

/// The authenticated caller's own account.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    principal: Principal,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.get_me(&principal).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.get_all().await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid user ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_id(&path)?;
    let user = state.users.get_by_id(id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Update an account. Callers may edit themselves; admins may edit anyone
/// and are the only ones allowed to change a role.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_id(&path)?;
    principal.authorize_self_or_admin(id)?;
    let changes = UserChanges::try_from(payload.into_inner())?;
    if changes.role.is_some() {
        principal.authorize(Role::Admin)?;
    }
    let user = state.users.update(id, changes).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Delete an account. Admin only.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid user ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    principal.authorize(Role::Admin)?;
    state.users.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
