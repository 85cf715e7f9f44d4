//! Access gate for protected handlers.
//!
//! [`Principal`] is extracted from the `auth_token` cookie, falling back to
//! an `Authorization: Bearer` header. Handlers that take a `Principal`
//! argument therefore never run for unauthenticated requests.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::ports::TokenError;
use crate::domain::{Error, Principal};

use super::state::HttpState;

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "auth_token";

fn cookie_token(req: &HttpRequest) -> Option<String> {
    req.cookie(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

fn map_token_error(err: TokenError) -> Error {
    match err {
        TokenError::Expired | TokenError::Invalid => Error::unauthorized(err.to_string()),
        TokenError::Signing { .. } => {
            error!(error = %err, "token verification failed unexpectedly");
            Error::internal(err.to_string())
        }
    }
}

fn resolve_principal(req: &HttpRequest) -> Result<Principal, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = cookie_token(req)
        .or_else(|| bearer_token(req))
        .ok_or_else(|| Error::unauthorized("authentication required"))?;
    let principal = state.tokens.verify(&token).map_err(|err| {
        debug!(error = %err, "token rejected");
        map_token_error(err)
    })?;
    debug!(user_id = %principal.user_id, role = %principal.role, "request authenticated");
    Ok(principal)
}

impl FromRequest for Principal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_principal(req))
    }
}

/// Session cookie set on login. Lives as long as the token itself.
pub(crate) fn auth_cookie(token: String, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::None)
        .max_age(Duration::seconds(ttl_seconds))
        .finish()
}

/// Cookie that clears the session on logout.
pub(crate) fn cleared_auth_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::None)
        .max_age(Duration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use crate::inbound::http::test_utils::{MockPorts, VALID_TOKEN, principal};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    async fn whoami(principal: Principal) -> HttpResponse {
        HttpResponse::Ok().body(principal.name)
    }

    async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, String) {
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_state())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let res = actix_test::call_service(&app, request.uri("/whoami").to_request()).await;
        let status = res.status();
        let body = actix_test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[actix_web::test]
    async fn bearer_header_authenticates() {
        let ports = MockPorts::authenticated_as(principal(Role::User));
        let request = actix_test::TestRequest::get()
            .insert_header((AUTHORIZATION, format!("Bearer {VALID_TOKEN}")));
        let (status, body) = call(ports, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[actix_web::test]
    async fn cookie_is_checked_before_the_header() {
        let ports = MockPorts::authenticated_as(principal(Role::User));
        let request = actix_test::TestRequest::get()
            .cookie(Cookie::new(AUTH_COOKIE, VALID_TOKEN))
            .insert_header((AUTHORIZATION, "Bearer something-else"));
        let (status, _) = call(ports, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic abc"))]
    #[case(Some("Bearer "))]
    #[actix_web::test]
    async fn missing_tokens_require_authentication(#[case] header: Option<&str>) {
        let mut request = actix_test::TestRequest::get();
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value.to_owned()));
        }
        let (status, body) = call(MockPorts::default(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("authentication required"));
    }

    #[actix_web::test]
    async fn expired_tokens_are_unauthorised() {
        let mut ports = MockPorts::default();
        ports
            .tokens
            .expect_verify()
            .returning(|_| Err(TokenError::expired()));
        let request =
            actix_test::TestRequest::get().insert_header((AUTHORIZATION, "Bearer stale-token"));
        let (status, body) = call(ports, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("token has expired"));
    }

    #[rstest]
    #[case(TokenError::invalid(), ErrorCode::Unauthorized)]
    #[case(TokenError::expired(), ErrorCode::Unauthorized)]
    #[case(TokenError::signing("key"), ErrorCode::InternalError)]
    fn token_errors_map_to_codes(#[case] err: TokenError, #[case] expected: ErrorCode) {
        assert_eq!(map_token_error(err).code(), expected);
    }

    #[rstest]
    fn login_cookie_lives_as_long_as_the_token() {
        let cookie = auth_cookie("t".to_owned(), 86_400, true);
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.max_age(), Some(Duration::seconds(86_400)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[rstest]
    fn logout_cookie_expires_immediately() {
        let cookie = cleared_auth_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
