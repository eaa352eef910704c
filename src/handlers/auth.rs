use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::session::{Credentials, User};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    /// Portal the user should be taken to.
    pub redirect: String,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

/// GET /
///
/// Sends the browser to the portal matching the stored role, or to the login
/// route when nobody is signed in.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 303, description = "Redirect to login or the role's portal")),
    tag = "session"
)]
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    match state.session.current() {
        Some(session) => see_other(session.role().portal_path()),
        None => see_other("/login"),
    }
}

/// GET /login
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Current session", body = SessionStatus)),
    tag = "session"
)]
pub async fn session_status(state: web::Data<AppState>) -> HttpResponse {
    let user = state.session.current().map(|s| s.user);
    HttpResponse::Ok().json(SessionStatus {
        authenticated: user.is_some(),
        user,
    })
}

/// POST /login
///
/// Authenticates against the merchandise API and persists the returned
/// session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "A field is empty"),
        (status = 401, description = "Credentials rejected"),
        (status = 502, description = "API unreachable"),
    ),
    tag = "session"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    let session = state
        .auth
        .login(body.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        redirect: session.role().portal_path().to_string(),
        user: session.user,
    }))
}

/// POST /logout
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 303, description = "Session cleared; back to login")),
    tag = "session"
)]
pub async fn logout(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.auth.logout().map_err(|e| state.surface(e))?;
    Ok(see_other("/login"))
}

/// GET /unauthorized
#[utoipa::path(
    get,
    path = "/unauthorized",
    responses((status = 403, description = "Signed in with a role that cannot open the portal")),
    tag = "session"
)]
pub async fn unauthorized() -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "error": "Unauthorized Access",
        "detail": "You don't have permission to access this portal.",
        "login": "/logout"
    }))
}
