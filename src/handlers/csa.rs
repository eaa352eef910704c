use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::bundle::{ApprovalStatus, Bundle, BundleDraft, StatusBadge, StatusFilter};
use crate::domain::session::{Role, Session};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BoardQuery {
    /// `all`, `pending` or `approved`. Defaults to `all`.
    #[serde(default)]
    pub status: StatusFilter,
    /// Matched against bundle title and club name.
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveRequest {
    #[serde(default = "default_visibility")]
    pub visibility: bool,
}

fn default_visibility() -> bool {
    true
}

/// Actions the detail view offers for a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BundleAction {
    ApproveVisible,
    ApproveHidden,
    Hide,
    Show,
}

pub fn available_actions(bundle: &Bundle) -> Vec<BundleAction> {
    match (bundle.approval_status, bundle.visibility) {
        (ApprovalStatus::Pending, _) => {
            vec![BundleAction::ApproveVisible, BundleAction::ApproveHidden]
        }
        (ApprovalStatus::Approved, true) => vec![BundleAction::Hide],
        (ApprovalStatus::Approved, false) => vec![BundleAction::Show],
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardEntry {
    pub badge: StatusBadge,
    #[serde(flatten)]
    pub bundle: Bundle,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoardResponse {
    pub count: usize,
    pub bundles: Vec<BoardEntry>,
}

impl BoardResponse {
    fn from_bundles(bundles: Vec<Bundle>) -> Self {
        let bundles: Vec<BoardEntry> = bundles
            .into_iter()
            .map(|bundle| BoardEntry {
                badge: bundle.status_badge(),
                bundle,
            })
            .collect();
        Self {
            count: bundles.len(),
            bundles,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BundleDetail {
    pub badge: StatusBadge,
    pub actions: Vec<BundleAction>,
    pub bundle: Bundle,
}

fn csa_session(state: &AppState) -> Result<Session, AppError> {
    state.session.require(Role::Csa).map_err(AppError::from)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /csa-portal/bundles
///
/// Re-reads the board from the API for the chosen status, then narrows it by
/// the search term.
#[utoipa::path(
    get,
    path = "/csa-portal/bundles",
    params(BoardQuery),
    responses(
        (status = 200, description = "Filtered bundle board", body = BoardResponse),
        (status = 303, description = "Not signed in as CSA"),
        (status = 502, description = "API failure"),
    ),
    tag = "csa"
)]
pub async fn list_bundles(
    state: web::Data<AppState>,
    query: web::Query<BoardQuery>,
) -> Result<HttpResponse, AppError> {
    let session = csa_session(&state)?;
    let BoardQuery { status, search } = query.into_inner();
    let bundles = state
        .review
        .list(&session.token, status, &search)
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(BoardResponse::from_bundles(bundles)))
}

/// GET /csa-portal/bundles/{id}
#[utoipa::path(
    get,
    path = "/csa-portal/bundles/{id}",
    params(("id" = String, Path, description = "Bundle identifier")),
    responses(
        (status = 200, description = "Bundle detail", body = BundleDetail),
        (status = 404, description = "Bundle not found"),
    ),
    tag = "csa"
)]
pub async fn get_bundle(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = csa_session(&state)?;
    let bundle = state
        .review
        .detail(&session.token, &path.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(BundleDetail {
        badge: bundle.status_badge(),
        actions: available_actions(&bundle),
        bundle,
    }))
}

/// PUT /csa-portal/bundles/{id}
#[utoipa::path(
    put,
    path = "/csa-portal/bundles/{id}",
    params(("id" = String, Path, description = "Bundle identifier")),
    request_body = BundleDraft,
    responses(
        (status = 200, description = "Bundle updated", body = Bundle),
        (status = 400, description = "Draft failed validation"),
    ),
    tag = "csa"
)]
pub async fn edit_bundle(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BundleDraft>,
) -> Result<HttpResponse, AppError> {
    let session = csa_session(&state)?;
    let bundle = state
        .review
        .edit(&session.token, &path.into_inner(), body.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(bundle))
}

/// POST /csa-portal/bundles/{id}/approve
///
/// Approves the bundle, visible or hidden, and returns the refreshed board.
#[utoipa::path(
    post,
    path = "/csa-portal/bundles/{id}/approve",
    params(("id" = String, Path, description = "Bundle identifier")),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Approved; refreshed board", body = BoardResponse),
        (status = 409, description = "An approval is already running"),
    ),
    tag = "csa"
)]
pub async fn approve_bundle(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ApproveRequest>,
) -> Result<HttpResponse, AppError> {
    let session = csa_session(&state)?;
    state
        .review
        .approve(&session.token, &path.into_inner(), body.visibility)
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(BoardResponse::from_bundles(state.review.cached(""))))
}

/// POST /csa-portal/bundles/{id}/visibility
#[utoipa::path(
    post,
    path = "/csa-portal/bundles/{id}/visibility",
    params(("id" = String, Path, description = "Bundle identifier")),
    responses(
        (status = 200, description = "Toggled; refreshed board", body = BoardResponse),
        (status = 409, description = "A toggle is already running"),
    ),
    tag = "csa"
)]
pub async fn toggle_visibility(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = csa_session(&state)?;
    state
        .review
        .toggle_visibility(&session.token, &path.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(BoardResponse::from_bundles(state.review.cached(""))))
}
