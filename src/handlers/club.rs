use actix_web::http::header::{ContentDisposition, CONTENT_TYPE};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::application::bundle_editor::{ImageKind, UploadedImage};
use crate::application::order_export::CSV_CONTENT_TYPE;
use crate::domain::bundle::{Bundle, BundleDraft};
use crate::domain::reconcile::OrderReport;
use crate::domain::session::{Role, Session};
use crate::errors::AppError;
use crate::state::AppState;

fn club_session(state: &AppState) -> Result<Session, AppError> {
    state.session.require(Role::ClubCoordinator).map_err(AppError::from)
}

/// GET /club-coordinator/bundles
#[utoipa::path(
    get,
    path = "/club-coordinator/bundles",
    responses(
        (status = 200, description = "The club's bundles", body = [Bundle]),
        (status = 303, description = "Not signed in as a club coordinator"),
        (status = 502, description = "API failure"),
    ),
    tag = "club"
)]
pub async fn list_bundles(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = club_session(&state)?;
    let bundles = state
        .editor
        .list(&session.token)
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(bundles))
}

/// POST /club-coordinator/bundles
///
/// Validates the draft locally before anything is sent to the API.
#[utoipa::path(
    post,
    path = "/club-coordinator/bundles",
    request_body = BundleDraft,
    responses(
        (status = 201, description = "Bundle created", body = Bundle),
        (status = 400, description = "Draft failed validation"),
        (status = 409, description = "A submission is already running"),
    ),
    tag = "club"
)]
pub async fn create_bundle(
    state: web::Data<AppState>,
    body: web::Json<BundleDraft>,
) -> Result<HttpResponse, AppError> {
    let session = club_session(&state)?;
    let bundle = state
        .editor
        .create(&session.token, body.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Created().json(bundle))
}

/// GET /club-coordinator/bundles/{id}
#[utoipa::path(
    get,
    path = "/club-coordinator/bundles/{id}",
    params(("id" = String, Path, description = "Bundle identifier")),
    responses(
        (status = 200, description = "Bundle found", body = Bundle),
        (status = 404, description = "Bundle not found"),
    ),
    tag = "club"
)]
pub async fn get_bundle(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = club_session(&state)?;
    let bundle = state
        .editor
        .fetch(&session.token, &path.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(bundle))
}

/// PUT /club-coordinator/bundles/{id}
#[utoipa::path(
    put,
    path = "/club-coordinator/bundles/{id}",
    params(("id" = String, Path, description = "Bundle identifier")),
    request_body = BundleDraft,
    responses(
        (status = 200, description = "Bundle updated", body = Bundle),
        (status = 400, description = "Draft failed validation"),
    ),
    tag = "club"
)]
pub async fn edit_bundle(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BundleDraft>,
) -> Result<HttpResponse, AppError> {
    let session = club_session(&state)?;
    let bundle = state
        .editor
        .edit(&session.token, &path.into_inner(), body.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(bundle))
}

/// POST /club-coordinator/uploads/{kind}/{file}
///
/// The request body is the raw image; its `Content-Type` is passed on to
/// object storage. `kind` is `merch` or `size-chart`.
#[utoipa::path(
    post,
    path = "/club-coordinator/uploads/{kind}/{file}",
    params(
        ("kind" = String, Path, description = "merch or size-chart"),
        ("file" = String, Path, description = "Original file name"),
    ),
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = 201, description = "Stored; public URL returned", body = UploadedImage),
        (status = 400, description = "Not an image, or empty"),
    ),
    tag = "club"
)]
pub async fn upload_image(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    club_session(&state)?;
    let (kind, file_name) = path.into_inner();
    let kind: ImageKind = kind.parse()?;
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let uploaded = state
        .editor
        .upload_image(kind, &file_name, content_type, body.to_vec())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Created().json(uploaded))
}

/// GET /club-coordinator/bundles/{id}/orders
///
/// Per-order rows and per-item totals, direct and combo purchases merged.
#[utoipa::path(
    get,
    path = "/club-coordinator/bundles/{id}/orders",
    params(("id" = String, Path, description = "Bundle identifier")),
    responses(
        (status = 200, description = "Order report", body = OrderReport),
        (status = 502, description = "API failure"),
    ),
    tag = "club"
)]
pub async fn order_report(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = club_session(&state)?;
    let report = state
        .exporter
        .report(&session.token, &path.into_inner())
        .await
        .map_err(|e| state.surface(e))?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /club-coordinator/bundles/{id}/orders/export
///
/// CSV download. Answers 204 when the bundle has no orders.
#[utoipa::path(
    get,
    path = "/club-coordinator/bundles/{id}/orders/export",
    params(("id" = String, Path, description = "Bundle identifier")),
    responses(
        (status = 200, description = "CSV file", body = String, content_type = "text/csv"),
        (status = 204, description = "No orders to export"),
    ),
    tag = "club"
)]
pub async fn export_orders(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = club_session(&state)?;
    let export = state
        .exporter
        .export(&session.token, &path.into_inner())
        .await
        .map_err(|e| state.surface(e))?;

    Ok(match export {
        Some(export) => HttpResponse::Ok()
            .content_type(CSV_CONTENT_TYPE)
            .insert_header(ContentDisposition::attachment(export.filename))
            .body(export.body),
        None => HttpResponse::NoContent().finish(),
    })
}
