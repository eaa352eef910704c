use actix_web::{web, HttpResponse};

use crate::application::notice::Notice;
use crate::state::AppState;

/// GET /notice
///
/// The error banner, if one is still showing.
#[utoipa::path(
    get,
    path = "/notice",
    responses(
        (status = 200, description = "Banner is showing", body = Notice),
        (status = 204, description = "Nothing to show"),
    ),
    tag = "notice"
)]
pub async fn current(state: web::Data<AppState>) -> HttpResponse {
    match state.notices.current() {
        Some(notice) => HttpResponse::Ok().json(notice),
        None => HttpResponse::NoContent().finish(),
    }
}

/// DELETE /notice
#[utoipa::path(
    delete,
    path = "/notice",
    responses((status = 204, description = "Banner dismissed")),
    tag = "notice"
)]
pub async fn dismiss(state: web::Data<AppState>) -> HttpResponse {
    state.notices.dismiss();
    HttpResponse::NoContent().finish()
}
