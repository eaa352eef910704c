pub mod auth;
pub mod club;
pub mod csa;
pub mod notice;

use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Upload bodies are raw images; anything larger is refused.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::index,
        auth::session_status,
        auth::login,
        auth::logout,
        auth::unauthorized,
        notice::current,
        notice::dismiss,
        club::list_bundles,
        club::create_bundle,
        club::get_bundle,
        club::edit_bundle,
        club::upload_image,
        club::order_report,
        club::export_orders,
        csa::list_bundles,
        csa::get_bundle,
        csa::edit_bundle,
        csa::approve_bundle,
        csa::toggle_visibility,
    ),
    components(schemas(
        auth::SessionStatus,
        auth::LoginResponse,
        csa::ApproveRequest,
        csa::BoardResponse,
        csa::BundleDetail,
        csa::BundleAction,
    )),
    tags(
        (name = "session", description = "Sign-in and role routing"),
        (name = "notice", description = "Dismissible error banner"),
        (name = "club", description = "Club coordinator bundles and orders"),
        (name = "csa", description = "CSA review portal"),
    )
)]
pub struct ApiDoc;

/// Register every route of the portal.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(auth::index))
        .service(
            web::resource("/login")
                .route(web::get().to(auth::session_status))
                .route(web::post().to(auth::login)),
        )
        .service(
            web::resource("/logout")
                .route(web::post().to(auth::logout))
                .route(web::get().to(auth::logout)),
        )
        .route("/unauthorized", web::get().to(auth::unauthorized))
        .service(
            web::resource("/notice")
                .route(web::get().to(notice::current))
                .route(web::delete().to(notice::dismiss)),
        )
        .service(
            web::scope("/club-coordinator")
                .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
                .service(
                    web::resource("/bundles")
                        .route(web::get().to(club::list_bundles))
                        .route(web::post().to(club::create_bundle)),
                )
                .service(
                    web::resource("/bundles/{id}")
                        .route(web::get().to(club::get_bundle))
                        .route(web::put().to(club::edit_bundle)),
                )
                .route("/bundles/{id}/orders", web::get().to(club::order_report))
                .route(
                    "/bundles/{id}/orders/export",
                    web::get().to(club::export_orders),
                )
                .route("/uploads/{kind}/{file}", web::post().to(club::upload_image)),
        )
        .service(
            web::scope("/csa-portal")
                .route("/bundles", web::get().to(csa::list_bundles))
                .service(
                    web::resource("/bundles/{id}")
                        .route(web::get().to(csa::get_bundle))
                        .route(web::put().to(csa::edit_bundle)),
                )
                .route("/bundles/{id}/approve", web::post().to(csa::approve_bundle))
                .route(
                    "/bundles/{id}/visibility",
                    web::post().to(csa::toggle_visibility),
                ),
        )
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
}
