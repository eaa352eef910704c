pub mod application;
pub mod config;
pub mod csv;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};

pub use config::AppConfig;
pub use handlers::configure;
pub use state::AppState;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or spawning) the returned
/// server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
