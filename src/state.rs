use std::sync::Arc;

use chrono::FixedOffset;
use reqwest::Client;

use crate::application::auth_service::AuthService;
use crate::application::bundle_editor::BundleEditor;
use crate::application::notice::NoticeBoard;
use crate::application::order_export::OrderExporter;
use crate::application::review_service::ReviewService;
use crate::application::session::SessionContext;
use crate::config::AppConfig;
use crate::domain::ports::{AuthGateway, BundleGateway, ObjectStorage, OrderGateway, SessionStore};
use crate::errors::AppError;
use crate::infrastructure::http_api::HttpMerchApi;
use crate::infrastructure::object_storage::FirebaseStorage;
use crate::infrastructure::session_file::FileSessionStore;

/// Everything the routes share.
pub struct AppState {
    pub session: Arc<SessionContext>,
    pub auth: AuthService,
    pub editor: BundleEditor,
    pub exporter: OrderExporter,
    pub review: ReviewService,
    pub notices: NoticeBoard,
}

/// The collaborators the portal talks to.
pub struct Ports {
    pub auth: Arc<dyn AuthGateway>,
    pub bundles: Arc<dyn BundleGateway>,
    pub orders: Arc<dyn OrderGateway>,
    pub storage: Arc<dyn ObjectStorage>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(ports: Ports, notices: NoticeBoard, display_offset: FixedOffset) -> Self {
        let session = Arc::new(SessionContext::load(ports.sessions));
        Self {
            auth: AuthService::new(ports.auth, session.clone()),
            editor: BundleEditor::new(ports.bundles.clone(), ports.storage),
            exporter: OrderExporter::new(ports.bundles.clone(), ports.orders, display_offset),
            review: ReviewService::new(ports.bundles),
            session,
            notices,
        }
    }

    /// Wire the HTTP and file adapters described by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = Client::new();
        let api = Arc::new(HttpMerchApi::new(client.clone(), config.api_base_url.clone()));
        let ports = Ports {
            auth: api.clone(),
            bundles: api.clone(),
            orders: api,
            storage: Arc::new(FirebaseStorage::new(
                client,
                config.storage_base_url.clone(),
                config.storage_bucket.clone(),
            )),
            sessions: Arc::new(FileSessionStore::new(config.session_file.clone())),
        };
        Self::new(
            ports,
            NoticeBoard::new(config.notice_ttl),
            config.display_offset,
        )
    }

    /// Put banner-worthy failures on the notice board, then hand the error
    /// back for the response.
    pub fn surface(&self, err: impl Into<AppError>) -> AppError {
        let err = err.into();
        if err.is_banner_worthy() {
            self.notices.raise(err.banner_text());
        }
        err
    }
}
