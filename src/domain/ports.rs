use async_trait::async_trait;

use super::bundle::{Bundle, BundleDraft, StatusFilter};
use super::errors::{ApiError, DomainError};
use super::order::Order;
use super::session::{Credentials, Session};

#[async_trait]
pub trait AuthGateway: Send + Sync + 'static {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>;
}

/// Bundle endpoints of the merchandise API. Every call carries the session's
/// bearer token.
#[async_trait]
pub trait BundleGateway: Send + Sync + 'static {
    async fn list_club_bundles(&self, token: &str) -> Result<Vec<Bundle>, ApiError>;
    async fn fetch_club_bundle(&self, token: &str, id: &str) -> Result<Bundle, ApiError>;
    async fn create_bundle(&self, token: &str, draft: &BundleDraft) -> Result<Bundle, ApiError>;
    async fn edit_club_bundle(
        &self,
        token: &str,
        id: &str,
        draft: &BundleDraft,
    ) -> Result<Bundle, ApiError>;

    async fn list_csa_bundles(
        &self,
        token: &str,
        status: StatusFilter,
    ) -> Result<Vec<Bundle>, ApiError>;
    async fn fetch_csa_bundle(&self, token: &str, id: &str) -> Result<Bundle, ApiError>;
    async fn edit_csa_bundle(
        &self,
        token: &str,
        id: &str,
        draft: &BundleDraft,
    ) -> Result<Bundle, ApiError>;
    async fn approve_bundle(&self, token: &str, id: &str, visibility: bool)
        -> Result<(), ApiError>;
    async fn toggle_visibility(&self, token: &str, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync + 'static {
    async fn list_orders(&self, token: &str, bundle_id: &str) -> Result<Vec<Order>, ApiError>;
}

/// Image upload target. Returns a publicly retrievable URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError>;
}

/// Durable home of the single signed-in session.
pub trait SessionStore: Send + Sync + 'static {
    /// Unreadable or malformed records load as `None`.
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<(), DomainError>;
    fn clear(&self) -> Result<(), DomainError>;
}
