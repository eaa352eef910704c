use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::bundle::{Bundle, BundleDraft, StatusFilter};
use crate::domain::errors::ApiError;
use crate::domain::order::Order;
use crate::domain::ports::{AuthGateway, BundleGateway, OrderGateway};
use crate::domain::session::{Credentials, Session};

// ── Wire envelope ────────────────────────────────────────────────────────────

/// `{ "success": bool, "message"?: string, "data"?: T }`
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct BundlesData {
    bundles: Vec<Bundle>,
}

#[derive(Debug, Deserialize)]
struct BundleData {
    bundle: Bundle,
}

#[derive(Debug, Deserialize)]
struct OrdersData {
    orders: Vec<Order>,
}

// ── Client ───────────────────────────────────────────────────────────────────

/// reqwest client for the remote merchandise API.
#[derive(Clone)]
pub struct HttpMerchApi {
    client: Client,
    base_url: String,
}

impl HttpMerchApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL plus `segments`, each percent-encoded as a single path
    /// segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Malformed(format!("API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Malformed("API base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send the request and unwrap the envelope. Non-2xx statuses and
    /// `success: false` both come back as `Rejected`.
    async fn exchange(&self, request: RequestBuilder) -> Result<Option<Value>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope = serde_json::from_slice::<Envelope>(&body);
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: envelope.ok().and_then(|e| e.message),
            });
        }

        let envelope = envelope.map_err(|e| ApiError::Malformed(e.to_string()))?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: envelope.message,
            });
        }
        Ok(envelope.data)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let data = self
            .exchange(request)
            .await?
            .ok_or_else(|| ApiError::Malformed("response carries no data".to_string()))?;
        serde_json::from_value(data).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    async fn bundle(&self, request: RequestBuilder) -> Result<Bundle, ApiError> {
        Ok(self.fetch::<BundleData>(request).await?.bundle)
    }

    async fn bundles(&self, request: RequestBuilder) -> Result<Vec<Bundle>, ApiError> {
        Ok(self.fetch::<BundlesData>(request).await?.bundles)
    }
}

#[async_trait]
impl AuthGateway for HttpMerchApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self.client.post(self.url(&["auth", "login"])?).json(&json!({
            "username": credentials.username,
            "password": credentials.password,
        }));
        self.fetch(request).await
    }
}

#[async_trait]
impl BundleGateway for HttpMerchApi {
    async fn list_club_bundles(&self, token: &str) -> Result<Vec<Bundle>, ApiError> {
        let request = self
            .client
            .get(self.url(&["merch", "club", "bundles"])?)
            .bearer_auth(token);
        self.bundles(request).await
    }

    async fn fetch_club_bundle(&self, token: &str, id: &str) -> Result<Bundle, ApiError> {
        let request = self
            .client
            .get(self.url(&["merch", "club", "bundles", id])?)
            .bearer_auth(token);
        self.bundle(request).await
    }

    async fn create_bundle(&self, token: &str, draft: &BundleDraft) -> Result<Bundle, ApiError> {
        let request = self
            .client
            .post(self.url(&["merch", "club", "bundles"])?)
            .bearer_auth(token)
            .json(draft);
        self.bundle(request).await
    }

    async fn edit_club_bundle(
        &self,
        token: &str,
        id: &str,
        draft: &BundleDraft,
    ) -> Result<Bundle, ApiError> {
        let request = self
            .client
            .put(self.url(&["merch", "club", "bundles", id])?)
            .bearer_auth(token)
            .json(draft);
        self.bundle(request).await
    }

    async fn list_csa_bundles(
        &self,
        token: &str,
        status: StatusFilter,
    ) -> Result<Vec<Bundle>, ApiError> {
        let mut request = self
            .client
            .get(self.url(&["merch", "csa", "bundles"])?)
            .bearer_auth(token);
        if let Some(status) = status.as_query() {
            request = request.query(&[("status", status)]);
        }
        self.bundles(request).await
    }

    async fn fetch_csa_bundle(&self, token: &str, id: &str) -> Result<Bundle, ApiError> {
        let request = self
            .client
            .get(self.url(&["merch", "csa", "bundles", id])?)
            .bearer_auth(token);
        self.bundle(request).await
    }

    async fn edit_csa_bundle(
        &self,
        token: &str,
        id: &str,
        draft: &BundleDraft,
    ) -> Result<Bundle, ApiError> {
        let request = self
            .client
            .put(self.url(&["merch", "csa", "bundles", id])?)
            .bearer_auth(token)
            .json(draft);
        self.bundle(request).await
    }

    async fn approve_bundle(
        &self,
        token: &str,
        id: &str,
        visibility: bool,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.url(&["merch", "csa", "bundles", id, "approve"])?)
            .bearer_auth(token)
            .json(&json!({ "visibility": visibility }));
        self.exchange(request).await.map(|_| ())
    }

    async fn toggle_visibility(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.url(&["merch", "csa", "bundles", id, "visibility"])?)
            .bearer_auth(token);
        self.exchange(request).await.map(|_| ())
    }
}

#[async_trait]
impl OrderGateway for HttpMerchApi {
    async fn list_orders(&self, token: &str, bundle_id: &str) -> Result<Vec<Order>, ApiError> {
        let request = self
            .client
            .get(self.url(&["merch", "club", "bundles", bundle_id, "orders"])?)
            .bearer_auth(token);
        Ok(self.fetch::<OrdersData>(request).await?.orders)
    }
}
