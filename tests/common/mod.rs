#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;
use chrono::FixedOffset;
use parking_lot::Mutex;
use serde_json::{json, Value};

use merch_portal::application::notice::NoticeBoard;
use merch_portal::domain::bundle::{ApprovalStatus, Bundle, BundleDraft, StatusFilter};
use merch_portal::domain::errors::{ApiError, DomainError};
use merch_portal::domain::order::Order;
use merch_portal::domain::ports::{
    AuthGateway, BundleGateway, ObjectStorage, OrderGateway, SessionStore,
};
use merch_portal::domain::session::{Credentials, Role, Session, User};
use merch_portal::state::{AppState, Ports};

pub const CLUB_USER: &str = "robotics@campus.edu";
pub const CSA_USER: &str = "csa@campus.edu";
pub const PASSWORD: &str = "hunter2";

pub fn session(role: Role) -> Session {
    let username = match role {
        Role::ClubCoordinator => CLUB_USER,
        Role::Csa => CSA_USER,
    };
    Session {
        token: format!("token-{}", username),
        user: User {
            username: username.to_string(),
            role,
        },
    }
}

pub fn bundle(value: Value) -> Bundle {
    serde_json::from_value(value).unwrap()
}

pub fn order(value: Value) -> Order {
    serde_json::from_value(value).unwrap()
}

/// Hoodie + Tee bundle with a two-item combo.
pub fn hoodie_bundle() -> Bundle {
    bundle(json!({
        "_id": "b1",
        "title": "Robotics Merch",
        "club": { "_id": "c1", "clubName": "Robotics Club" },
        "approvalStatus": "pending",
        "visibility": false,
        "merchItems": [
            { "name": "Hoodie", "price": 800, "sizes": ["S", "M", "L"] },
            { "name": "Tee", "price": 400, "sizes": ["M"] }
        ],
        "combos": [
            { "name": "Duo", "comboPrice": 1000, "items": ["Hoodie", "Tee"] }
        ]
    }))
}

// ── Merchandise API fake ─────────────────────────────────────────────────────

/// In-memory stand-in for the remote merchandise API.
#[derive(Default)]
pub struct FakeApi {
    pub bundles: Mutex<Vec<Bundle>>,
    pub orders: Mutex<HashMap<String, Vec<Order>>>,
    /// When set, list calls fail with a transport error.
    pub offline: AtomicBool,
    /// Artificial latency on list calls, in milliseconds.
    pub latency_ms: AtomicU64,
    pub writes: AtomicUsize,
}

impl FakeApi {
    pub fn with_bundles(bundles: Vec<Bundle>) -> Arc<Self> {
        let api = Self::default();
        *api.bundles.lock() = bundles;
        Arc::new(api)
    }

    pub fn add_orders(&self, bundle_id: &str, orders: Vec<Order>) {
        self.orders.lock().insert(bundle_id.to_string(), orders);
    }

    pub fn bundle(&self, id: &str) -> Option<Bundle> {
        self.bundles.lock().iter().find(|b| b.id == id).cloned()
    }

    async fn lag(&self) {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Bundle, ApiError> {
        self.bundle(id).ok_or(ApiError::Rejected {
            status: 404,
            message: Some("Bundle not found".to_string()),
        })
    }

    fn apply(&self, id: &str, draft: &BundleDraft) -> Result<Bundle, ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut bundles = self.bundles.lock();
        let slot = bundles
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ApiError::Rejected {
                status: 404,
                message: None,
            })?;
        slot.title = draft.title.clone();
        slot.description = draft.description.clone();
        slot.merch_items = draft.merch_items.clone();
        slot.combos = draft.combos.clone();
        slot.size_charts = draft.size_charts.clone();
        Ok(slot.clone())
    }
}

#[async_trait]
impl AuthGateway for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.check_online()?;
        let role = match credentials.username.as_str() {
            CLUB_USER => Role::ClubCoordinator,
            CSA_USER => Role::Csa,
            _ => {
                return Err(ApiError::Rejected {
                    status: 401,
                    message: Some("Invalid credentials".to_string()),
                })
            }
        };
        if credentials.password != PASSWORD {
            return Err(ApiError::Rejected {
                status: 401,
                message: Some("Wrong password".to_string()),
            });
        }
        Ok(session(role))
    }
}

#[async_trait]
impl BundleGateway for FakeApi {
    async fn list_club_bundles(&self, _token: &str) -> Result<Vec<Bundle>, ApiError> {
        self.check_online()?;
        Ok(self.bundles.lock().clone())
    }

    async fn fetch_club_bundle(&self, _token: &str, id: &str) -> Result<Bundle, ApiError> {
        self.find(id)
    }

    async fn create_bundle(&self, _token: &str, draft: &BundleDraft) -> Result<Bundle, ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut bundles = self.bundles.lock();
        let created = bundle(json!({
            "_id": format!("new-{}", bundles.len() + 1),
            "title": draft.title,
            "description": draft.description,
            "merchItems": draft.merch_items,
            "combos": draft.combos,
            "sizeCharts": draft.size_charts,
        }));
        bundles.push(created.clone());
        Ok(created)
    }

    async fn edit_club_bundle(
        &self,
        _token: &str,
        id: &str,
        draft: &BundleDraft,
    ) -> Result<Bundle, ApiError> {
        self.apply(id, draft)
    }

    async fn list_csa_bundles(
        &self,
        _token: &str,
        status: StatusFilter,
    ) -> Result<Vec<Bundle>, ApiError> {
        self.lag().await;
        self.check_online()?;
        Ok(self
            .bundles
            .lock()
            .iter()
            .filter(|b| status.matches(b.approval_status))
            .cloned()
            .collect())
    }

    async fn fetch_csa_bundle(&self, _token: &str, id: &str) -> Result<Bundle, ApiError> {
        self.find(id)
    }

    async fn edit_csa_bundle(
        &self,
        _token: &str,
        id: &str,
        draft: &BundleDraft,
    ) -> Result<Bundle, ApiError> {
        self.apply(id, draft)
    }

    async fn approve_bundle(
        &self,
        _token: &str,
        id: &str,
        visibility: bool,
    ) -> Result<(), ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut bundles = self.bundles.lock();
        match bundles.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.approval_status = ApprovalStatus::Approved;
                b.visibility = visibility;
                Ok(())
            }
            None => Err(ApiError::Rejected {
                status: 404,
                message: None,
            }),
        }
    }

    async fn toggle_visibility(&self, _token: &str, id: &str) -> Result<(), ApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut bundles = self.bundles.lock();
        match bundles.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.visibility = !b.visibility;
                Ok(())
            }
            None => Err(ApiError::Rejected {
                status: 404,
                message: None,
            }),
        }
    }
}

#[async_trait]
impl OrderGateway for FakeApi {
    async fn list_orders(&self, _token: &str, bundle_id: &str) -> Result<Vec<Order>, ApiError> {
        self.lag().await;
        self.check_online()?;
        Ok(self
            .orders
            .lock()
            .get(bundle_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ── Storage and session fakes ────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        self.uploads
            .lock()
            .push((folder.to_string(), file_name.to_string(), bytes.len()));
        Ok(format!("https://storage.test/{}/{}", folder, file_name))
    }
}

#[derive(Default)]
pub struct MemorySessions(pub Mutex<Option<Session>>);

impl SessionStore for MemorySessions {
    fn load(&self) -> Option<Session> {
        self.0.lock().clone()
    }

    fn save(&self, session: &Session) -> Result<(), DomainError> {
        *self.0.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        *self.0.lock() = None;
        Ok(())
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub storage: Arc<FakeStorage>,
    pub sessions: Arc<MemorySessions>,
    pub state: web::Data<AppState>,
}

/// App state over the fakes, optionally starting with a stored session.
pub fn harness(api: Arc<FakeApi>, signed_in: Option<Role>) -> Harness {
    let storage = Arc::new(FakeStorage::default());
    let sessions = Arc::new(MemorySessions(Mutex::new(signed_in.map(session))));
    let ports = Ports {
        auth: api.clone(),
        bundles: api.clone(),
        orders: api.clone(),
        storage: storage.clone(),
        sessions: sessions.clone(),
    };
    let ist = FixedOffset::east_opt(330 * 60).unwrap();
    let state = web::Data::new(AppState::new(ports, NoticeBoard::default(), ist));
    Harness {
        api,
        storage,
        sessions,
        state,
    }
}
