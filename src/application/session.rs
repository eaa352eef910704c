use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::errors::DomainError;
use crate::domain::ports::SessionStore;
use crate::domain::session::{Role, Session};

/// The signed-in session, shared by every route.
///
/// Loaded once from the store at start-up; `establish` and `clear` keep the
/// store and the in-memory copy in step.
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    pub fn load(store: Arc<dyn SessionStore>) -> Self {
        let current = store.load();
        match &current {
            Some(session) => log::info!(
                "restored session for {} ({:?})",
                session.user.username,
                session.role()
            ),
            None => log::info!("no stored session"),
        }
        Self {
            store,
            current: RwLock::new(current),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// The session, provided it belongs to `role`.
    pub fn require(&self, role: Role) -> Result<Session, DomainError> {
        let session = self.current().ok_or(DomainError::NotSignedIn)?;
        if session.role() != role {
            return Err(DomainError::Forbidden);
        }
        Ok(session)
    }

    pub fn establish(&self, session: Session) -> Result<(), DomainError> {
        self.store.save(&session)?;
        *self.current.write() = Some(session);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        *self.current.write() = None;
        self.store.clear()
    }
}
