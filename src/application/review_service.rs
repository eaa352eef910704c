use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::bundle::{Bundle, BundleDraft, StatusFilter};
use crate::domain::errors::DomainError;
use crate::domain::ports::BundleGateway;

use super::busy::BusyFlag;

/// CSA board: the last fetched bundle list plus the approval and visibility
/// actions. Every successful mutation re-reads the list from the API.
pub struct ReviewService {
    bundles: Arc<dyn BundleGateway>,
    board: RwLock<Board>,
    approving: BusyFlag,
    toggling: BusyFlag,
}

#[derive(Default)]
struct Board {
    status: StatusFilter,
    bundles: Vec<Bundle>,
}

/// Bundles passing both the status selector and the search term.
pub fn filter_bundles(bundles: &[Bundle], status: StatusFilter, search: &str) -> Vec<Bundle> {
    bundles
        .iter()
        .filter(|b| status.matches(b.approval_status) && b.matches_search(search))
        .cloned()
        .collect()
}

impl ReviewService {
    pub fn new(bundles: Arc<dyn BundleGateway>) -> Self {
        Self {
            bundles,
            board: RwLock::new(Board::default()),
            approving: BusyFlag::default(),
            toggling: BusyFlag::default(),
        }
    }

    async fn reload(&self, token: &str, status: StatusFilter) -> Result<(), DomainError> {
        let bundles = self
            .bundles
            .list_csa_bundles(token, status)
            .await
            .map_err(|e| e.into_domain("Failed to fetch bundles"))?;
        log::debug!("board refreshed: {} bundles ({:?})", bundles.len(), status);
        *self.board.write() = Board { status, bundles };
        Ok(())
    }

    /// Fetch the list for `status` and apply the search term locally. On
    /// failure the previous board stays as it was.
    pub async fn list(
        &self,
        token: &str,
        status: StatusFilter,
        search: &str,
    ) -> Result<Vec<Bundle>, DomainError> {
        self.reload(token, status).await?;
        Ok(self.cached(search))
    }

    /// The board as last fetched, filtered by `search`.
    pub fn cached(&self, search: &str) -> Vec<Bundle> {
        let board = self.board.read();
        filter_bundles(&board.bundles, board.status, search)
    }

    pub async fn detail(&self, token: &str, id: &str) -> Result<Bundle, DomainError> {
        let cached = self.board.read().bundles.iter().find(|b| b.id == id).cloned();
        match cached {
            Some(bundle) => Ok(bundle),
            None => self
                .bundles
                .fetch_csa_bundle(token, id)
                .await
                .map_err(|e| e.into_domain("Failed to fetch bundle")),
        }
    }

    pub async fn edit(
        &self,
        token: &str,
        id: &str,
        draft: BundleDraft,
    ) -> Result<Bundle, DomainError> {
        draft.validate()?;
        let updated = self
            .bundles
            .edit_csa_bundle(token, id, &draft)
            .await
            .map_err(|e| e.into_domain("Failed to update bundle"))?;
        if let Some(slot) = self.board.write().bundles.iter_mut().find(|b| b.id == id) {
            *slot = updated.clone();
        }
        log::info!("CSA edited bundle {}", id);
        Ok(updated)
    }

    pub async fn approve(&self, token: &str, id: &str, visibility: bool) -> Result<(), DomainError> {
        let _guard = self.approving.try_begin()?;
        self.bundles
            .approve_bundle(token, id, visibility)
            .await
            .map_err(|e| e.into_domain("Failed to approve bundle"))?;
        log::info!("approved bundle {} (visible: {})", id, visibility);
        self.refresh_after_mutation(token).await
    }

    pub async fn toggle_visibility(&self, token: &str, id: &str) -> Result<(), DomainError> {
        let _guard = self.toggling.try_begin()?;
        self.bundles
            .toggle_visibility(token, id)
            .await
            .map_err(|e| e.into_domain("Failed to toggle bundle visibility"))?;
        log::info!("toggled visibility of bundle {}", id);
        self.refresh_after_mutation(token).await
    }

    async fn refresh_after_mutation(&self, token: &str) -> Result<(), DomainError> {
        let status = self.board.read().status;
        self.reload(token, status).await
    }
}
