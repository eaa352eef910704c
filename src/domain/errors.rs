use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not signed in")]
    NotSignedIn,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("You don't have permission to access this portal.")]
    Forbidden,
    #[error("Another request of this kind is still in progress")]
    Busy,
    #[error("{0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure talking to the remote merchandise API or object storage.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Human-readable text for the error banner. `fallback` names the action
    /// that failed and is used when the API gave no message of its own.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Transport(_) => "Network error. Please try again.".to_string(),
            ApiError::Rejected {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            ApiError::Rejected { .. } | ApiError::Malformed(_) => fallback.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Rejected { status: 404, .. })
    }

    /// Map onto the domain taxonomy for an action described by `fallback`.
    pub fn into_domain(self, fallback: &str) -> DomainError {
        if self.is_not_found() {
            return DomainError::NotFound;
        }
        log::warn!("{}: {}", fallback, self);
        DomainError::Upstream(self.user_message(fallback))
    }
}
