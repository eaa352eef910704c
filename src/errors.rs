use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    /// No session: send the user to the login route.
    #[error("Not signed in")]
    SignInRequired,

    #[error("{0}")]
    Unauthorized(String),

    /// Signed in with the other role.
    #[error("Unauthorized access")]
    WrongPortal,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::NotSignedIn => AppError::SignInRequired,
            DomainError::Unauthenticated(msg) => AppError::Unauthorized(msg),
            DomainError::Forbidden => AppError::WrongPortal,
            e @ DomainError::Busy => AppError::Conflict(e.to_string()),
            DomainError::Upstream(msg) => AppError::BadGateway(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    /// Whether the error belongs on the dismissible banner.
    pub fn is_banner_worthy(&self) -> bool {
        matches!(self, AppError::BadGateway(_) | AppError::Internal(_))
    }

    pub fn banner_text(&self) -> String {
        match self {
            AppError::Internal(_) => "Something went wrong. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SignInRequired | AppError::WrongPortal => StatusCode::SEE_OTHER,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::SignInRequired => see_other("/login"),
            AppError::WrongPortal => see_other("/unauthorized"),
            AppError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            other => HttpResponse::build(other.status_code()).json(serde_json::json!({
                "error": other.to_string()
            })),
        }
    }
}
