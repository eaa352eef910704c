use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;

/// Which portal a signed-in user may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(
        rename = "club",
        alias = "club-coordinator",
        alias = "club_coordinator"
    )]
    ClubCoordinator,
    #[serde(rename = "csa", alias = "csa-member", alias = "csa_member")]
    Csa,
}

impl Role {
    pub fn portal_path(self) -> &'static str {
        match self {
            Role::ClubCoordinator => "/club-coordinator",
            Role::Csa => "/csa-portal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub username: String,
    pub role: Role,
}

/// An authenticated session: the bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct Credentials {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(DomainError::InvalidInput(
                "Please fill in both fields.".to_string(),
            ));
        }
        Ok(())
    }
}
