use std::sync::Arc;

use crate::domain::errors::{ApiError, DomainError};
use crate::domain::ports::AuthGateway;
use crate::domain::session::{Credentials, Session};

use super::session::SessionContext;

pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    session: Arc<SessionContext>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn AuthGateway>, session: Arc<SessionContext>) -> Self {
        Self { gateway, session }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<Session, DomainError> {
        credentials.validate()?;

        let session = self
            .gateway
            .login(&credentials)
            .await
            .map_err(|e| match e {
                ApiError::Rejected { .. } => {
                    DomainError::Unauthenticated(e.user_message("Invalid credentials"))
                }
                other => other.into_domain("Login failed"),
            })?;

        self.session.establish(session.clone())?;
        log::info!(
            "signed in {} as {:?}",
            session.user.username,
            session.role()
        );
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        if let Some(session) = self.session.current() {
            log::info!("signing out {}", session.user.username);
        }
        self.session.clear()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::application::session::tests::MemoryStore;
    use crate::domain::ports::SessionStore;
    use crate::domain::session::{Role, User};

    enum Reply {
        Accept,
        Reject(Option<&'static str>),
        Offline,
    }

    struct StubGateway(Reply);

    #[async_trait]
    impl AuthGateway for StubGateway {
        async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
            match self.0 {
                Reply::Accept => Ok(Session {
                    token: "tok".to_string(),
                    user: User {
                        username: credentials.username.clone(),
                        role: Role::ClubCoordinator,
                    },
                }),
                Reply::Reject(message) => Err(ApiError::Rejected {
                    status: 401,
                    message: message.map(str::to_string),
                }),
                Reply::Offline => Err(ApiError::Transport("refused".to_string())),
            }
        }
    }

    fn service(reply: Reply) -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let session = Arc::new(SessionContext::load(store.clone()));
        (AuthService::new(Arc::new(StubGateway(reply)), session), store)
    }

    fn credentials(password: &str) -> Credentials {
        Credentials {
            username: "coord@club".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn successful_login_is_persisted() {
        let (auth, store) = service(Reply::Accept);
        let session = auth.login(credentials("pw")).await.unwrap();
        assert_eq!(session.role(), Role::ClubCoordinator);
        assert_eq!(store.load(), Some(session));

        auth.logout().unwrap();
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn empty_password_never_reaches_the_gateway() {
        let (auth, _) = service(Reply::Offline);
        let err = auth.login(credentials("")).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg == "Please fill in both fields."));
    }

    #[tokio::test]
    async fn rejection_uses_api_message_or_default() {
        let (auth, store) = service(Reply::Reject(Some("Account locked")));
        let err = auth.login(credentials("pw")).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated(msg) if msg == "Account locked"));
        assert!(store.load().is_none());

        let (auth, _) = service(Reply::Reject(None));
        let err = auth.login(credentials("pw")).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated(msg) if msg == "Invalid credentials"));
    }

    #[tokio::test]
    async fn network_failure_is_upstream() {
        let (auth, _) = service(Reply::Offline);
        let err = auth.login(credentials("pw")).await.unwrap_err();
        assert!(
            matches!(err, DomainError::Upstream(msg) if msg == "Network error. Please try again.")
        );
    }
}
