//! Authentication seam
//!
//! Handlers only see [`Authenticator`]. The bundled
//! [`StaticCredentialAuthenticator`] accepts a single demo account and a
//! fixed bearer token; a real identity provider replaces it behind the same
//! trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default demo account email
pub const DEMO_EMAIL: &str = "demo@smartbiz.com";
/// Default demo account password
pub const DEMO_PASSWORD: &str = "123456";
/// Default demo account id
pub const DEMO_USER_ID: &str = "demo-user-123";
/// Default demo account display name
pub const DEMO_USER_NAME: &str = "Demo User";
/// Default bearer token issued to the demo account
pub const DEMO_TOKEN: &str = "demo-token-123";

/// Authenticated identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Token and identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    pub user: Principal,
}

/// Authentication failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email or password did not match. Does not say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account creation is not supported by this authenticator
    #[error("Registration is disabled")]
    RegistrationDisabled,
}

/// Resolves bearer tokens and credentials to principals
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve a bearer token. `None` for unknown tokens.
    async fn verify(&self, token: &str) -> Option<Principal>;

    /// Exchange credentials for a token.
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError>;

    /// Human-readable hint shown on failed logins and disabled registration.
    ///
    /// Returns `None` when there is nothing to advertise.
    fn credential_hint(&self) -> Option<String> {
        None
    }
}

/// The single account a [`StaticCredentialAuthenticator`] accepts
#[derive(Clone, PartialEq, Eq)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
    pub user_id: String,
    pub name: String,
    pub token: String,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            user_id: DEMO_USER_ID.to_string(),
            name: DEMO_USER_NAME.to_string(),
            token: DEMO_TOKEN.to_string(),
        }
    }
}

impl std::fmt::Debug for DemoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoCredentials")
            .field("email", &self.email)
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Authenticator backed by one fixed credential pair
#[derive(Debug, Clone)]
pub struct StaticCredentialAuthenticator {
    credentials: DemoCredentials,
}

impl Default for StaticCredentialAuthenticator {
    fn default() -> Self {
        Self::new(DemoCredentials::default())
    }
}

impl StaticCredentialAuthenticator {
    pub fn new(credentials: DemoCredentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &DemoCredentials {
        &self.credentials
    }

    fn principal(&self) -> Principal {
        Principal {
            id: self.credentials.user_id.clone(),
            name: self.credentials.name.clone(),
            email: self.credentials.email.clone(),
        }
    }
}

#[async_trait]
impl Authenticator for StaticCredentialAuthenticator {
    async fn verify(&self, token: &str) -> Option<Principal> {
        (token == self.credentials.token).then(|| self.principal())
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError> {
        let email = email.trim().to_lowercase();
        if email == self.credentials.email.to_lowercase() && password == self.credentials.password {
            Ok(LoginGrant {
                token: self.credentials.token.clone(),
                user: self.principal(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn credential_hint(&self) -> Option<String> {
        Some(format!(
            "{} / {}",
            self.credentials.email, self.credentials.password
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_normalizes_email() {
        let auth = StaticCredentialAuthenticator::default();
        let grant = auth.login("  Demo@SmartBiz.com ", "123456").await.unwrap();
        assert_eq!(grant.token, DEMO_TOKEN);
        assert_eq!(grant.user.id, DEMO_USER_ID);
        assert_eq!(grant.user.name, DEMO_USER_NAME);
        assert_eq!(grant.user.email, DEMO_EMAIL);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let auth = StaticCredentialAuthenticator::default();
        assert_eq!(
            auth.login(DEMO_EMAIL, "654321").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.login("someone@smartbiz.com", DEMO_PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_verify_is_exact() {
        let auth = StaticCredentialAuthenticator::default();
        assert!(auth.verify(DEMO_TOKEN).await.is_some());
        assert!(auth.verify("demo-token-1234").await.is_none());
        assert!(auth.verify("DEMO-TOKEN-123").await.is_none());
        assert!(auth.verify("").await.is_none());
    }

    #[tokio::test]
    async fn test_custom_credentials() {
        let auth = StaticCredentialAuthenticator::new(DemoCredentials {
            email: "owner@shop.test".to_string(),
            password: "hunter22".to_string(),
            token: "shop-token".to_string(),
            ..DemoCredentials::default()
        });
        assert!(auth.login("owner@shop.test", "hunter22").await.is_ok());
        assert!(auth.login(DEMO_EMAIL, DEMO_PASSWORD).await.is_err());
        assert_eq!(
            auth.verify("shop-token").await.unwrap().email,
            "owner@shop.test"
        );
        assert_eq!(
            auth.credential_hint().as_deref(),
            Some("owner@shop.test / hunter22")
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", DemoCredentials::default());
        assert!(!rendered.contains(DEMO_PASSWORD));
        assert!(!rendered.contains(DEMO_TOKEN));
    }
}
