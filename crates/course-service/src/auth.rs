//! Accounts and sign-in sessions.
//!
//! Credentials live behind [`IdentityProvider`]; profiles live in the
//! `users` table keyed by the provider's uid.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use database::validation::{self, ValidationError, MAX_TUTOR_FIELD_LENGTH};
use database::{user, Database, Role, TutorInfo, UserProfile};
use rand::RngCore;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::error::Result;

/// Shortest password the in-memory provider accepts.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Authentication and registration errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    EmailInUse(String),

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("tutor registration requires teaching experience, expertise and qualifications")]
    MissingTutorInfo,

    #[error("identity provider error: {0}")]
    Provider(String),
}

/// A signed-in identity as the provider sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Email and password authentication.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an identity. Its uid keys the user profile.
    async fn sign_up(&self, email: &str, password: &str) -> std::result::Result<AuthUser, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> std::result::Result<AuthUser, AuthError>;

    async fn sign_out(&self, uid: &str) -> std::result::Result<(), AuthError>;
}

#[derive(Debug, Clone)]
struct StoredCredential {
    uid: String,
    salt: String,
    hash: String,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn new_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Identity provider keeping salted SHA-256 password hashes in memory.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    /// Keyed by lower-cased email.
    credentials: RwLock<HashMap<String, StoredCredential>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> std::result::Result<AuthUser, AuthError> {
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_CHARS,
            });
        }

        let key = email.trim().to_lowercase();
        let mut credentials = self.credentials.write().await;
        if credentials.contains_key(&key) {
            return Err(AuthError::EmailInUse(key));
        }

        let salt = new_salt();
        let credential = StoredCredential {
            uid: uuid::Uuid::new_v4().to_string(),
            hash: hash_password(&salt, password),
            salt,
        };
        let uid = credential.uid.clone();
        credentials.insert(key.clone(), credential);

        Ok(AuthUser { uid, email: key })
    }

    async fn sign_in(&self, email: &str, password: &str) -> std::result::Result<AuthUser, AuthError> {
        let key = email.trim().to_lowercase();
        let credentials = self.credentials.read().await;

        match credentials.get(&key) {
            Some(stored) if stored.hash == hash_password(&stored.salt, password) => Ok(AuthUser {
                uid: stored.uid.clone(),
                email: key,
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_out(&self, _uid: &str) -> std::result::Result<(), AuthError> {
        Ok(())
    }
}

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Required for tutors, ignored for students.
    #[serde(default)]
    pub tutor_info: Option<TutorInfo>,
}

fn validate_registration(registration: &Registration) -> std::result::Result<(), AuthError> {
    validation::validate_name(&registration.name)?;
    validation::validate_email(&registration.email)?;

    if registration.role == Role::Tutor {
        let info = registration
            .tutor_info
            .as_ref()
            .ok_or(AuthError::MissingTutorInfo)?;
        for (field, value) in [
            ("teaching experience", &info.teaching_experience),
            ("expertise", &info.expertise),
            ("qualifications", &info.qualifications),
        ] {
            validation::validate_text(field, value, MAX_TUTOR_FIELD_LENGTH)?;
        }
    }

    Ok(())
}

/// Account registration and profile lookup.
#[derive(Clone)]
pub struct Accounts {
    db: Database,
    provider: Arc<dyn IdentityProvider>,
}

impl Accounts {
    pub fn new(db: Database, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { db, provider }
    }

    /// Create an identity and its profile.
    ///
    /// Tutor details are stored verbatim for tutors and dropped for students.
    pub async fn register(&self, registration: Registration) -> Result<UserProfile> {
        validate_registration(&registration)?;

        let identity = self
            .provider
            .sign_up(&registration.email, &registration.password)
            .await?;

        let tutor_info = match registration.role {
            Role::Tutor => registration.tutor_info,
            Role::Student => None,
        };

        let profile = UserProfile {
            id: identity.uid,
            name: registration.name.trim().to_string(),
            email: identity.email,
            role: registration.role,
            tutor_info,
            created_at: String::new(),
        };
        user::create_user(self.db.pool(), &profile).await?;

        info!(uid = %profile.id, role = profile.role.as_str(), "Account registered");

        self.profile(&profile.id).await
    }

    /// Check credentials and load the profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile> {
        let identity = self.provider.sign_in(email, password).await?;
        self.profile(&identity.uid).await
    }

    pub async fn sign_out(&self, uid: &str) -> Result<()> {
        Ok(self.provider.sign_out(uid).await?)
    }

    pub async fn profile(&self, uid: &str) -> Result<UserProfile> {
        Ok(user::get_user(self.db.pool(), uid).await?)
    }
}

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(UserProfile),
}

impl AuthState {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Authenticated(profile) => Some(profile),
            AuthState::Unauthenticated => None,
        }
    }
}

/// A live view of an [`AuthSession`]'s state. Dropping it unsubscribes.
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: watch::Receiver<AuthState>,
}

impl AuthSubscription {
    /// The latest state.
    pub fn current(&self) -> AuthState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the session is gone; its last published state is
    /// always [`AuthState::Unauthenticated`].
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

/// One client's sign-in state with change notifications.
pub struct AuthSession {
    accounts: Accounts,
    state: watch::Sender<AuthState>,
}

impl AuthSession {
    pub fn new(accounts: Accounts) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self { accounts, state }
    }

    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.state.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let profile = self.accounts.sign_in(email, password).await?;
        debug!(uid = %profile.id, "Session signed in");
        self.state.send_replace(AuthState::Authenticated(profile.clone()));
        Ok(profile)
    }

    /// Register and sign in as the new account.
    pub async fn register(&self, registration: Registration) -> Result<UserProfile> {
        let profile = self.accounts.register(registration).await?;
        self.state.send_replace(AuthState::Authenticated(profile.clone()));
        Ok(profile)
    }

    pub async fn logout(&self) -> Result<()> {
        if let AuthState::Authenticated(profile) = self.current() {
            self.accounts.sign_out(&profile.id).await?;
            debug!(uid = %profile.id, "Session signed out");
        }
        self.state.send_replace(AuthState::Unauthenticated);
        Ok(())
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.state.send_replace(AuthState::Unauthenticated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    async fn accounts() -> Accounts {
        let db = Database::in_memory().await.unwrap();
        Accounts::new(db, Arc::new(InMemoryIdentityProvider::new()))
    }

    fn student(email: &str) -> Registration {
        Registration {
            name: "Sam".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            role: Role::Student,
            tutor_info: None,
        }
    }

    #[tokio::test]
    async fn test_provider_rejects_weak_and_duplicate() {
        let provider = InMemoryIdentityProvider::new();

        assert!(matches!(
            provider.sign_up("a@b.co", "12345").await,
            Err(AuthError::WeakPassword { min: 6 })
        ));

        provider.sign_up("a@b.co", "123456").await.unwrap();
        assert!(matches!(
            provider.sign_up("A@B.co", "abcdef").await,
            Err(AuthError::EmailInUse(_))
        ));

        assert!(provider.sign_in("a@b.co", "123456").await.is_ok());
        assert!(matches!(
            provider.sign_in("a@b.co", "wrong!").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_tutor_requires_details() {
        let accounts = accounts().await;
        let registration = Registration {
            role: Role::Tutor,
            ..student("t@example.com")
        };

        let result = accounts.register(registration).await;
        assert!(matches!(
            result,
            Err(ServiceError::Auth(AuthError::MissingTutorInfo))
        ));
    }

    #[tokio::test]
    async fn test_student_details_are_dropped() {
        let accounts = accounts().await;
        let registration = Registration {
            tutor_info: Some(TutorInfo {
                teaching_experience: "x".to_string(),
                expertise: "y".to_string(),
                qualifications: "z".to_string(),
            }),
            ..student("s@example.com")
        };

        let profile = accounts.register(registration).await.unwrap();
        assert_eq!(profile.role, Role::Student);
        assert!(profile.tutor_info.is_none());
    }

    #[tokio::test]
    async fn test_session_notifies_subscribers() {
        let session = AuthSession::new(accounts().await);
        let mut subscription = session.subscribe();
        assert_eq!(subscription.current(), AuthState::Unauthenticated);

        let profile = session.register(student("s@example.com")).await.unwrap();
        let state = subscription.changed().await.unwrap();
        assert_eq!(state.user().map(|p| p.id.as_str()), Some(profile.id.as_str()));

        session.logout().await.unwrap();
        assert_eq!(subscription.changed().await, Some(AuthState::Unauthenticated));

        session.login("s@example.com", "secret1").await.unwrap();
        assert!(subscription.changed().await.unwrap().user().is_some());

        drop(session);
        assert_eq!(subscription.current(), AuthState::Unauthenticated);
        assert_eq!(subscription.changed().await, Some(AuthState::Unauthenticated));
        assert_eq!(subscription.changed().await, None);
    }

    #[tokio::test]
    async fn test_dropping_subscription_unsubscribes() {
        let session = AuthSession::new(accounts().await);
        let subscription = session.subscribe();
        assert_eq!(session.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(session.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_login_keeps_state() {
        let session = AuthSession::new(accounts().await);
        let result = session.login("nobody@example.com", "secret1").await;
        assert!(matches!(
            result,
            Err(ServiceError::Auth(AuthError::InvalidCredentials))
        ));
        assert_eq!(session.current(), AuthState::Unauthenticated);
    }
}
