//! User registration, credential checks, and the current session.
//!
//! The logged-in user is never held in process-wide state. Commands load the
//! [`Session`] through [`AuthService::require_session`] and pass it along.

use crate::core::error::AuthError;
use crate::store::KeyValueStore;
use crate::store::records::{SessionRepository, UserRepository, normalize_email};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A user record together with its salted password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub user: User,
    pub password_salt: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct AuthService {
    users: UserRepository,
    sessions: SessionRepository,
}

impl AuthService {
    pub fn new(store: &KeyValueStore) -> Result<Self> {
        Ok(Self {
            users: UserRepository::new(store)?,
            sessions: SessionRepository::new(store)?,
        })
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() {
            return Err(AuthError::InvalidRegistration("name must not be empty".into()).into());
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AuthError::InvalidRegistration(format!("'{email}' is not an email")).into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidRegistration(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }

        let salt = Uuid::new_v4().simple().to_string();
        let stored = StoredUser {
            user: User {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                email: email.clone(),
                created_at: Utc::now(),
            },
            password_hash: password_digest(&salt, password),
            password_salt: salt,
        };

        if !self.users.insert_if_absent(&stored).await? {
            return Err(AuthError::EmailTaken(email).into());
        }
        info!("Registered user {}", stored.user.id);
        Ok(stored.user)
    }

    /// Checks credentials and starts a session. Unknown emails and wrong
    /// passwords fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let Some(stored) = self.users.find_by_email(email).await? else {
            debug!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };
        if password_digest(&stored.password_salt, password) != stored.password_hash {
            debug!("Login attempt with wrong password for {}", stored.user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let session = Session {
            user: stored.user,
            started_at: Utc::now(),
        };
        self.sessions.save(&session).await?;
        info!("Started session for {}", session.user.id);
        Ok(session)
    }

    pub async fn logout(&self) -> Result<Option<Session>> {
        let current = self.sessions.load().await?;
        self.sessions.clear().await?;
        Ok(current)
    }

    pub async fn current_session(&self) -> Result<Option<Session>> {
        self.sessions.load().await
    }

    pub async fn require_session(&self) -> Result<Session> {
        self.current_session()
            .await?
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_error(err: anyhow::Error) -> AuthError {
        err.downcast::<AuthError>().unwrap()
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let store = KeyValueStore::in_memory();
        let auth = AuthService::new(&store).unwrap();

        let user = auth
            .register("Asha Rao", " Asha@Example.com ", "secret-pass")
            .await
            .unwrap();
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.name, "Asha Rao");

        assert!(auth.current_session().await.unwrap().is_none());
        let session = auth.login("ASHA@example.com", "secret-pass").await.unwrap();
        assert_eq!(session.user, user);
        assert_eq!(auth.require_session().await.unwrap().user, user);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = KeyValueStore::in_memory();
        let auth = AuthService::new(&store).unwrap();
        auth.register("Asha", "asha@example.com", "secret-pass")
            .await
            .unwrap();

        let err = auth
            .register("Other", "ASHA@example.com", "another-pass")
            .await
            .unwrap_err();
        assert_eq!(
            auth_error(err),
            AuthError::EmailTaken("asha@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_bad_credentials_fail_identically() {
        let store = KeyValueStore::in_memory();
        let auth = AuthService::new(&store).unwrap();
        auth.register("Asha", "asha@example.com", "secret-pass")
            .await
            .unwrap();

        let wrong_password = auth.login("asha@example.com", "nope-nope").await;
        let unknown_email = auth.login("ghost@example.com", "secret-pass").await;
        assert_eq!(
            auth_error(wrong_password.unwrap_err()),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth_error(unknown_email.unwrap_err()),
            AuthError::InvalidCredentials
        );
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let store = KeyValueStore::in_memory();
        let auth = AuthService::new(&store).unwrap();

        for (name, email, password) in [
            ("", "a@example.com", "secret-pass"),
            ("Asha", "not-an-email", "secret-pass"),
            ("Asha", "a@example.com", "short"),
        ] {
            let err = auth.register(name, email, password).await.unwrap_err();
            assert!(matches!(auth_error(err), AuthError::InvalidRegistration(_)));
        }
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let store = KeyValueStore::in_memory();
        let auth = AuthService::new(&store).unwrap();
        auth.register("Asha", "asha@example.com", "secret-pass")
            .await
            .unwrap();
        auth.login("asha@example.com", "secret-pass").await.unwrap();

        let ended = auth.logout().await.unwrap();
        assert_eq!(ended.map(|s| s.user.email), Some("asha@example.com".into()));
        assert_eq!(
            auth_error(auth.require_session().await.unwrap_err()),
            AuthError::NotLoggedIn
        );
        assert!(auth.logout().await.unwrap().is_none());
    }

    #[test]
    fn test_password_digest_depends_on_salt() {
        assert_eq!(password_digest("a", "pw"), password_digest("a", "pw"));
        assert_ne!(password_digest("a", "pw"), password_digest("b", "pw"));
        assert_eq!(password_digest("a", "pw").len(), 64);
    }
}
