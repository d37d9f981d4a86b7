//! Typed repositories for users, sessions, and fixed deposits.
//!
//! Records are stored as JSON in named collections of a [`KeyValueStore`].

use super::KeyValueStore;
use crate::core::auth::{Session, StoredUser};
use crate::core::cache::KeyValueCollection;
use crate::core::deposit::{FixedDeposit, NewDeposit};
use anyhow::{Context, Result, bail};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const USERS: &str = "users";
const DEPOSITS: &str = "deposits";
const SESSION: &str = "session";
const CURRENT_SESSION_KEY: &[u8] = b"current";

async fn read_json<T: DeserializeOwned>(
    collection: &dyn KeyValueCollection,
    key: &[u8],
) -> Result<Option<T>> {
    collection
        .get(key)
        .await?
        .map(|raw| serde_json::from_slice(&raw))
        .transpose()
        .with_context(|| format!("Corrupt record for key {}", String::from_utf8_lossy(key)))
}

async fn write_json<T: Serialize>(
    collection: &dyn KeyValueCollection,
    key: &[u8],
    value: &T,
) -> Result<()> {
    collection.put(key, &serde_json::to_vec(value)?, None).await
}

/// Normalised form of an email address used as the user key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserRepository {
    users: Arc<dyn KeyValueCollection>,
}

impl UserRepository {
    pub fn new(store: &KeyValueStore) -> Result<Self> {
        Ok(Self {
            users: store.collection(USERS, true)?,
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        read_json(self.users.as_ref(), normalize_email(email).as_bytes()).await
    }

    /// Stores `user` unless the email is already registered. Returns whether it was stored.
    pub async fn insert_if_absent(&self, user: &StoredUser) -> Result<bool> {
        let key = normalize_email(&user.user.email);
        if self.users.get(key.as_bytes()).await?.is_some() {
            debug!("User already exists for {key}");
            return Ok(false);
        }
        write_json(self.users.as_ref(), key.as_bytes(), user).await?;
        Ok(true)
    }
}

pub struct SessionRepository {
    sessions: Arc<dyn KeyValueCollection>,
}

impl SessionRepository {
    pub fn new(store: &KeyValueStore) -> Result<Self> {
        Ok(Self {
            sessions: store.collection(SESSION, true)?,
        })
    }

    pub async fn load(&self) -> Result<Option<Session>> {
        read_json(self.sessions.as_ref(), CURRENT_SESSION_KEY).await
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        write_json(self.sessions.as_ref(), CURRENT_SESSION_KEY, session).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.sessions.remove(CURRENT_SESSION_KEY).await
    }
}

pub struct DepositRepository {
    deposits: Arc<dyn KeyValueCollection>,
}

impl DepositRepository {
    pub fn new(store: &KeyValueStore) -> Result<Self> {
        Ok(Self {
            deposits: store.collection(DEPOSITS, true)?,
        })
    }

    fn key(user_id: &str, deposit_id: &str) -> String {
        format!("{user_id}/{deposit_id}")
    }

    /// Validates and stores a new deposit for `user_id`.
    pub async fn create(&self, user_id: &str, new: NewDeposit) -> Result<FixedDeposit> {
        let maturity_date = new.validate()?;
        let deposit = FixedDeposit {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            bank_name: new.bank_name.trim().to_string(),
            principal: new.principal,
            interest_rate: new.interest_rate,
            duration_months: new.duration_months,
            start_date: new.start_date,
            maturity_date,
        };

        write_json(
            self.deposits.as_ref(),
            Self::key(user_id, &deposit.id).as_bytes(),
            &deposit,
        )
        .await?;
        debug!("Stored deposit {} for user {}", deposit.id, user_id);
        Ok(deposit)
    }

    /// All deposits of `user_id`, ordered by start date then bank name.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<FixedDeposit>> {
        let prefix = format!("{user_id}/");
        let mut deposits = self
            .deposits
            .scan_prefix(prefix.as_bytes())
            .await?
            .into_iter()
            .map(|(_, raw)| serde_json::from_slice::<FixedDeposit>(&raw))
            .collect::<Result<Vec<_>, _>>()
            .context("Corrupt deposit record")?;

        deposits.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.bank_name.cmp(&b.bank_name))
        });
        Ok(deposits)
    }

    /// Finds a deposit by its full id or by a prefix that matches exactly one deposit.
    pub async fn find(&self, user_id: &str, id_or_prefix: &str) -> Result<Option<FixedDeposit>> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            bail!("Deposit id must not be empty");
        }

        let matches: Vec<_> = self
            .list_for_user(user_id)
            .await?
            .into_iter()
            .filter(|deposit| deposit.id.starts_with(needle))
            .collect();

        match matches.len() {
            0 | 1 => Ok(matches.into_iter().next()),
            n => bail!("Deposit id '{needle}' is ambiguous ({n} matches); use more characters"),
        }
    }

    /// Removes the deposit matching `id_or_prefix`. Returns the removed record.
    pub async fn remove(&self, user_id: &str, id_or_prefix: &str) -> Result<Option<FixedDeposit>> {
        let Some(deposit) = self.find(user_id, id_or_prefix).await? else {
            return Ok(None);
        };
        self.deposits
            .remove(Self::key(user_id, &deposit.id).as_bytes())
            .await?;
        debug!("Removed deposit {} for user {}", deposit.id, user_id);
        Ok(Some(deposit))
    }
}
