//! Local implementation of the account, profile and ledger gateways.
//!
//! Accounts and profiles live in fjall partitions; the session is a small
//! JSON document in the data directory mirroring the signed-in user.

use crate::core::accounts::{
    AccountService, ConversionLedger, DEFAULT_FAVORITES, ProfileStore,
};
use crate::core::asset::{ConversionRecord, Session, UserProfile};
use crate::core::error::{AuthError, MIN_PASSWORD_LEN, StoreError};
use crate::store::Documents;
use crate::store::disk::Collection;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

const ACCOUNTS_COLLECTION: &str = "accounts";
const PROFILES_COLLECTION: &str = "profiles";
const CONVERSIONS_COLLECTION: &str = "conversions";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct AccountRecord {
    uid: String,
    email: String,
    display_name: String,
    salt: String,
    digest: String,
    created_at: DateTime<Utc>,
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        return Err(AuthError::MalformedIdentifier);
    }
    Ok(email)
}

pub struct LocalAccounts {
    accounts: Collection,
    profiles: Collection,
    session_path: PathBuf,
}

impl LocalAccounts {
    pub fn new(documents: &Documents, data_path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            accounts: documents.collection(ACCOUNTS_COLLECTION)?,
            profiles: documents.collection(PROFILES_COLLECTION)?,
            session_path: data_path.join(SESSION_FILE),
        })
    }

    fn write_session(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.session_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.session_path, serde_json::to_vec(session)?)?;
        Ok(())
    }

    fn read_session(&self) -> Result<Option<Session>, StoreError> {
        match std::fs::read(&self.session_path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AccountService for LocalAccounts {
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakSecret);
        }
        if self.accounts.contains(&email)? {
            return Err(AuthError::AlreadyInUse);
        }

        let uid = hex::encode(rand::random::<[u8; 16]>());
        let salt = hex::encode(rand::random::<[u8; 16]>());
        let account = AccountRecord {
            uid: uid.clone(),
            email: email.clone(),
            display_name: display_name.to_string(),
            digest: digest_password(&salt, password),
            salt,
            created_at: Utc::now(),
        };
        self.accounts.put(&email, &account)?;
        debug!(%email, "Account created");

        // The account is written first; if the profile write fails the
        // account stays usable on the next login and the profile is
        // recreated on the first favorites write.
        let profile = UserProfile::new(&uid, &email, display_name, DEFAULT_FAVORITES);
        self.profiles
            .put(&uid, &profile)
            .map_err(|e| AuthError::PartialRegistration(e.to_string()))?;

        let session = Session {
            uid,
            email,
            display_name: display_name.to_string(),
        };
        self.write_session(&session)?;
        Ok(session)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email)?;
        let account: AccountRecord = self
            .accounts
            .get(&email)?
            .ok_or(AuthError::NotFound)?;

        if digest_password(&account.salt, password) != account.digest {
            return Err(AuthError::WrongCredential);
        }

        // Profile display name wins over the account record's.
        let profile: Option<UserProfile> = self.profiles.get(&account.uid)?;
        let display_name = profile
            .map(|p| p.display_name)
            .filter(|name| !name.is_empty())
            .unwrap_or(account.display_name);

        let session = Session {
            uid: account.uid,
            email,
            display_name,
        };
        self.write_session(&session)?;
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.session_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Unknown(e.to_string())),
        }
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.read_session()?)
    }
}

pub struct LocalProfiles {
    profiles: Collection,
}

impl LocalProfiles {
    pub fn new(documents: &Documents) -> Result<Self, StoreError> {
        Ok(Self {
            profiles: documents.collection(PROFILES_COLLECTION)?,
        })
    }
}

#[async_trait]
impl ProfileStore for LocalProfiles {
    async fn profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        self.profiles.get(uid)
    }

    async fn write_favorites(&self, uid: &str, favorites: &[String]) -> Result<(), StoreError> {
        // A missing profile is created on the spot; this covers anonymous
        // use and accounts whose registration-time profile write failed.
        let mut profile = self
            .profiles
            .get::<UserProfile>(uid)?
            .unwrap_or_else(|| UserProfile::new(uid, "", "Anonymous", &[]));

        profile.favorites.clear();
        for symbol in favorites {
            profile.add_favorite(symbol);
        }
        profile.updated_at = Utc::now();
        self.profiles.put(uid, &profile)
    }
}

pub struct LocalLedger {
    conversions: Collection,
}

impl LocalLedger {
    pub fn new(documents: &Documents) -> Result<Self, StoreError> {
        Ok(Self {
            conversions: documents.collection(CONVERSIONS_COLLECTION)?,
        })
    }

    fn key(owner: &str, id: &str) -> String {
        format!("{owner}/{id}")
    }
}

#[async_trait]
impl ConversionLedger for LocalLedger {
    async fn list(&self, owner: &str) -> Result<Vec<ConversionRecord>, StoreError> {
        let mut records: Vec<ConversionRecord> =
            self.conversions.scan_prefix(&format!("{owner}/"))?;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    async fn save(&self, record: &ConversionRecord) -> Result<(), StoreError> {
        let owner = record
            .owner
            .as_deref()
            .ok_or_else(|| StoreError::Other("conversion record has no owner".into()))?;
        self.conversions.put(&Self::key(owner, &record.id), record)
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError> {
        self.conversions.remove(&Self::key(owner, id))
    }

    async fn clear(&self, owner: &str) -> Result<(), StoreError> {
        let keys = self.conversions.keys_with_prefix(&format!("{owner}/"))?;
        let deletes = keys.iter().map(|key| async move {
            self.conversions.remove(key)
        });
        for result in join_all(deletes).await {
            result?;
        }
        Ok(())
    }
}
