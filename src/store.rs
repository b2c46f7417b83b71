//! Persistent user data: accounts, favorite locations, search history
//!
//! Backed by an embedded fjall database with postcard-encoded records.
//! Favorites and history are small per-user lists, stored whole under a
//! single key and rewritten on change.

use anyhow::Result;
use chrono::Utc;
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::task;

use crate::SkycastError;
use crate::cache::Cache;

/// Most recent searches kept per user
const HISTORY_LIMIT: usize = 10;

/// One registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    /// Registration time, seconds since the Unix epoch
    pub created_at: i64,
}

/// One saved favorite location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRecord {
    pub id: u64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One recorded location search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub query: String,
    /// Search time, seconds since the Unix epoch
    pub timestamp: i64,
}

/// Embedded store handle; cheap to clone, all clones share the database.
#[derive(Clone)]
pub struct Store {
    users: Keyspace,
    favorites: Keyspace,
    history: Keyspace,
    meta: Keyspace,
    cache: Keyspace,
}

impl Store {
    /// Open (or create) the store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        Ok(Self {
            users: db.keyspace("users", fjall::KeyspaceCreateOptions::default)?,
            favorites: db.keyspace("favorites", fjall::KeyspaceCreateOptions::default)?,
            history: db.keyspace("history", fjall::KeyspaceCreateOptions::default)?,
            meta: db.keyspace("meta", fjall::KeyspaceCreateOptions::default)?,
            cache: db.keyspace("cache", fjall::KeyspaceCreateOptions::default)?,
        })
    }

    /// Provider response cache sharing this store's database.
    #[must_use]
    pub fn cache(&self) -> Cache {
        Cache::new(self.cache.clone())
    }

    /// Register a new account. Fails when the email is already taken.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord> {
        let users = self.users.clone();
        let meta = self.meta.clone();
        let email = email.to_string();
        let password_hash = password_hash.to_string();
        let created_at = Utc::now().timestamp();

        task::spawn_blocking(move || {
            if users.get(email.as_bytes().to_vec())?.is_some() {
                return Err(SkycastError::validation("Email already registered").into());
            }

            let id = match meta.get(b"next_user_id".to_vec())? {
                Some(bytes) => postcard::from_bytes::<u64>(&bytes.to_vec())?,
                None => 1,
            };
            meta.insert(b"next_user_id".to_vec(), postcard::to_stdvec(&(id + 1))?)?;

            let record = UserRecord {
                id,
                email: email.clone(),
                password_hash,
                created_at,
            };
            users.insert(email.into_bytes(), postcard::to_stdvec(&record)?)?;
            Ok(record)
        })
        .await?
    }

    /// Look up an account by email.
    pub async fn find_user(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.users.clone();
        let email = email.as_bytes().to_vec();

        task::spawn_blocking(move || match users.get(email)? {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes.to_vec())?)),
            None => Ok(None),
        })
        .await?
    }

    /// List a user's favorite locations.
    pub async fn list_favorites(&self, user_id: u64) -> Result<Vec<FavoriteRecord>> {
        let favorites = self.favorites.clone();

        task::spawn_blocking(move || read_list(&favorites, user_id)).await?
    }

    /// Save a favorite location and return it with its assigned id.
    pub async fn add_favorite(
        &self,
        user_id: u64,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<FavoriteRecord> {
        let favorites = self.favorites.clone();
        let name = name.to_string();

        task::spawn_blocking(move || {
            let mut records: Vec<FavoriteRecord> = read_list(&favorites, user_id)?;
            let id = records.iter().map(|f| f.id).max().unwrap_or(0) + 1;
            let record = FavoriteRecord {
                id,
                name,
                latitude,
                longitude,
            };
            records.push(record.clone());
            write_list(&favorites, user_id, &records)?;
            Ok(record)
        })
        .await?
    }

    /// Remove a favorite by id. Returns whether anything was removed.
    pub async fn remove_favorite(&self, user_id: u64, favorite_id: u64) -> Result<bool> {
        let favorites = self.favorites.clone();

        task::spawn_blocking(move || {
            let mut records: Vec<FavoriteRecord> = read_list(&favorites, user_id)?;
            let before = records.len();
            records.retain(|f| f.id != favorite_id);
            if records.len() == before {
                return Ok(false);
            }
            write_list(&favorites, user_id, &records)?;
            Ok(true)
        })
        .await?
    }

    /// Record a location search, keeping the newest entries first.
    pub async fn record_search(&self, user_id: u64, query: &str) -> Result<()> {
        let history = self.history.clone();
        let record = HistoryRecord {
            query: query.to_string(),
            timestamp: Utc::now().timestamp(),
        };

        task::spawn_blocking(move || {
            let mut records: Vec<HistoryRecord> = read_list(&history, user_id)?;
            records.insert(0, record);
            records.truncate(HISTORY_LIMIT);
            write_list(&history, user_id, &records)
        })
        .await?
    }

    /// A user's recent searches, newest first.
    pub async fn search_history(&self, user_id: u64) -> Result<Vec<HistoryRecord>> {
        let history = self.history.clone();

        task::spawn_blocking(move || read_list(&history, user_id)).await?
    }
}

fn user_key(user_id: u64) -> Vec<u8> {
    user_id.to_be_bytes().to_vec()
}

fn read_list<T: serde::de::DeserializeOwned>(keyspace: &Keyspace, user_id: u64) -> Result<Vec<T>> {
    match keyspace.get(user_key(user_id))? {
        Some(bytes) => postcard::from_bytes(&bytes.to_vec())
            .map_err(|e| SkycastError::store(format!("Corrupt record list: {e}")).into()),
        None => Ok(Vec::new()),
    }
}

fn write_list<T: Serialize>(keyspace: &Keyspace, user_id: u64, records: &[T]) -> Result<()> {
    keyspace.insert(user_key(user_id), postcard::to_stdvec(records)?)?;
    Ok(())
}
