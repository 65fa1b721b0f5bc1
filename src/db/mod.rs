//! File-backed JSON document store.
//!
//! The whole state lives in one JSON file. Every mutation re-reads the file,
//! applies the change and writes it back under the write guard; saves go to a
//! sibling `.tmp` file that is then renamed over the original.

mod chirps;
mod models;
mod tokens;
mod users;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

pub use models::{Chirp, User};
use models::{Document, RevokedToken};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    #[error("token already revoked")]
    AlreadyRevoked,
    #[error("database file i/o: {0}")]
    Storage(#[from] std::io::Error),
    #[error("database file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

pub struct Db {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Db {
    /// Open the document at `path`, creating an empty one if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let db = Self {
            path: path.into(),
            lock: RwLock::new(()),
        };
        db.ensure().await?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure(&self) -> DbResult<()> {
        let _guard = self.lock.write().await;
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "creating database file");
                self.save(&Document::default()).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored document with an empty one.
    pub async fn reset(&self) -> DbResult<()> {
        let _guard = self.lock.write().await;
        info!(path = %self.path.display(), "resetting database");
        self.save(&Document::default()).await
    }

    /// Read the full document. Callers must hold the lock.
    async fn load(&self) -> DbResult<Document> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => return Err(e.into()),
        };
        if data.is_empty() {
            return Ok(Document::default());
        }
        serde_json::from_slice(&data).map_err(DbError::Corrupt)
    }

    /// Write the full document atomically. Callers must hold the write guard.
    async fn save(&self, doc: &Document) -> DbResult<()> {
        let json = serde_json::to_vec_pretty(doc).map_err(DbError::Serialize)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(
            users = doc.users.len(),
            chirps = doc.chirps.len(),
            revoked = doc.revoked_tokens.len(),
            "document saved"
        );
        Ok(())
    }

    /// Run `f` against a snapshot under the read guard.
    async fn read<T>(&self, f: impl FnOnce(&Document) -> DbResult<T>) -> DbResult<T> {
        let _guard = self.lock.read().await;
        let doc = self.load().await?;
        f(&doc)
    }

    /// Load, mutate and save as one critical section. Nothing is written when
    /// `f` fails.
    async fn update<T>(&self, f: impl FnOnce(&mut Document) -> DbResult<T>) -> DbResult<T> {
        let _guard = self.lock.write().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.save(&doc).await?;
        Ok(out)
    }
}
