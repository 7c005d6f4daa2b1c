//! The collaborator store: users and wiki pages behind a narrow interface.
//!
//! The core only ever talks to this trait. Postgres is the real backend;
//! the in-memory implementation exists for handler and flow tests.
//!
//! Username uniqueness is the store's job (unique index), not the
//! caller's. Racing page writes to the same title are serialized by the
//! database and resolve last-write-wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A registered user. The password hash is computed once at registration
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub password_hash: String,
    pub email: Option<String>,
}

/// A wiki page. `title` is the unique, case-sensitive lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPage {
    pub title: String,
    pub text: String,
    pub last_modified: DateTime<Utc>,
}

/// Fields needed to create a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password_hash: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint hit, e.g. a duplicate username at registration.
    #[error("record already exists")]
    Conflict,

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Exact-match lookup by username.
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Lookup by id, used to resolve the session cookie payload.
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a new user and return the assigned id.
    ///
    /// Returns [`StoreError::Conflict`] when the username is taken.
    async fn save_user(&self, user: NewUser) -> Result<Uuid, StoreError>;

    /// Exact-match (case-sensitive) lookup by title.
    async fn find_page_by_title(&self, title: &str) -> Result<Option<WikiPage>, StoreError>;

    /// Create or full-replace the page for `title`, refreshing its
    /// last-modified timestamp.
    async fn save_page(&self, title: &str, text: &str) -> Result<(), StoreError>;
}
