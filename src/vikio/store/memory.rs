//! In-memory implementation of the store.
//!
//! Same semantics as Postgres but nothing survives a drop. Used by the
//! handler and flow tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{NewUser, Store, StoreError, User, WikiPage};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Users indexed by id.
    users: HashMap<Uuid, User>,

    /// Pages indexed by title (exact, case-sensitive).
    pages: HashMap<String, WikiPage>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.users.values().find(|u| u.name == name).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.users.get(&id).cloned())
    }

    async fn save_user(&self, user: NewUser) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        if inner.users.values().any(|u| u.name == user.name) {
            return Err(StoreError::Conflict);
        }

        let id = Uuid::new_v4();
        inner.users.insert(
            id,
            User {
                id,
                name: user.name,
                password_hash: user.password_hash,
                email: user.email,
            },
        );

        Ok(id)
    }

    async fn find_page_by_title(&self, title: &str) -> Result<Option<WikiPage>, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.pages.get(title).cloned())
    }

    async fn save_page(&self, title: &str, text: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.pages.insert(
            title.to_string(),
            WikiPage {
                title: title.to_string(),
                text: text.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewUser {
        NewUser {
            name: "alice".to_string(),
            password_hash: "salt,digest".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn save_user_assigns_id_and_enforces_uniqueness() {
        let store = MemoryStore::new();

        let id = store.save_user(alice()).await.unwrap();
        let found = store.find_user_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "alice");

        assert!(matches!(
            store.save_user(alice()).await,
            Err(StoreError::Conflict)
        ));
    }

    #[tokio::test]
    async fn title_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store.save_page("Home", "Hi").await.unwrap();

        assert!(store.find_page_by_title("Home").await.unwrap().is_some());
        assert!(store.find_page_by_title("home").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_page_is_full_replace() {
        let store = MemoryStore::new();
        store.save_page("Home", "first").await.unwrap();
        store.save_page("Home", "second").await.unwrap();

        let page = store.find_page_by_title("Home").await.unwrap().unwrap();
        assert_eq!(page.text, "second");
    }
}
