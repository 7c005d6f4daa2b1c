//! Postgres implementation of the store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::{NewUser, Store, StoreError, User, WikiPage};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        email: row.get("email"),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let query = "SELECT id, name, password_hash, email FROM users WHERE name = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(name)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = "SELECT id, name, password_hash, email FROM users WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn save_user(&self, user: NewUser) -> Result<Uuid, StoreError> {
        let query = r"
            INSERT INTO users
                (name, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING id
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(row.get("id")),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_page_by_title(&self, title: &str) -> Result<Option<WikiPage>, StoreError> {
        let query = "SELECT title, text, last_modified FROM pages WHERE title = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(title)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| WikiPage {
            title: row.get("title"),
            text: row.get("text"),
            last_modified: row.get("last_modified"),
        }))
    }

    async fn save_page(&self, title: &str, text: &str) -> Result<(), StoreError> {
        // Full replace; concurrent submissions resolve last-write-wins
        let query = r"
            INSERT INTO pages
                (title, text, last_modified)
            VALUES ($1, $2, NOW())
            ON CONFLICT (title) DO UPDATE
                SET text = EXCLUDED.text, last_modified = NOW()
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(title)
            .bind(text)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }
}
