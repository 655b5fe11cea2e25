use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::models::{Account, Blog, BlogPayload, Person};
use crate::database::store::{AccountStore, BlogStore, PersonStore, Store, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        name TEXT,
        blogs UUID[] NOT NULL DEFAULT '{}'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS blogs (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES accounts(id),
        title TEXT NOT NULL,
        author TEXT,
        url TEXT,
        likes BIGINT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS persons (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        number TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed store over a shared sqlx pool
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool and make sure the tables exist
    pub async fn connect(url: &str, config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.bootstrap().await?;

        info!("Connected PostgreSQL store (max {} connections)", config.max_connections);
        Ok(store)
    }

    async fn bootstrap(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn conflict_or(err: sqlx::Error, what: impl Into<String>) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict(what.into());
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl BlogStore for PgStore {
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>> {
        let blogs = sqlx::query_as::<_, Blog>(
            "SELECT id, user_id, title, author, url, likes FROM blogs ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(blogs)
    }

    async fn find_blog(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>(
            "SELECT id, user_id, title, author, url, likes FROM blogs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(blog)
    }

    async fn insert_blog(&self, owner_id: Uuid, payload: BlogPayload) -> StoreResult<Blog> {
        let blog = sqlx::query_as::<_, Blog>(
            "INSERT INTO blogs (id, user_id, title, author, url, likes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, user_id, title, author, url, likes",
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.url)
        .bind(payload.likes)
        .fetch_one(&self.pool)
        .await?;
        Ok(blog)
    }

    async fn save_blog(&self, blog: Blog) -> StoreResult<Blog> {
        // owner (user_id) is immutable
        sqlx::query_as::<_, Blog>(
            "UPDATE blogs SET title = $2, author = $3, url = $4, likes = $5
             WHERE id = $1
             RETURNING id, user_id, title, author, url, likes",
        )
        .bind(blog.id)
        .bind(&blog.payload.title)
        .bind(&blog.payload.author)
        .bind(&blog.payload.url)
        .bind(blog.payload.likes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("blog {}", blog.id)))
    }

    async fn delete_blog(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("blog {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT id, username, name, blogs FROM accounts ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, name, blogs FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn insert_account(&self, username: &str, name: Option<&str>) -> StoreResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, username, name)
             VALUES ($1, $2, $3)
             RETURNING id, username, name, blogs",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, format!("username '{}' is taken", username)))
    }

    async fn push_blog_ref(&self, account_id: Uuid, blog_id: Uuid) -> StoreResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts
             SET blogs = CASE WHEN $2 = ANY(blogs) THEN blogs ELSE array_append(blogs, $2) END
             WHERE id = $1
             RETURNING id, username, name, blogs",
        )
        .bind(account_id)
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("account {}", account_id)))
    }

    async fn prune_blog_ref(&self, account_id: Uuid, blog_id: Uuid) -> StoreResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET blogs = array_remove(blogs, $2)
             WHERE id = $1
             RETURNING id, username, name, blogs",
        )
        .bind(account_id)
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("account {}", account_id)))
    }
}

#[async_trait]
impl PersonStore for PgStore {
    async fn list_persons(&self) -> StoreResult<Vec<Person>> {
        let persons = sqlx::query_as::<_, Person>(
            "SELECT id, name, number FROM persons ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(persons)
    }

    async fn count_persons(&self) -> StoreResult<usize> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM persons")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0.max(0) as usize)
    }

    async fn find_person(&self, id: Uuid) -> StoreResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>("SELECT id, name, number FROM persons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(person)
    }

    async fn find_person_by_name(&self, name: &str) -> StoreResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>("SELECT id, name, number FROM persons WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(person)
    }

    async fn insert_person(&self, name: &str, number: &str) -> StoreResult<Person> {
        sqlx::query_as::<_, Person>(
            "INSERT INTO persons (id, name, number) VALUES ($1, $2, $3)
             RETURNING id, name, number",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, format!("name '{}' is taken", name)))
    }

    async fn save_person(&self, person: Person) -> StoreResult<Person> {
        sqlx::query_as::<_, Person>(
            "UPDATE persons SET name = $2, number = $3 WHERE id = $1
             RETURNING id, name, number",
        )
        .bind(person.id)
        .bind(&person.name)
        .bind(&person.number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or(e, format!("name '{}' is taken", person.name)))?
        .ok_or_else(|| StoreError::NotFound(format!("person {}", person.id)))
    }

    async fn delete_person(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
