use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Account, Blog, BlogPayload, Person};

/// Errors from the record stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformatted id: {0}")]
    MalformedId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Parse an identifier the way the stores expect it.
pub fn parse_id(raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::MalformedId(raw.to_string()))
}

/// Blog storage. Each call is atomic for the one record it touches.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>>;

    async fn find_blog(&self, id: Uuid) -> StoreResult<Option<Blog>>;

    /// Insert a new blog; the store assigns the id.
    async fn insert_blog(&self, owner_id: Uuid, payload: BlogPayload) -> StoreResult<Blog>;

    /// Replace a stored blog. Fails with `NotFound` if it no longer exists.
    async fn save_blog(&self, blog: Blog) -> StoreResult<Blog>;

    /// Remove a blog. Fails with `NotFound` if it does not exist.
    async fn delete_blog(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;

    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Insert a new account with no blog references. `Conflict` on a taken username.
    async fn insert_account(&self, username: &str, name: Option<&str>) -> StoreResult<Account>;

    /// Append `blog_id` to the account's back-references unless it is already
    /// listed. Applied to the stored row, never to a caller's copy.
    async fn push_blog_ref(&self, account_id: Uuid, blog_id: Uuid) -> StoreResult<Account>;

    /// Remove every occurrence of `blog_id` from the account's back-references.
    async fn prune_blog_ref(&self, account_id: Uuid, blog_id: Uuid) -> StoreResult<Account>;
}

#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn list_persons(&self) -> StoreResult<Vec<Person>>;

    async fn count_persons(&self) -> StoreResult<usize>;

    async fn find_person(&self, id: Uuid) -> StoreResult<Option<Person>>;

    async fn find_person_by_name(&self, name: &str) -> StoreResult<Option<Person>>;

    async fn insert_person(&self, name: &str, number: &str) -> StoreResult<Person>;

    /// Replace a stored person. Fails with `NotFound` if it no longer exists.
    async fn save_person(&self, person: Person) -> StoreResult<Person>;

    /// Remove a person, returning whether a record was actually removed.
    async fn delete_person(&self, id: Uuid) -> StoreResult<bool>;
}

/// Everything the service needs from a backing store.
#[async_trait]
pub trait Store: BlogStore + AccountStore + PersonStore {
    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    fn backend_name(&self) -> &'static str;
}
