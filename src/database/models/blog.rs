use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Account;

/// A posted blog entry. The owner is fixed at creation; everything in
/// `payload` is replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_id")]
    pub owner_id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub payload: BlogPayload,
}

/// Mutable fields of a blog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BlogPayload {
    pub title: String,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: i64,
}

/// Raw request body for create/update. Every field is optional here so that
/// missing fields can be reported as bad requests instead of extractor errors.
/// Unknown keys such as `id` or `user` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogBody {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Public fields of a blog's owner, inlined into populated listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogOwner {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

impl From<Account> for BlogOwner {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            name: account.name,
        }
    }
}

/// A blog with its owner expanded in place of the bare owner id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedBlog {
    pub id: Uuid,
    pub user: Option<BlogOwner>,
    #[serde(flatten)]
    pub payload: BlogPayload,
}

impl Blog {
    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.owner_id == account_id
    }
}
