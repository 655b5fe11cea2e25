use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{Account, Blog, BlogBody, BlogOwner, BlogPayload, PopulatedBlog};
use crate::database::{parse_id, Store};
use crate::services::{present, ServiceError, ServiceResult};

/// Blog operations. Reads are public; every mutation is checked against the
/// resolved caller, who must own the blog.
///
/// No blog or account state is held between calls. Each operation fetches
/// what it needs from the store.
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn Store>,
}

impl BlogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Blog>> {
        Ok(self.store.list_blogs().await?)
    }

    /// Every blog with its owner's public fields inlined. A blog whose owner
    /// account is gone lists `user` as null.
    pub async fn list_populated(&self) -> ServiceResult<Vec<PopulatedBlog>> {
        let blogs = self.store.list_blogs().await?;
        let owners: HashMap<Uuid, BlogOwner> = self
            .store
            .list_accounts()
            .await?
            .into_iter()
            .map(|account| (account.id, BlogOwner::from(account)))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let user = owners.get(&blog.owner_id).cloned();
                PopulatedBlog {
                    id: blog.id,
                    user,
                    payload: blog.payload,
                }
            })
            .collect())
    }

    pub async fn read(&self, id: &str) -> ServiceResult<Blog> {
        let id = parse_id(id)?;
        self.find(id).await
    }

    /// Create a blog owned by `owner` and append it to the owner's references.
    pub async fn create(&self, owner: &Account, body: BlogBody) -> ServiceResult<Blog> {
        if present(body.url.clone()).is_none() || present(body.title.clone()).is_none() {
            return Err(ServiceError::BadRequest("title or url missing".to_string()));
        }
        let payload = payload_from_body(body)?;

        let blog = self.store.insert_blog(owner.id, payload).await?;
        self.store.push_blog_ref(owner.id, blog.id).await?;

        info!("Blog {} created by {}", blog.id, owner.username);
        Ok(blog)
    }

    /// Delete a blog owned by `account`, pruning the account's back-reference.
    ///
    /// The account write and the blog delete are two separate store calls,
    /// issued in that order. If the second one fails the account no longer
    /// lists a blog that still exists; nothing is rolled back.
    pub async fn authorize_and_delete(&self, account: &Account, id: &str) -> ServiceResult<()> {
        let blog = self.authorize(account, id).await?;

        self.store.prune_blog_ref(blog.owner_id, blog.id).await?;
        self.store.delete_blog(blog.id).await?;

        info!("Blog {} deleted by its owner {}", blog.id, blog.owner_id);
        Ok(())
    }

    /// Replace every mutable field of a blog owned by `account`.
    /// `id` and the owner are carried over from the stored record.
    pub async fn authorize_and_update(
        &self,
        account: &Account,
        id: &str,
        body: BlogBody,
    ) -> ServiceResult<Blog> {
        let existing = self.authorize(account, id).await?;
        let payload = payload_from_body(body)?;

        let updated = self
            .store
            .save_blog(Blog {
                id: existing.id,
                owner_id: existing.owner_id,
                payload,
            })
            .await?;

        info!("Blog {} updated by its owner {}", updated.id, updated.owner_id);
        Ok(updated)
    }

    async fn find(&self, id: Uuid) -> ServiceResult<Blog> {
        self.store
            .find_blog(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("blog {}", id)))
    }

    /// Parse, fetch and owner-check. Existence is checked before ownership.
    async fn authorize(&self, account: &Account, id: &str) -> ServiceResult<Blog> {
        let blog = self.find(parse_id(id)?).await?;

        if !blog.is_owned_by(account.id) {
            warn!(
                "Account {} attempted to modify blog {} owned by {}",
                account.id, blog.id, blog.owner_id
            );
            return Err(ServiceError::Unauthorized("Unauthorized".to_string()));
        }

        Ok(blog)
    }
}

/// Full-replace semantics: anything absent is cleared, `likes` falls back to 0.
/// Values are stored exactly as sent.
fn payload_from_body(body: BlogBody) -> ServiceResult<BlogPayload> {
    let title = body
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| ServiceError::BadRequest("title missing".to_string()))?;

    let likes = body.likes.unwrap_or(0);
    if likes < 0 {
        return Err(ServiceError::validation("likes", "likes must not be negative"));
    }

    Ok(BlogPayload {
        title,
        author: body.author,
        url: body.url,
        likes,
    })
}
