use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::{Blog, BlogBody, PopulatedBlog};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Inline the owner's `{id, username, name}` as `user`
    #[serde(default)]
    pub populate: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BlogListing {
    Stored(Vec<Blog>),
    Populated(Vec<PopulatedBlog>),
}

/// GET /api/blogs[?populate=true]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<BlogListing> {
    let listing = if params.populate {
        BlogListing::Populated(state.blogs().list_populated().await?)
    } else {
        BlogListing::Stored(state.blogs().list().await?)
    };
    Ok(ApiResponse::success(listing))
}

/// GET /api/blogs/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Blog> {
    let blog = state.blogs().read(&id).await?;
    Ok(ApiResponse::success(blog))
}

/// POST /api/blogs - create a blog owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(account)): Extension<AuthUser>,
    payload: Result<Json<BlogBody>, JsonRejection>,
) -> ApiResult<Blog> {
    let Json(body) = payload?;
    let blog = state.blogs().create(&account, body).await?;
    Ok(ApiResponse::created(blog))
}

/// PUT /api/blogs/:id - owner only, full replace
pub async fn update(
    State(state): State<AppState>,
    Extension(AuthUser(account)): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<BlogBody>, JsonRejection>,
) -> ApiResult<Blog> {
    let Json(body) = payload?;
    let blog = state.blogs().authorize_and_update(&account, &id, body).await?;
    Ok(ApiResponse::success(blog))
}

/// DELETE /api/blogs/:id - owner only
pub async fn delete(
    State(state): State<AppState>,
    Extension(AuthUser(account)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.blogs().authorize_and_delete(&account, &id).await?;
    Ok(ApiResponse::no_content())
}
