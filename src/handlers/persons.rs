use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{Person, PersonBody};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/persons
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Person>> {
    Ok(ApiResponse::success(state.persons().list().await?))
}

/// GET /api/persons/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Person> {
    Ok(ApiResponse::success(state.persons().read(&id).await?))
}

/// POST /api/persons
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<PersonBody>, JsonRejection>,
) -> ApiResult<Person> {
    let Json(body) = payload?;
    Ok(ApiResponse::success(state.persons().create(body).await?))
}

/// PUT /api/persons/:id - only the number changes
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PersonBody>, JsonRejection>,
) -> ApiResult<Person> {
    let Json(body) = payload?;
    Ok(ApiResponse::success(state.persons().update_number(&id, body).await?))
}

/// DELETE /api/persons/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.persons().delete(&id).await?;
    Ok(ApiResponse::no_content())
}
