use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{Account, NewAccount};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Account>> {
    Ok(ApiResponse::success(state.accounts().list().await?))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(new) = payload?;
    let account = state.accounts().register(new).await?;
    Ok(ApiResponse::created(account))
}
