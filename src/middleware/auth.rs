use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::validate_jwt;
use crate::database::models::Account;
use crate::error::ApiError;
use crate::services::AccountService;

/// Account resolved from the bearer token, injected into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser(pub Account);

/// JWT authentication middleware: verifies the token, loads the account it
/// names and attaches it to the request. Anything short of that is a 401.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, &state.config.security.jwt_secret).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        ApiError::unauthorized("token invalid")
    })?;

    let account = AccountService::new(state.store.clone())
        .resolve(claims.id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown account {} ({})", claims.id, claims.username);
            ApiError::unauthorized("user not found")
        })?;

    tracing::debug!("Resolved account {} ({})", account.username, account.id);
    request.extensions_mut().insert(AuthUser(account));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "token missing".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => {
            let token = auth_str[7..].trim();
            if token.is_empty() {
                return Err("token missing".to_string());
            }
            Ok(token.to_string())
        }
        _ => Err("Authorization header must use Bearer token format".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(extract_jwt_from_headers(&headers("bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
        assert!(extract_jwt_from_headers(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_jwt_from_headers(&headers("Bearer   ")).is_err());
        assert!(extract_jwt_from_headers(&headers("Bear")).is_err());
    }
}
