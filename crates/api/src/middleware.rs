use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use cardfolio_common::verify_user_token;

use crate::response::AppError;
use crate::utils::extract_bearer_token;
use crate::GlobalState;

/// Resolves the caller's user id from the bearer token.
pub fn authorize(headers: &HeaderMap, secret_salt: &str) -> Result<i64, AppError> {
    let token = extract_bearer_token(headers)?;
    verify_user_token(&token, secret_salt)
        .map_err(|e| AppError::new(StatusCode::UNAUTHORIZED, e))
}

/// Rejects unauthenticated requests and hands the user id (`i64`) to handlers as an extension.
pub async fn authenticate(
    State(state): State<GlobalState>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let user_id = authorize(req.headers(), state.secret_salt())?;

    req.extensions_mut().insert(user_id);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue};
    use cardfolio_common::sign_user_token;

    use super::*;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();
        headers.insert(header::AUTHORIZATION, value);
        headers
    }

    #[test]
    fn valid_token_yields_user_id() {
        let token = sign_user_token(42, "salt");
        assert_eq!(authorize(&bearer(&token), "salt").unwrap(), 42);
    }

    #[test]
    fn forged_token_is_unauthorized() {
        let token = sign_user_token(42, "other salt");
        let err = authorize(&bearer(&token), "salt").unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);

        let err = authorize(&bearer("42.deadbeef"), "salt").unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }
}
