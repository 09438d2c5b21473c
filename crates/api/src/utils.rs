use anyhow::anyhow;
use axum::http::{header, HeaderMap, StatusCode};
use tracing_subscriber::EnvFilter;

use crate::response::AppError;

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers.get(header::AUTHORIZATION);

    match auth_header {
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|e| AppError::new(StatusCode::UNAUTHORIZED, anyhow!(e)))?
                .split_whitespace()
                .collect::<Vec<_>>();

            if value.len() != 2 || value[0] != "Bearer" {
                return Err(AppError::new(
                    StatusCode::UNAUTHORIZED,
                    anyhow!("invalid authorization header"),
                ));
            }

            Ok(value[1].to_string())
        }
        _ => {
            Err(AppError::new(
                StatusCode::UNAUTHORIZED,
                anyhow!("missing authorization header"),
            ))
        }
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default `info` level.
pub fn setup_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("setting default subscriber failed: {}", e))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer 7.abcd")).unwrap(), "7.abcd");
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        for value in ["Basic 7.abcd", "Bearer", "Bearer a b"] {
            let err = extract_bearer_token(&headers(value)).unwrap_err();
            assert_eq!(err.0, StatusCode::UNAUTHORIZED);
        }
        let err = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }
}
