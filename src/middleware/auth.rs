//! Bearer token gate
//!
//! Layered over the protected routes. Requests without an `Authorization`
//! header are turned away before any token work happens; requests with an
//! invalid or expired token are turned away after validation. Everything
//! else reaches the wrapped handler untouched, with the validated
//! [`Claims`](crate::auth::Claims) available as a request extension.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, warn};
use std::sync::Arc;

use crate::error::{ApiError, AuthError};
use crate::server::AppState;

pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(value) = req
        .headers()
        .get(AUTHORIZATION)
        .filter(|value| !value.is_empty())
    else {
        warn!("Rejected {}: missing authorization header", req.uri().path());
        return Err(AuthError::MissingToken.into());
    };

    let token = bearer_token(value).ok_or_else(|| AuthError::InvalidToken("not ASCII".into()))?;
    let claims = state.tokens.validate(token).map_err(|e| {
        warn!("Rejected {}: {}", req.uri().path(), e);
        e
    })?;

    debug!("Authorized {} for {}", req.uri().path(), claims.subject());
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Token part of an `Authorization` header; a bare token is accepted too.
fn bearer_token(value: &HeaderValue) -> Option<&str> {
    let value = value.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bearer_prefix() {
        let value = HeaderValue::from_static("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&value), Some("abc.def.ghi"));
    }

    #[test]
    fn accepts_bare_token() {
        let value = HeaderValue::from_static("abc.def.ghi");
        assert_eq!(bearer_token(&value), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_non_ascii_header() {
        let value = HeaderValue::from_bytes(b"Bearer \xff").expect("header");
        assert_eq!(bearer_token(&value), None);
    }
}
