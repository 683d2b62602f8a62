use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::gateway::{
    state::AppState,
    types::{ApiError, error_codes},
};
use crate::token::{Payload, TokenError, TokenMaker};

/// Verify `Authorization: Bearer <token>` and inject the token [`Payload`]
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let payload = authorize(state.user_auth.token_maker(), auth_header)?;
    request.extensions_mut().insert(payload);
    Ok(next.run(request).await)
}

fn authorize(maker: &dyn TokenMaker, auth_header: Option<&str>) -> Result<Payload, ApiError> {
    let auth_header = auth_header.ok_or_else(|| {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            error_codes::MISSING_AUTH,
            "Missing Authorization header",
        )
    })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            error_codes::AUTH_FAILED,
            "Invalid token format",
        )
    })?;

    maker.verify_token(token).map_err(|e| {
        let code = match e {
            TokenError::Expired => error_codes::TOKEN_EXPIRED,
            _ => error_codes::AUTH_FAILED,
        };
        ApiError::new(StatusCode::UNAUTHORIZED, code, e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::JwtMaker;
    use chrono::Duration;

    fn maker() -> JwtMaker {
        JwtMaker::new("0123456789abcdef0123456789abcdef").unwrap()
    }

    #[test]
    fn test_authorize_valid_bearer() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(5)).unwrap();
        let header = format!("Bearer {}", token);

        let payload = authorize(&maker, Some(&header)).unwrap();
        assert_eq!(payload.username, "alice");
    }

    #[test]
    fn test_authorize_missing_header() {
        let err = authorize(&maker(), None).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, error_codes::MISSING_AUTH);
    }

    #[test]
    fn test_authorize_wrong_scheme() {
        let err = authorize(&maker(), Some("Basic YWxpY2U6cHc=")).unwrap_err();
        assert_eq!(err.code, error_codes::AUTH_FAILED);
    }

    #[test]
    fn test_authorize_expired() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", -Duration::minutes(5)).unwrap();
        let err = authorize(&maker, Some(&format!("Bearer {}", token))).unwrap_err();
        assert_eq!(err.code, error_codes::TOKEN_EXPIRED);
    }
}
