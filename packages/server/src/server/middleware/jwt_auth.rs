use crate::domains::auth::{AuthUser, Caller, JwtService};
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// JWT authentication middleware
///
/// Reads the Authorization header, verifies the token, and stores a `Caller`
/// in request extensions. Requests always continue: public reads need no
/// token, and the admin gateway decides what an anonymous or invalid caller
/// may do.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let caller = extract_caller(&request, &jwt_service);

    match &caller {
        Caller::Authenticated(user) => {
            debug!("Authenticated caller: {} (admin: {})", user.subject, user.is_admin)
        }
        Caller::InvalidToken => debug!("Bearer token failed verification"),
        Caller::Anonymous => debug!("No authentication token"),
    }

    request.extensions_mut().insert(caller);
    next.run(request).await
}

/// Extract and verify the bearer token from a request
fn extract_caller(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Caller {
    let Some(auth_header) = request.headers().get(axum::http::header::AUTHORIZATION) else {
        return Caller::Anonymous;
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Caller::InvalidToken;
    };

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return Caller::Anonymous;
    }

    match jwt_service.verify_token(token) {
        Ok(claims) => Caller::Authenticated(AuthUser::from(claims)),
        Err(_) => Caller::InvalidToken,
    }
}
