//! Authentication Middleware
//! Mission: Gate protected routes on a valid bearer token

use crate::auth::gateway::AuthGateway;
use crate::auth::models::Claims;
use crate::error::{ApiError, AuthErrorKind};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Validates the `Authorization: Bearer` token on every request passing
/// through, and stashes the verified [`Claims`] in the request extensions
/// for handlers downstream.
///
/// A missing or invalid token ends the request here with a 401; the gateway
/// keeps the failure kind for its own logs.
pub async fn auth_middleware(
    State(gateway): State<AuthGateway>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(ApiError::Auth(AuthErrorKind::InvalidCredentials))?;

    let claims = gateway.authenticate(&token)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extract claims placed by [`auth_middleware`] (use in handlers behind it).
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use axum::{body::Body, http::Request as HttpRequest};
    use uuid::Uuid;

    #[test]
    fn test_extract_claims_from_request() {
        let mut req = HttpRequest::new(Body::empty());
        assert!(extract_claims(&req).is_none());

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "test".to_string(),
            role: Role::User,
            iat: 0,
            exp: i64::MAX,
        };
        req.extensions_mut().insert(claims);

        let extracted = extract_claims(&req).unwrap();
        assert_eq!(extracted.username, "test");
        assert_eq!(extracted.role, Role::User);
    }
}
