//! JWT Token Service
//! Mission: Issue and validate signed, time-bounded session tokens

use crate::auth::models::{Claims, User};
use crate::error::{ApiError, AuthErrorKind};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

/// Default session lifetime: 30 minutes.
pub const DEFAULT_TTL_SECS: i64 = 1800;

/// Token service for issuing and validating HS256 session tokens.
///
/// Keys are derived once from the process-wide secret at startup and never
/// rotated mid-process. The service holds no user state - it only encodes and
/// decodes the claims handed to it.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact: a token is invalid the second `exp` elapses.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for a user. Returns the encoded token and its lifetime
    /// in seconds.
    pub fn issue(&self, user: &User) -> Result<(String, u64), ApiError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat,
            exp: iat + self.ttl_secs,
        };

        debug!(
            username = %user.username,
            ttl_secs = self.ttl_secs,
            "Issuing session token"
        );

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))?;

        Ok((token, self.ttl_secs.max(0) as u64))
    }

    /// Validate a token: signature, structure, and expiry.
    ///
    /// The three failure kinds are distinguished for diagnostics; callers
    /// surface all of them as the same unauthorized outcome.
    pub fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let kind = match e.kind() {
                    ErrorKind::ExpiredSignature => AuthErrorKind::Expired,
                    ErrorKind::InvalidSignature => AuthErrorKind::BadSignature,
                    _ => AuthErrorKind::Malformed,
                };
                debug!(kind = kind.as_str(), "Token rejected");
                ApiError::Auth(kind)
            })
    }
}
