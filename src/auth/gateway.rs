//! Auth Gateway
//! Mission: Orchestrate registration, login, and per-request auth decisions

use crate::auth::jwt::TokenService;
use crate::auth::models::{Claims, CreateUserRequest, RegisterRequest, Role, User};
use crate::auth::password::{validate_password, PasswordHasher};
use crate::auth::policy::{self, Action};
use crate::auth::user_store::{NewUser, UserStore};
use crate::error::{ApiError, AuthErrorKind};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 50;
const FULL_NAME_MAX_CHARS: usize = 100;

/// Composes the hasher, store, token service, and policy into the request
/// state machine:
///
/// `NoToken -> TokenPresent -> {ClaimsValid, ClaimsInvalid(401)}
///  -> {Authorized(admit), Forbidden(403)}`
///
/// This is the only layer whose errors get translated into transport
/// outcomes (via `IntoResponse` on [`ApiError`]).
#[derive(Clone)]
pub struct AuthGateway {
    store: Arc<UserStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AuthGateway {
    pub fn new(store: Arc<UserStore>, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self {
            store,
            tokens,
            hasher,
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.tokens.ttl_secs()
    }

    /// Self-service registration. The role is always forced to `User`, no
    /// matter what the caller supplied at the transport layer.
    pub fn register(&self, candidate: RegisterRequest) -> Result<User, ApiError> {
        validate_username(&candidate.username)?;
        validate_email(&candidate.email)?;
        validate_full_name(candidate.full_name.as_deref())?;
        validate_password(&candidate.password)?;

        let password_hash = self.hasher.hash(&candidate.password)?;
        let user = self.store.create(NewUser {
            username: candidate.username,
            email: candidate.email,
            full_name: candidate.full_name,
            password_hash,
            role: Role::User,
        })?;

        info!("✅ Registered user: {} (user)", user.username);
        Ok(user)
    }

    /// Login with username or email.
    ///
    /// Unknown identifier, wrong password, and deactivated account all
    /// collapse into the same `InvalidCredentials` error so the response
    /// cannot be used to enumerate accounts.
    pub fn login(&self, identifier: &str, password: &str) -> Result<(String, u64), ApiError> {
        let user = self
            .store
            .find_by_username(identifier)
            .or_else(|| self.store.find_by_email(identifier));

        let Some(user) = user else {
            warn!("❌ Failed login attempt: {identifier}");
            return Err(ApiError::Auth(AuthErrorKind::InvalidCredentials));
        };

        if !self.hasher.verify(password, &user.password_hash) || !user.is_active {
            warn!("❌ Failed login attempt: {identifier}");
            return Err(ApiError::Auth(AuthErrorKind::InvalidCredentials));
        }

        let (token, expires_in) = self.tokens.issue(&user)?;
        info!("✅ Login successful: {} ({})", user.username, user.role.as_str());
        Ok((token, expires_in))
    }

    /// Validate a bearer token and confirm the subject is still a live,
    /// active account. Any failure here ends the request at ClaimsInvalid.
    pub fn authenticate(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.tokens.validate(token)?;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Auth(AuthErrorKind::Malformed))?;
        let user = self
            .store
            .find_by_id(id)
            .ok_or(ApiError::Auth(AuthErrorKind::InvalidCredentials))?;

        if !user.is_active {
            return Err(ApiError::Forbidden);
        }

        Ok(claims)
    }

    /// Role gate. `false` from the policy table is a Forbidden outcome.
    pub fn authorize(&self, claims: &Claims, action: Action) -> Result<(), ApiError> {
        if policy::is_allowed(Some(claims.role), action) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    /// Look up the authenticated caller's own record.
    pub fn current_user(&self, claims: &Claims) -> Result<User, ApiError> {
        let id = subject_id(claims)?;
        self.store.find_by_id(id).ok_or(ApiError::NotFound("user"))
    }

    /// Change the caller's own password.
    ///
    /// The current password is re-verified against the stored hash even
    /// though the claims already prove identity: a stolen token alone must
    /// not be enough to take over the account.
    pub fn change_own_password(
        &self,
        claims: &Claims,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let user = self.current_user(claims)?;

        if !self.hasher.verify(current_password, &user.password_hash) {
            warn!("❌ Password change with wrong current password: {}", user.username);
            return Err(ApiError::Auth(AuthErrorKind::InvalidCredentials));
        }

        validate_password(new_password)?;
        let new_hash = self.hasher.hash(new_password)?;
        self.store.update(user.id, |u| {
            u.password_hash = new_hash;
        })?;

        info!("🔑 Password changed: {}", user.username);
        Ok(())
    }

    /// Admin-only creation: full validation, role assignable by the caller.
    /// The HTTP layer has already required `Action::AdminManageUsers`.
    pub fn admin_create_user(&self, candidate: CreateUserRequest) -> Result<User, ApiError> {
        validate_username(&candidate.username)?;
        validate_email(&candidate.email)?;
        validate_full_name(candidate.full_name.as_deref())?;
        validate_password(&candidate.password)?;

        let password_hash = self.hasher.hash(&candidate.password)?;
        let user = self.store.create(NewUser {
            username: candidate.username,
            email: candidate.email,
            full_name: candidate.full_name,
            password_hash,
            role: candidate.role,
        })?;

        info!("✅ Admin created user: {} ({})", user.username, user.role.as_str());
        Ok(user)
    }

    pub fn admin_list_users(&self) -> Vec<User> {
        self.store.list_all()
    }

    /// Admin deletion, with one extra rule the store does not know about: an
    /// admin may not delete its own account and lock itself out.
    pub fn admin_delete_user(&self, claims: &Claims, target: Uuid) -> Result<(), ApiError> {
        if subject_id(claims)? == target {
            return Err(ApiError::SelfDelete);
        }
        self.store.delete(target)
    }
}

fn subject_id(claims: &Claims) -> Result<Uuid, ApiError> {
    Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Auth(AuthErrorKind::Malformed))
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let chars = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&chars) {
        return Err(ApiError::validation(
            "username",
            format!("Username must be {USERNAME_MIN_CHARS}-{USERNAME_MAX_CHARS} characters"),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::validation(
            "username",
            "Username may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::validation("email", "Invalid email address");

    if email.len() > 254 || email.chars().any(|c| c.is_whitespace()) {
        return Err(invalid());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

fn validate_full_name(full_name: Option<&str>) -> Result<(), ApiError> {
    if let Some(name) = full_name {
        if name.chars().count() > FULL_NAME_MAX_CHARS {
            return Err(ApiError::validation(
                "full_name",
                format!("Full name must be at most {FULL_NAME_MAX_CHARS} characters"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::DEFAULT_TTL_SECS;
    use crate::auth::password::MIN_COST;

    const TEST_SECRET: &[u8] = b"test-secret-key-minimum-32-characters";

    fn test_gateway() -> AuthGateway {
        let hasher = PasswordHasher::new(MIN_COST);
        let store = Arc::new(UserStore::bootstrap(&hasher).unwrap());
        let tokens = Arc::new(TokenService::new(TEST_SECRET, DEFAULT_TTL_SECS));
        AuthGateway::new(store, tokens, hasher)
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "SecurePass123!".to_string(),
            full_name: None,
        }
    }

    fn login_claims(gateway: &AuthGateway, username: &str, password: &str) -> Claims {
        let (token, _) = gateway.login(username, password).unwrap();
        gateway.authenticate(&token).unwrap()
    }

    #[test]
    fn test_register_forces_user_role() {
        let gateway = test_gateway();
        let user = gateway
            .register(register_request("newuser", "n@example.com"))
            .unwrap();

        assert_eq!(user.role, Role::User);
        assert_eq!(user.username, "newuser");
        assert!(user.is_active);
    }

    #[test]
    fn test_register_short_password_rejected_before_store_write() {
        let gateway = test_gateway();
        let before = gateway.store().len();

        let err = gateway
            .register(RegisterRequest {
                username: "newuser".to_string(),
                email: "n@example.com".to_string(),
                password: "short1A".to_string(), // 7 chars
                full_name: None,
            })
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation { field: "password", .. }));
        assert_eq!(gateway.store().len(), before, "no store write on policy violation");
    }

    #[test]
    fn test_register_validates_username_and_email() {
        let gateway = test_gateway();

        let err = gateway
            .register(register_request("ab", "ok@example.com"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "username", .. }));

        let err = gateway
            .register(register_request("has space", "ok@example.com"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "username", .. }));

        for bad_email in ["plainaddress", "@no-local.com", "trailing@dot.", "no-domain@"] {
            let err = gateway
                .register(register_request("gooduser", bad_email))
                .unwrap_err();
            assert!(
                matches!(err, ApiError::Validation { field: "email", .. }),
                "email {bad_email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_duplicate_registration_conflicts() {
        let gateway = test_gateway();
        let err = gateway
            .register(register_request("testuser", "fresh@example.com"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_login_by_username_and_email() {
        let gateway = test_gateway();
        assert!(gateway.login("testuser", "User123!").is_ok());
        assert!(gateway.login("user@example.com", "User123!").is_ok());
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let gateway = test_gateway();

        // Wrong password for a real user vs. a user that does not exist:
        // same error, nothing NotFound-flavored.
        let wrong_password = gateway.login("testuser", "WrongPass1!").unwrap_err();
        let unknown_user = gateway.login("nobody", "WrongPass1!").unwrap_err();

        assert_eq!(wrong_password, ApiError::Auth(AuthErrorKind::InvalidCredentials));
        assert_eq!(unknown_user, ApiError::Auth(AuthErrorKind::InvalidCredentials));
    }

    #[test]
    fn test_inactive_user_cannot_login() {
        let gateway = test_gateway();
        let user = gateway.store().find_by_username("testuser").unwrap();
        gateway.store().update(user.id, |u| u.is_active = false).unwrap();

        let err = gateway.login("testuser", "User123!").unwrap_err();
        assert_eq!(err, ApiError::Auth(AuthErrorKind::InvalidCredentials));
    }

    #[test]
    fn test_authenticate_roundtrip() {
        let gateway = test_gateway();
        let claims = login_claims(&gateway, "admin", "Admin123!");

        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_authenticate_rejects_deleted_subject() {
        let gateway = test_gateway();
        let user = gateway
            .register(register_request("doomed", "doomed@example.com"))
            .unwrap();
        let (token, _) = gateway.login("doomed", "SecurePass123!").unwrap();

        gateway.store().delete(user.id).unwrap();

        let err = gateway.authenticate(&token).unwrap_err();
        assert_eq!(err, ApiError::Auth(AuthErrorKind::InvalidCredentials));
    }

    #[test]
    fn test_authenticate_rejects_deactivated_subject() {
        let gateway = test_gateway();
        let user = gateway.store().find_by_username("testuser").unwrap();
        let (token, _) = gateway.login("testuser", "User123!").unwrap();

        gateway.store().update(user.id, |u| u.is_active = false).unwrap();

        assert_eq!(gateway.authenticate(&token).unwrap_err(), ApiError::Forbidden);
    }

    #[test]
    fn test_authorize_maps_policy_to_forbidden() {
        let gateway = test_gateway();
        let user_claims = login_claims(&gateway, "testuser", "User123!");
        let admin_claims = login_claims(&gateway, "admin", "Admin123!");

        assert!(gateway.authorize(&user_claims, Action::Predict).is_ok());
        assert_eq!(
            gateway
                .authorize(&user_claims, Action::AdminManageUsers)
                .unwrap_err(),
            ApiError::Forbidden
        );
        assert!(gateway.authorize(&admin_claims, Action::AdminManageUsers).is_ok());
    }

    #[test]
    fn test_change_own_password_requires_current() {
        let gateway = test_gateway();
        let claims = login_claims(&gateway, "testuser", "User123!");

        let err = gateway
            .change_own_password(&claims, "NotTheOldOne1!", "Replacement123!")
            .unwrap_err();
        assert_eq!(err, ApiError::Auth(AuthErrorKind::InvalidCredentials));

        // Old password still works - nothing was changed.
        assert!(gateway.login("testuser", "User123!").is_ok());
    }

    #[test]
    fn test_change_own_password_happy_path() {
        let gateway = test_gateway();
        let claims = login_claims(&gateway, "testuser", "User123!");

        gateway
            .change_own_password(&claims, "User123!", "Replacement123!")
            .unwrap();

        assert!(gateway.login("testuser", "Replacement123!").is_ok());
        let err = gateway.login("testuser", "User123!").unwrap_err();
        assert_eq!(err, ApiError::Auth(AuthErrorKind::InvalidCredentials));
    }

    #[test]
    fn test_change_own_password_validates_new_password() {
        let gateway = test_gateway();
        let claims = login_claims(&gateway, "testuser", "User123!");

        let err = gateway
            .change_own_password(&claims, "User123!", "weak")
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "password", .. }));
    }

    #[test]
    fn test_admin_create_user_assigns_role() {
        let gateway = test_gateway();
        let created = gateway
            .admin_create_user(CreateUserRequest {
                username: "second-admin".to_string(),
                email: "second@example.com".to_string(),
                password: "SecurePass123!".to_string(),
                full_name: Some("Second Admin".to_string()),
                role: Role::Admin,
            })
            .unwrap();

        assert_eq!(created.role, Role::Admin);
    }

    #[test]
    fn test_admin_cannot_delete_self() {
        let gateway = test_gateway();
        let claims = login_claims(&gateway, "admin", "Admin123!");
        let admin = gateway.store().find_by_username("admin").unwrap();

        let err = gateway.admin_delete_user(&claims, admin.id).unwrap_err();
        assert_eq!(err, ApiError::SelfDelete);

        // The record remains.
        assert!(gateway.store().find_by_id(admin.id).is_some());
    }

    #[test]
    fn test_admin_delete_other_user() {
        let gateway = test_gateway();
        let claims = login_claims(&gateway, "admin", "Admin123!");
        let target = gateway.store().find_by_username("testuser").unwrap();

        gateway.admin_delete_user(&claims, target.id).unwrap();
        assert!(gateway.store().find_by_id(target.id).is_none());

        let err = gateway.admin_delete_user(&claims, target.id).unwrap_err();
        assert_eq!(err, ApiError::NotFound("user"));
    }
}
