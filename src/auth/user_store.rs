//! User Storage
//! Mission: In-memory keyed user records with uniqueness enforcement

use crate::auth::models::{Role, User};
use crate::auth::password::PasswordHasher;
use crate::error::ApiError;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Candidate record handed to [`UserStore::create`]. The password is already
/// hashed by the time it reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// In-memory user store.
///
/// Writes (create/update/delete) serialize on the write lock, so concurrent
/// registration of the same username resolves to exactly one success and one
/// conflict. Reads take the shared lock; critical sections are short enough
/// for parking_lot to win over an async lock here.
pub struct UserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl UserStore {
    /// An empty store, no bootstrap records.
    pub fn empty() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// A store pre-seeded with the two bootstrap accounts, inserted before
    /// any request is served: `admin` / `Admin123!` and `testuser` /
    /// `User123!`.
    pub fn bootstrap(hasher: &PasswordHasher) -> Result<Self, ApiError> {
        let store = Self::empty();

        store.create(NewUser {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            full_name: Some("Admin User".to_string()),
            password_hash: hasher.hash("Admin123!")?,
            role: Role::Admin,
        })?;

        store.create(NewUser {
            username: "testuser".to_string(),
            email: "user@example.com".to_string(),
            full_name: Some("Test User".to_string()),
            password_hash: hasher.hash("User123!")?,
            role: Role::User,
        })?;

        info!("🔐 Bootstrap users seeded: admin (admin), testuser (user)");
        Ok(store)
    }

    /// Insert a new user, assigning a fresh id.
    ///
    /// Uniqueness of username and email is checked under the same write lock
    /// as the insert; there is no window for a duplicate to slip through.
    pub fn create(&self, candidate: NewUser) -> Result<User, ApiError> {
        let mut users = self.users.write();

        if users.values().any(|u| u.username == candidate.username) {
            return Err(ApiError::Conflict("Username already registered".to_string()));
        }
        if users.values().any(|u| u.email == candidate.email) {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: candidate.username,
            email: candidate.email,
            full_name: candidate.full_name,
            password_hash: candidate.password_hash,
            role: candidate.role,
            is_active: true,
            created_at: Utc::now(),
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    /// Apply a field-level mutation atomically with respect to concurrent
    /// reads. Returns the updated record.
    pub fn update<F>(&self, id: Uuid, mutator: F) -> Result<User, ApiError>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write();
        let user = users.get_mut(&id).ok_or(ApiError::NotFound("user"))?;
        mutator(user);
        Ok(user.clone())
    }

    /// Remove a record permanently. Missing ids fail with NotFound - no
    /// silent success.
    pub fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let mut users = self.users.write();
        users.remove(&id).ok_or(ApiError::NotFound("user"))?;
        info!("🗑️  Deleted user: {id}");
        Ok(())
    }

    /// All records, oldest first. Authority is the gateway's concern, not the
    /// store's.
    pub fn list_all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        users
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}
