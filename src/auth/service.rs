//! Account lifecycle and the capability chain guarding each request.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::jwt::{JwtConfig, JwtService, TokenPair, TokenType};
use super::password::{hash_password, verify_against_dummy, verify_password};
use crate::database::{Scope, Store};
use crate::error::{AppError, Result};
use crate::models::user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, normalize_email,
    validate_email, validate_password,
};
use crate::models::{Role, User, UserResponse};

/// The authenticated caller of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Flashcards this principal may touch
    pub fn scope(&self) -> Scope {
        if self.is_admin() {
            Scope::Any
        } else {
            Scope::Owner(self.user_id)
        }
    }
}

/// One capability check in a request's authorization chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Authenticated,
    Admin,
}

pub const USER_CHAIN: &[Gate] = &[Gate::Authenticated];
pub const ADMIN_CHAIN: &[Gate] = &[Gate::Authenticated, Gate::Admin];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserResponse,
}

pub struct AuthService {
    store: Store,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(store: Store, config: JwtConfig) -> Self {
        Self {
            store,
            jwt: JwtService::new(config),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Creates a regular account
    pub fn register(&self, req: &RegisterRequest) -> Result<User> {
        let errors = req.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let email = normalize_email(&req.email);
        if self.store.find_user_by_email(&email)?.is_some() {
            return Err(AppError::DuplicateEmail { email });
        }

        let hash = hash_password(&req.password)?;
        let user = self.store.create_user(&email, &hash, Role::User, Utc::now())?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    pub fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        let email = normalize_email(&req.email);
        let Some(user) = self.store.find_user_by_email(&email)? else {
            tracing::debug!("login for unknown email");
            verify_against_dummy(&req.password);
            return Err(AppError::InvalidCredentials);
        };
        verify_password(&req.password, &user.password_hash)?;

        tracing::info!(user_id = user.id, "user logged in");
        self.respond_with_tokens(user)
    }

    /// Trades a valid refresh token for a new token pair
    pub fn refresh(&self, refresh_token: &str) -> Result<AuthResponse> {
        let claims = self.jwt.decode(refresh_token, TokenType::Refresh)?;
        let user = self.current_user(claims.user_id()?, claims.ver)?;
        self.respond_with_tokens(user)
    }

    /// Resolves an access token to the caller.
    ///
    /// Fails with `Unauthorized` if the token is missing, invalid, expired,
    /// a refresh token, stale (revoked), or its user no longer exists.
    pub fn authenticate(&self, token: Option<&str>) -> Result<Principal> {
        let token = token.ok_or(AppError::Unauthorized)?;
        let claims = self.jwt.decode(token, TokenType::Access)?;
        let user = self.current_user(claims.user_id()?, claims.ver)?;
        Ok(Principal {
            user_id: user.id,
            role: user.role,
        })
    }

    pub fn require_admin(principal: &Principal) -> Result<()> {
        if principal.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Runs `chain` in order, stopping at the first failing gate
    pub fn authorize(&self, token: Option<&str>, chain: &[Gate]) -> Result<Principal> {
        let mut principal = None;
        for gate in chain {
            match gate {
                Gate::Authenticated => principal = Some(self.authenticate(token)?),
                Gate::Admin => {
                    let caller = principal.as_ref().ok_or(AppError::Unauthorized)?;
                    Self::require_admin(caller)?;
                }
            }
        }
        principal.ok_or(AppError::Unauthorized)
    }

    /// Revokes every token the caller holds
    pub fn logout(&self, principal: &Principal) -> Result<()> {
        self.store.bump_token_version(principal.user_id)?;
        tracing::info!(user_id = principal.user_id, "user logged out");
        Ok(())
    }

    pub fn update_email(&self, principal: &Principal, req: &UpdateProfileRequest) -> Result<User> {
        let mut errors = Vec::new();
        validate_email("email", &req.email, &mut errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let email = normalize_email(&req.email);
        self.store
            .update_user_email(principal.user_id, &email, Utc::now())
    }

    /// Replaces the password, revokes old tokens and returns fresh ones
    pub fn change_password(
        &self,
        principal: &Principal,
        req: &ChangePasswordRequest,
    ) -> Result<AuthResponse> {
        let mut errors = Vec::new();
        validate_password("new_password", &req.new_password, &mut errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let user = self
            .store
            .find_user(principal.user_id)?
            .ok_or(AppError::Unauthorized)?;
        verify_password(&req.current_password, &user.password_hash)?;

        let hash = hash_password(&req.new_password)?;
        let user = self
            .store
            .update_user_password(user.id, &hash, Utc::now())?;
        tracing::info!(user_id = user.id, "password changed");
        self.respond_with_tokens(user)
    }

    pub fn set_role(&self, actor: &Principal, target_id: i64, role: Role) -> Result<User> {
        Self::require_admin(actor)?;
        if actor.user_id == target_id && role != Role::Admin {
            return Err(AppError::field(
                "role",
                "admins cannot remove their own admin role",
            ));
        }
        let user = self.store.update_user_role(target_id, role, Utc::now())?;
        tracing::info!(
            actor_id = actor.user_id,
            target_id,
            role = role.as_str(),
            "role updated"
        );
        Ok(user)
    }

    /// Deletes `target_id` and everything it owns.
    ///
    /// The deleted user's tokens stop authenticating because
    /// [`AuthService::authenticate`] requires the user row to exist.
    pub fn delete_user(&self, actor_id: i64, target_id: i64) -> Result<usize> {
        if actor_id == target_id {
            return Err(AppError::CannotDeleteSelf);
        }
        let cards = self.store.delete_user_cascade(target_id)?;
        tracing::info!(actor_id, target_id, cards, "user deleted");
        Ok(cards)
    }

    fn current_user(&self, user_id: i64, token_version: i64) -> Result<User> {
        let user = self
            .store
            .find_user(user_id)?
            .ok_or(AppError::Unauthorized)?;
        if user.token_version != token_version {
            tracing::debug!(user_id, "revoked token presented");
            return Err(AppError::Unauthorized);
        }
        Ok(user)
    }

    fn respond_with_tokens(&self, user: User) -> Result<AuthResponse> {
        let tokens = self.jwt.issue_pair(&user, Utc::now())?;
        Ok(AuthResponse {
            tokens,
            user: user.into(),
        })
    }
}

/// Creates an admin account, or promotes an existing one.
///
/// Used by the `create-admin` command; the password is only checked and
/// stored when the account does not exist yet.
pub fn create_admin(store: &Store, email: &str, password: &str) -> Result<User> {
    let email = normalize_email(email);
    if let Some(existing) = store.find_user_by_email(&email)? {
        if existing.is_admin() {
            return Ok(existing);
        }
        tracing::info!(user_id = existing.id, "promoting existing user to admin");
        return store.update_user_role(existing.id, Role::Admin, Utc::now());
    }

    let req = RegisterRequest {
        email: email.clone(),
        password: password.to_string(),
    };
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let hash = hash_password(password)?;
    let user = store.create_user(&email, &hash, Role::Admin, Utc::now())?;
    tracing::info!(user_id = user.id, "admin created");
    Ok(user)
}
