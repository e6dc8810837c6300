//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        activity_log::ActivityAction,
        user::{CreateMemberRequest, LoginRequest, RegisterRequest, Role, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new reader account and log them in
    pub async fn register(&self, input: RegisterRequest) -> AppResult<(User, String)> {
        if self.repository.users.email_exists(&input.email).await? {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let hashed = self.hash_password(&input.password)?;
        let created = self
            .repository
            .users
            .create(&input.name, &input.email, &hashed, Role::User)
            .await?;

        self.log_activity(
            created.id,
            ActivityAction::Register,
            &format!("User {} registered", created.email),
        )
        .await;

        let token = self.issue_token(&created)?;
        Ok((created, token))
    }

    /// Authenticate by email and password. Unknown account and wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, input: LoginRequest) -> AppResult<(User, String)> {
        let user = self
            .repository
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        if !self.verify_password(&user, &input.password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        self.log_activity(
            user.id,
            ActivityAction::Login,
            &format!("User {} logged in", user.email),
        )
        .await;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Create a member on behalf of an admin; the role may be ADMIN. The
    /// audit entry is attributed to the creating admin, not the new user.
    pub async fn create_member_as_admin(
        &self,
        actor: &UserClaims,
        input: CreateMemberRequest,
    ) -> AppResult<User> {
        actor.require_admin()?;

        if self.repository.users.email_exists(&input.email).await? {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let hashed = self.hash_password(&input.password)?;
        let created = self
            .repository
            .users
            .create(
                &input.name,
                &input.email,
                &hashed,
                input.role.unwrap_or(Role::User),
            )
            .await?;

        self.log_activity(
            actor.sub,
            ActivityAction::Register,
            &format!("Admin {} created {}", actor.email, created.email),
        )
        .await;

        Ok(created)
    }

    /// List all accounts, admin only
    pub async fn list_users(&self, actor: &UserClaims) -> AppResult<Vec<User>> {
        actor.require_admin()?;
        self.repository.users.list_all().await
    }

    /// Current account behind a verified token
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Create a JWT for a user
    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a user's stored digest
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    async fn log_activity(&self, user_id: Uuid, action: ActivityAction, message: &str) {
        if let Err(e) = self
            .repository
            .activity_logs
            .append(Some(user_id), None, action, message)
            .await
        {
            tracing::warn!("Failed to append {} audit entry: {}", action, e);
        }
    }
}
