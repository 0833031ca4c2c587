use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, User, UserProfile};
use crate::infrastructure::security::{
    SessionIdentity, generate_token, hash_password, verify_password,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl_secs: u64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl_secs,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register_user(&self, req: CreateUser) -> Result<UserProfile> {
        trace!("Starting user registration");
        let req = req.normalize()?;

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            email: req.email,
            password_hash,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.create_user(user.clone()).await?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        Ok(user.into())
    }

    /// Checks the credentials and issues a session token.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<(UserProfile, String)> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_email(req.email.trim())
            .await?
            .ok_or_else(|| {
                warn!("User not found during login");
                DomainError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
        }

        let identity = SessionIdentity {
            user_id: user.id.clone(),
            email: user.email.clone(),
        };
        let token = generate_token(&identity, &self.jwt_secret, self.token_ttl_secs).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = %user.id, "Login successful");
        Ok((user.into(), token))
    }

    /// Profile of the calling user. `None` for anonymous callers.
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Option<&str>) -> Result<Option<UserProfile>> {
        let Some(user_id) = user_id else {
            trace!("Anonymous profile request");
            return Ok(None);
        };

        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = user_id, "Session names a user that does not exist");
                DomainError::Unauthorized("Session user no longer exists".to_string())
            })?;

        Ok(Some(user.into()))
    }

    /// Fails with `Unauthorized` unless `user_id` names a stored user.
    pub async fn ensure_user_exists(&self, user_id: &str) -> Result<()> {
        self.profile(Some(user_id)).await.map(|_| ())
    }
}
