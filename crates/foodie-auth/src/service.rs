//! Authentication service: login, identity resolution and logout.

use chrono::{DateTime, Utc};
use foodie_core::error::{FoodieError, FoodieResult};
use foodie_core::models::session::CreateSession;
use foodie_core::models::user::{CreateUser, Identity, User};
use foodie_core::repository::{SessionRepository, UserRepository};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw opaque session token (return to client, not stored).
    pub session_token: String,
    /// Session ID.
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    /// Who the token speaks for.
    pub identity: Identity,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Provision an account after checking the password policy.
    pub async fn provision(&self, input: CreateUser) -> FoodieResult<User> {
        password::check_policy(&input.password, self.config.min_password_length)?;
        self.user_repo.create(input).await
    }

    /// Authenticate with username + password and open a session.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, input: LoginInput) -> FoodieResult<LoginOutput> {
        let user = match self.user_repo.get_by_username(&input.username).await {
            Ok(u) => u,
            Err(FoodieError::NotFound { .. }) => {
                debug!(username = %input.username, "Login for unknown user");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let lifetime = self.config.session_lifetime()?;
        let expires_at = Utc::now().checked_add_signed(lifetime).ok_or_else(|| {
            AuthError::Configuration("session expiry is out of range".into())
        })?;
        let raw_token = token::generate_session_token();

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                token_hash: token::hash_session_token(&raw_token),
                expires_at,
            })
            .await?;

        info!(
            user_id = %user.id,
            session_id = %session.id,
            role = %user.role,
            country = %user.country,
            "User logged in"
        );

        Ok(LoginOutput {
            session_token: raw_token,
            session_id: session.id,
            expires_at,
            identity: user.identity(),
        })
    }

    /// Resolve a raw session token to the identity it belongs to.
    ///
    /// Expired sessions are removed on sight.
    pub async fn identify(&self, session_token: &str) -> FoodieResult<Identity> {
        let token_hash = token::hash_session_token(session_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                FoodieError::NotFound { .. } => {
                    AuthError::SessionInvalid("unknown session token".into()).into()
                }
                other => other,
            })?;

        if session.expires_at <= Utc::now() {
            self.session_repo.invalidate(session.id).await?;
            debug!(session_id = %session.id, "Expired session removed");
            return Err(AuthError::SessionExpired.into());
        }

        let user = self.user_repo.get_by_id(session.user_id).await?;
        Ok(user.identity())
    }

    /// Close the session behind `session_token`. Unknown tokens are
    /// ignored.
    pub async fn logout(&self, session_token: &str) -> FoodieResult<()> {
        let token_hash = token::hash_session_token(session_token);
        match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(session) => {
                self.session_repo.invalidate(session.id).await?;
                info!(user_id = %session.user_id, session_id = %session.id, "User logged out");
                Ok(())
            }
            Err(FoodieError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Remove all expired sessions.
    pub async fn purge_expired_sessions(&self) -> FoodieResult<u64> {
        let removed = self.session_repo.cleanup_expired().await?;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }
}
