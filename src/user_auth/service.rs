use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use super::password::{PasswordError, hash_password, verify_password};
use crate::account::{NewUser, User, UserRepository};
use crate::ledger::StoreError;
use crate::token::{Payload, TokenError, TokenMaker};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username or email already exists")]
    UserExists,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error(transparent)]
    Password(PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UserExists => "USER_EXISTS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserNotFound(_) => "USER_NOT_FOUND",
            AuthError::Password(_) => "PASSWORD_ERROR",
            AuthError::Token(TokenError::Expired) => "TOKEN_EXPIRED",
            AuthError::Token(_) => "TOKEN_ERROR",
            AuthError::Store(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::UserExists => 403,
            AuthError::InvalidCredentials => 401,
            AuthError::UserNotFound(_) => 404,
            AuthError::Token(TokenError::Expired | TokenError::Invalid) => 401,
            AuthError::Password(_) | AuthError::Token(_) | AuthError::Store(_) => 500,
        }
    }
}

/// Registration input; the password is plaintext until hashed here
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub payload: Payload,
    pub user: User,
}

pub struct UserAuthService {
    db: PgPool,
    token_maker: Arc<dyn TokenMaker>,
    access_token_duration: Duration,
}

impl UserAuthService {
    pub fn new(
        db: PgPool,
        token_maker: Arc<dyn TokenMaker>,
        access_token_duration: Duration,
    ) -> Self {
        Self {
            db,
            token_maker,
            access_token_duration,
        }
    }

    pub fn token_maker(&self) -> &dyn TokenMaker {
        self.token_maker.as_ref()
    }

    /// Register a new user
    pub async fn register(&self, req: RegisterUser) -> Result<User, AuthError> {
        let hashed_password = hash_password(&req.password).map_err(AuthError::Password)?;
        let new_user = NewUser {
            username: req.username,
            hashed_password,
            full_name: req.full_name,
            email: req.email,
        };

        match UserRepository::create(&self.db, &new_user).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "User registered");
                Ok(user)
            }
            Err(e) if e.is_unique_violation() => {
                tracing::warn!(username = %new_user.username, "Registration for existing user");
                Err(AuthError::UserExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = UserRepository::get_by_username(&self.db, username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.hashed_password).map_err(|e| match e {
            PasswordError::Mismatch => AuthError::InvalidCredentials,
            other => AuthError::Password(other),
        })?;

        let (access_token, payload) = self
            .token_maker
            .create_token(&user.username, self.access_token_duration)?;

        Ok(LoginOutcome {
            access_token,
            payload,
            user,
        })
    }

    pub async fn get_user(&self, username: &str) -> Result<User, AuthError> {
        UserRepository::get_by_username(&self.db, username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status() {
        assert_eq!(AuthError::UserExists.http_status(), 403);
        assert_eq!(AuthError::InvalidCredentials.http_status(), 401);
        assert_eq!(AuthError::Token(TokenError::Expired).http_status(), 401);
        assert_eq!(AuthError::Token(TokenError::Expired).code(), "TOKEN_EXPIRED");
        assert_eq!(
            AuthError::Store(StoreError::Unavailable("down".to_string())).http_status(),
            500
        );
    }
}
