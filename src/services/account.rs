//! Account service implementation
//!
//! Signup, login, profile and password management, plus issuing and
//! verifying the bearer tokens that carry a session.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AuthConfig;
use crate::database::UserRepository;
use crate::models::user::{
    CreateUserRequest, LoginRequest, LoginResponse, Profile, SignupRequest,
    UpdatePasswordRequest, UpdateProfileRequest, User,
};
use crate::utils::errors::{GoalboardError, Result};

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AccountService {
    users: UserRepository,
    config: AuthConfig,
}

impl AccountService {
    pub fn new(users: UserRepository, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Register a new account
    pub async fn signup(&self, request: SignupRequest) -> Result<Profile> {
        if request.password != request.password_repeat {
            return Err(GoalboardError::Validation(
                "passwords do not match".to_string(),
            ));
        }
        validate_password(&request.password)?;

        if request.username.trim().is_empty() {
            return Err(GoalboardError::Validation("username is required".to_string()));
        }

        let create = CreateUserRequest {
            username: request.username,
            password_hash: hash_password(&request.password)?,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
        };

        let user = self.users.create(&create).await.map_err(|e| match e {
            GoalboardError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                GoalboardError::Validation("username is already taken".to_string())
            }
            e => e,
        })?;

        debug!(user_id = user.id, "Account created");
        Ok(user.into())
    }

    /// Verify credentials and issue a session token
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or(GoalboardError::AuthenticationRequired)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(GoalboardError::AuthenticationRequired);
        }

        let token = self.issue_token(&user)?;
        Ok(LoginResponse {
            profile: user.into(),
            token,
        })
    }

    /// Fetch the profile of an authenticated user
    pub async fn profile(&self, user_id: i64) -> Result<Profile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(GoalboardError::NotFound)?;

        Ok(user.into())
    }

    /// Update profile fields
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: &UpdateProfileRequest,
    ) -> Result<Profile> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(GoalboardError::NotFound)?;

        let user = self.users.update_profile(user_id, request).await?;
        Ok(user.into())
    }

    /// Change the account password after verifying the old one
    pub async fn change_password(&self, user_id: i64, request: &UpdatePasswordRequest) -> Result<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(GoalboardError::NotFound)?;

        if !verify_password(&request.old_password, &user.password_hash)? {
            return Err(GoalboardError::Validation(
                "incorrect password".to_string(),
            ));
        }
        validate_password(&request.new_password)?;

        let hash = hash_password(&request.new_password)?;
        self.users.update_password(user_id, &hash).await
    }

    /// Issue a signed bearer token for the user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let expires = chrono::Utc::now() + chrono::Duration::hours(self.config.token_ttl_hours);
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: expires.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.token_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a bearer token. Any decoding failure is an authentication
    /// failure, not an internal error.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.token_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| GoalboardError::AuthenticationRequired)?;

        Ok(data.claims)
    }
}

/// Password policy: at least 8 characters, not entirely numeric.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < 8 {
        return Err(GoalboardError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(GoalboardError::Validation(
            "password cannot be entirely numeric".to_string(),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| GoalboardError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| GoalboardError::PasswordHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(GoalboardError::PasswordHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("correct horse").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("12345678").is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }
}
