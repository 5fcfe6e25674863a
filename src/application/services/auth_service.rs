//! Authentication Service
//!
//! Verifies configured user credentials and issues bearer tokens carrying
//! the principal name and its authorities.

use std::fmt;
use std::str::FromStr;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::{JwtSettings, UserCredentials};

/// Verified in place of a real hash for unknown usernames, so a lookup miss
/// costs the same as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"unknown-user", &salt)
        .ok()
        .map(|hash| hash.to_string())
});

/// Granted permission on the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Authority {
    Read,
    Write,
}

impl Authority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Authority {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            other => Err(AuthError::Internal(format!("Unknown authority '{}'", other))),
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub authorities: Vec<Authority>,
}

impl Principal {
    pub fn has_authority(&self, authority: Authority) -> bool {
        self.authorities.contains(&authority)
    }
}

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate a configured user and issue an access token
    async fn issue_token(&self, username: &str, password: &str) -> Result<AuthToken, AuthError>;

    /// Validate an access token and extract the principal
    fn validate_token(&self, access_token: &str) -> Result<Principal, AuthError>;
}

/// Issued access token
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Granted authorities
    #[serde(default)]
    pub authorities: Vec<Authority>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// AuthService implementation backed by configured users
pub struct AuthServiceImpl {
    users: Vec<UserCredentials>,
    jwt_settings: JwtSettings,
}

impl AuthServiceImpl {
    pub fn new(users: Vec<UserCredentials>, jwt_settings: JwtSettings) -> Self {
        Self {
            users,
            jwt_settings,
        }
    }

    /// Verify a password against its hash
    fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate a signed access token
    fn generate_token(&self, username: &str, authorities: Vec<Authority>) -> Result<AuthToken, AuthError> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.jwt_settings.access_token_expiry_minutes);

        let claims = Claims {
            sub: username.to_string(),
            authorities,
            exp: expiry.timestamp(),
            iat: now.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthToken {
            access_token,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn issue_token(&self, username: &str, password: &str) -> Result<AuthToken, AuthError> {
        let user = self.users.iter().find(|u| u.username == username);

        // Argon2 is deliberately slow; keep it off the async workers.
        let hash = user.map(|u| u.password_hash.clone());
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || {
            match hash.or_else(|| DUMMY_HASH.clone()) {
                Some(hash) => Self::verify_password(&password, &hash),
                None => Ok(false),
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification failed: {}", e)))??;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::warn!(user = %username, "Rejected token request");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let authorities = user
            .authorities
            .iter()
            .map(|a| a.parse())
            .collect::<Result<Vec<Authority>, _>>()?;

        self.generate_token(&user.username, authorities)
    }

    fn validate_token(&self, access_token: &str) -> Result<Principal, AuthError> {
        let token_data = decode::<Claims>(
            access_token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(Principal {
            username: token_data.claims.sub,
            authorities: token_data.claims.authorities,
        })
    }
}
