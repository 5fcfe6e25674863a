//! Application settings and configuration structures.

use argon2::password_hash::PasswordHash;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::application::services::Authority;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// JWT signing settings
    pub jwt: JwtSettings,

    /// Users allowed to obtain tokens
    pub auth: AuthSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Spreadsheet upload limits
    pub upload: UploadSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens
    pub secret: String,

    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
}

/// A configured API user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredentials {
    pub username: String,

    /// Argon2 PHC string
    pub password_hash: String,

    /// Granted authorities, e.g. `["READ", "WRITE"]`
    pub authorities: Vec<String>,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub users: Vec<UserCredentials>,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in `APP__CORS__ALLOWED_ORIGINS`)
    pub allowed_origins: Vec<String>,
}

/// Upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Maximum size of a multipart request body in bytes (default: 10MB)
    pub max_request_bytes: usize,
}

/// `APP__SERVER__PORT=8080` -> `server.port = 8080`;
/// `APP__CORS__ALLOWED_ORIGINS=a,b` -> `cors.allowed_origins = ["a", "b"]`
fn environment_source() -> Environment {
    Environment::default()
        .prefix("APP")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
}

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.access_token_expiry_minutes", 60)?
            .set_default("auth.users", Vec::<String>::new())?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("upload.max_request_bytes", 10_485_760_i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(environment_source())
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate().map(|_| settings))
    }

    /// Check cross-field constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters for security. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt.secret.len()
            )));
        }
        if self.upload.max_request_bytes == 0 {
            return Err(ConfigError::Message(
                "upload.max_request_bytes must be greater than zero".into(),
            ));
        }
        for user in &self.auth.users {
            PasswordHash::new(&user.password_hash).map_err(|e| {
                ConfigError::Message(format!(
                    "auth.users '{}': invalid password hash: {}",
                    user.username, e
                ))
            })?;
            for authority in &user.authorities {
                authority.parse::<Authority>().map_err(|_| {
                    ConfigError::Message(format!(
                        "auth.users '{}': unknown authority '{}'",
                        user.username, authority
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
