use crate::error::{AppError, AppResult};
use serde::Deserialize;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProviderKind {
    /// Trusts the `x-user-id` header. Local development and tests only.
    Mock,
    Jwt,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    /// Unset selects the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub database_min_connections: u32,
    #[serde(default = "default_connection_timeout")]
    pub database_connection_timeout: u64,

    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_identity_provider")]
    pub identity_provider: IdentityProviderKind,
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_expires")]
    pub jwt_access_token_expires_in: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_bulk_max_items")]
    pub bulk_max_items: usize,
    #[serde(default = "default_bulk_batch_size")]
    pub bulk_batch_size: usize,
    #[serde(default = "default_bulk_item_timeout_ms")]
    pub bulk_item_timeout_ms: u64,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub provider: IdentityProviderKind,
    pub jwt_secret: String,
    pub access_token_expires_in: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Limits applied to one bulk shift request.
#[derive(Clone, Debug)]
pub struct BulkConfig {
    pub max_items: usize,
    pub batch_size: usize,
    pub item_timeout_ms: u64,
}

// Default value functions
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connection_timeout() -> u64 {
    30
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    4000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_identity_provider() -> IdentityProviderKind {
    IdentityProviderKind::Mock
}
fn default_jwt_secret() -> String {
    "your-secret-key".to_string()
}
fn default_access_token_expires() -> u64 {
    3600
} // 1 hour
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_bulk_max_items() -> usize {
    200
}
fn default_bulk_batch_size() -> usize {
    20
}
fn default_bulk_item_timeout_ms() -> u64 {
    10_000
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Builds the config from explicit `KEY=value` pairs, applying defaults.
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS must be > 0".to_string(),
            ));
        }

        if self.database_min_connections > self.database_max_connections {
            return Err(AppError::Config(
                "DATABASE_MIN_CONNECTIONS cannot be greater than DATABASE_MAX_CONNECTIONS"
                    .to_string(),
            ));
        }

        if self.identity_provider == IdentityProviderKind::Jwt
            && self.jwt_secret == default_jwt_secret()
        {
            return Err(AppError::Config(
                "JWT_SECRET must be set to a secure value".to_string(),
            ));
        }

        if self.jwt_access_token_expires_in == 0 {
            return Err(AppError::Config(
                "JWT_ACCESS_TOKEN_EXPIRES_IN must be > 0".to_string(),
            ));
        }

        if self.bulk_max_items == 0 || self.bulk_batch_size == 0 {
            return Err(AppError::Config(
                "BULK_MAX_ITEMS and BULK_BATCH_SIZE must be > 0".to_string(),
            ));
        }

        if self.bulk_item_timeout_ms == 0 {
            return Err(AppError::Config(
                "BULK_ITEM_TIMEOUT_MS must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// `None` when no database is configured.
    pub fn database(&self) -> Option<DatabaseConfig> {
        self.database_url.as_ref().map(|url| DatabaseConfig {
            url: url.clone(),
            max_connections: self.database_max_connections,
            min_connections: self.database_min_connections,
            connection_timeout: self.database_connection_timeout,
        })
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
            cors_origins: self.cors_origins.clone(),
        }
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            provider: self.identity_provider,
            jwt_secret: self.jwt_secret.clone(),
            access_token_expires_in: self.jwt_access_token_expires_in,
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
        }
    }

    pub fn bulk(&self) -> BulkConfig {
        BulkConfig {
            max_items: self.bulk_max_items,
            batch_size: self.bulk_batch_size,
            item_timeout_ms: self.bulk_item_timeout_ms,
        }
    }
}
