/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, or `*` (default: *)
/// - `PRODUCTION`: Enables HSTS and other production-only behaviour (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size ceiling (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: Idle connections kept open (default: 2)
/// - `DATABASE_ACQUIRE_TIMEOUT_SECONDS`: Wait for a free connection before failing (default: 30)
/// - `IDENTITY_JWT_SECRET`: Identity provider's token signing secret (required)
/// - `IDENTITY_ISSUER`: Expected token issuer (default: synapse)
/// - `RUN_MIGRATIONS`: Apply embedded migrations on startup (default: true)
/// - `RUST_LOG`: Log filter (default: synapse_api=debug,synapse_shared=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use synapse_api::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use synapse_shared::db::pool::PoolSize;

/// Minimum accepted length of the identity signing secret
pub const MIN_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Identity provider configuration
    pub identity: IdentityConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`["*"]` allows any)
    pub cors_origins: Vec<String>,

    /// Production mode
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Minimum number of idle connections
    pub min_connections: u32,

    /// Seconds a request waits for a free connection
    pub acquire_timeout_seconds: u64,

    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Shared secret used to verify bearer tokens
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Expected `iss` claim
    pub issuer: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_host = var_or("API_HOST", "0.0.0.0");
        let api_port = var_or("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = parse_bool("PRODUCTION", &var_or("PRODUCTION", "false"))?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;
        let min_connections = var_or("DATABASE_MIN_CONNECTIONS", "2")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MIN_CONNECTIONS is invalid: {}", e))?;

        let acquire_timeout_seconds = var_or("DATABASE_ACQUIRE_TIMEOUT_SECONDS", "30")
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("DATABASE_ACQUIRE_TIMEOUT_SECONDS is invalid: {}", e))?;

        if min_connections > max_connections {
            anyhow::bail!("DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS");
        }

        let run_migrations = parse_bool("RUN_MIGRATIONS", &var_or("RUN_MIGRATIONS", "true"))?;

        let jwt_secret = lookup("IDENTITY_JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("IDENTITY_JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_SECRET_LENGTH {
            anyhow::bail!(
                "IDENTITY_JWT_SECRET must be at least {} characters long",
                MIN_SECRET_LENGTH
            );
        }

        let issuer = var_or("IDENTITY_ISSUER", "synapse");

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                min_connections,
                acquire_timeout_seconds,
                run_migrations,
            },
            identity: IdentityConfig { jwt_secret, issuer },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool sizing for [`synapse_shared::db::pool::connect`]
    pub fn pool_size(&self) -> PoolSize {
        PoolSize {
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            acquire_timeout: Duration::from_secs(self.database.acquire_timeout_seconds),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be a boolean, got '{}'", key, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("IDENTITY_JWT_SECRET", SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&required()).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert!(!config.api.production);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 2);
        assert_eq!(config.database.acquire_timeout_seconds, 30);
        assert!(config.database.run_migrations);
        assert_eq!(config.identity.issuer, "synapse");
    }

    #[test]
    fn test_overrides() {
        let mut vars = required();
        vars.extend([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("CORS_ORIGINS", "https://app.example.com, https://admin.example.com"),
            ("PRODUCTION", "true"),
            ("RUN_MIGRATIONS", "0"),
            ("IDENTITY_ISSUER", "https://id.example.com"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(
            config.api.cors_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
        assert!(config.api.production);
        assert!(!config.database.run_migrations);
        assert_eq!(config.identity.issuer, "https://id.example.com");
    }

    #[test]
    fn test_missing_database_url() {
        let err = load(&[("IDENTITY_JWT_SECRET", SECRET)]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("IDENTITY_JWT_SECRET", "too-short"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut vars = required();
        vars.push(("API_PORT", "not-a-port"));
        assert!(load(&vars).is_err());

        let mut vars = required();
        vars.push(("PRODUCTION", "maybe"));
        assert!(load(&vars).is_err());

        let mut vars = required();
        vars.extend([("DATABASE_MAX_CONNECTIONS", "2"), ("DATABASE_MIN_CONNECTIONS", "5")]);
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_pool_size_carries_database_settings() {
        let mut vars = required();
        vars.extend([
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECONDS", "5"),
        ]);
        let size = load(&vars).unwrap().pool_size();

        assert_eq!(size.max_connections, 20);
        assert_eq!(size.min_connections, 2);
        assert_eq!(size.acquire_timeout, Duration::from_secs(5));
    }
}
