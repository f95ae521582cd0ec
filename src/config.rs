//! Application configuration loaded from environment variables.

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use tracing_subscriber::EnvFilter;

use crate::error::TodoError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Database ===
    /// Postgres host.
    #[serde(default = "default_db_host")]
    pub db_host: String,

    /// Postgres port.
    #[serde(default = "default_db_port")]
    pub db_port: u16,

    /// Postgres user.
    #[serde(default = "default_db_user")]
    pub db_user: String,

    /// Postgres password.
    #[serde(default)]
    pub db_password: String,

    /// Database name.
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    /// Create the `list` table at startup if it is missing.
    #[serde(default = "default_true")]
    pub db_init_schema: bool,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: `text` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "todo".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    8081
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_host: default_db_host(),
            db_port: default_db_port(),
            db_user: default_db_user(),
            db_password: String::new(),
            db_name: default_db_name(),
            db_max_connections: default_max_connections(),
            db_init_schema: default_true(),
            port: default_port(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Load configuration and reject it if it fails [`Config::validate`].
    pub fn load_validated() -> crate::Result<Self> {
        let config = Self::load()?;
        config.validate().map_err(TodoError::InvalidConfig)?;
        Ok(config)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.db_host.is_empty() {
            return Err("DB_HOST must not be empty".to_string());
        }

        if self.db_user.is_empty() {
            return Err("DB_USER must not be empty".to_string());
        }

        if self.db_name.is_empty() {
            return Err("DB_NAME must not be empty".to_string());
        }

        if self.db_port == 0 {
            return Err("DB_PORT must be non-zero".to_string());
        }

        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err("LOG_FORMAT must be `text` or `json`".to_string());
        }

        Ok(())
    }

    /// Connection options for the Postgres pool.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    /// Log filter built from `RUST_LOG`, falling back to `info` if it does not parse.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.rust_log).unwrap_or_else(|_| EnvFilter::new(default_log_level()))
    }

    /// Whether logs should be emitted as JSON.
    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }

    /// Password with everything but its length hidden, for diagnostics.
    pub fn masked_password(&self) -> String {
        "*".repeat(self.db_password.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        let config = Config::default();
        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_port, 5432);
        assert_eq!(config.port, 8081);
        assert!(config.db_init_schema);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_host() {
        let config = Config {
            db_host: "".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_pool() {
        let config = Config {
            db_max_connections: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_log_format() {
        let config = Config {
            log_format: "xml".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_from_env_pairs() {
        let vars = vec![
            ("DB_HOST".to_string(), "postgres".to_string()),
            ("DB_PORT".to_string(), "6543".to_string()),
            ("DB_INIT_SCHEMA".to_string(), "false".to_string()),
        ];

        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.db_host, "postgres");
        assert_eq!(config.db_port, 6543);
        assert!(!config.db_init_schema);
        assert_eq!(config.db_name, "todo");
    }

    #[test]
    fn log_filter_uses_rust_log() {
        assert_eq!(Config::default().log_filter().to_string(), "info");

        let config = Config {
            rust_log: "todo_api=debug".to_string(),
            ..Config::default()
        };
        assert!(config.log_filter().to_string().contains("todo_api=debug"));
    }

    #[test]
    fn masked_password_hides_content() {
        let config = Config {
            db_password: "secret".to_string(),
            ..Config::default()
        };

        assert_eq!(config.masked_password(), "******");
    }
}
