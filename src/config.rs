//! Configuration module for the contract ingress
//! Only the binaries read configuration; validators take none

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error_handling::{ContractError, ContractResult};

/// Main configuration structure for the ingress service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request body size in bytes
    pub max_request_size: usize,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter; `RUST_LOG` takes precedence
    pub filter: String,
    /// Include the event target in log lines
    pub with_target: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8085,
            max_request_size: 1024 * 1024, // 1MB
            enable_cors: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "log_query_contract=info,tower_http=info".to_string(),
            with_target: false,
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG` if set, otherwise the configured filter
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> ContractResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| ContractError::io(path, err))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ContractResult<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|err| ContractError::configuration(format!("Failed to parse config: {}", err)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables and defaults
    pub fn from_env() -> ContractResult<Self> {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("CONTRACT_SERVER_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("CONTRACT_SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ContractError::configuration(format!("Invalid CONTRACT_SERVER_PORT: {}", port)))?;
        }

        if let Ok(enable_cors) = std::env::var("CONTRACT_ENABLE_CORS") {
            config.server.enable_cors = enable_cors.parse().map_err(|_| {
                ContractError::configuration(format!("Invalid CONTRACT_ENABLE_CORS: {}", enable_cors))
            })?;
        }

        if let Ok(filter) = std::env::var("CONTRACT_LOG_FILTER") {
            config.logging.filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ContractResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(ContractError::configuration("Server host cannot be empty"));
        }

        if self.server.port == 0 {
            return Err(ContractError::configuration("Server port cannot be 0"));
        }

        if self.server.max_request_size == 0 {
            return Err(ContractError::configuration("Maximum request size cannot be 0"));
        }

        if let Err(err) = EnvFilter::try_new(&self.logging.filter) {
            return Err(ContractError::configuration(format!(
                "Invalid logging filter '{}': {}",
                self.logging.filter, err
            )));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
