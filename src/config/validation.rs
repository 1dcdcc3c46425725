//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    AuthConfig, CacheBackend, CacheConfig, FileSettings, LoggerSettings, ServerConfig, Settings,
    TokenConfig, UpstreamConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Minimum length of the token signing secret
const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime: one year
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 366;

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Server host is required.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl TokenConfig {
    /// Validate token configuration
    ///
    /// # Validation Rules
    /// - Secret must be at least 32 characters
    /// - Expiration must be between 1 hour and one year
    /// - Purpose must not be empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::ValidationError {
                field: "token.secret".to_string(),
                message: format!(
                    "Token secret must be at least {} characters. Set POKEDEX_TOKEN__SECRET.",
                    MIN_SECRET_LENGTH
                ),
            });
        }

        if self.expiration_hours <= 0 || self.expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(ConfigError::ValidationError {
                field: "token.expiration_hours".to_string(),
                message: format!(
                    "Token expiration must be between 1 and {} hours.",
                    MAX_EXPIRATION_HOURS
                ),
            });
        }

        if self.purpose.trim().is_empty() {
            return Err(ConfigError::validation(
                "token.purpose",
                "Token purpose must not be empty.",
            ));
        }

        Ok(())
    }
}

impl AuthConfig {
    /// Validate login credentials
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::validation(
                "auth.username",
                "Login username must not be empty.",
            ));
        }

        if self.password.is_empty() {
            return Err(ConfigError::validation(
                "auth.password",
                "Login password must not be empty.",
            ));
        }

        Ok(())
    }
}

impl UpstreamConfig {
    /// Validate upstream configuration
    ///
    /// # Validation Rules
    /// - Base URL must be an absolute http(s) URL
    /// - Timeouts and cache TTLs must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        match Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
            _ => {
                return Err(ConfigError::ValidationError {
                    field: "upstream.base_url".to_string(),
                    message: format!(
                        "Invalid upstream URL '{}'. Expected an absolute http(s) URL.",
                        self.base_url
                    ),
                });
            }
        }

        let positive = [
            ("upstream.connect_timeout", self.connect_timeout),
            ("upstream.read_timeout", self.read_timeout),
            ("upstream.list_cache_ttl", self.list_cache_ttl),
            ("upstream.detail_cache_ttl", self.detail_cache_ttl),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::validation(field, "Value must be greater than 0."));
            }
        }

        Ok(())
    }
}

impl CacheConfig {
    /// Validate cache configuration
    ///
    /// Only the selected backend is checked, and nothing is checked when
    /// caching is disabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        match self.backend {
            CacheBackend::Memory => {
                if self.memory.max_size == 0 {
                    return Err(ConfigError::validation(
                        "cache.memory.max_size",
                        "Memory cache size must be greater than 0.",
                    ));
                }
            }
            CacheBackend::Redis => {
                if !(self.redis.url.starts_with("redis://")
                    || self.redis.url.starts_with("rediss://"))
                {
                    return Err(ConfigError::validation(
                        "cache.redis.url",
                        "Invalid Redis URL. Expected format: redis://host[:port] or rediss://host[:port]",
                    ));
                }

                if self.redis.pool_size == 0 {
                    return Err(ConfigError::validation(
                        "cache.redis.pool_size",
                        "Redis pool size must be greater than 0.",
                    ));
                }

                if self.redis.connection_timeout == 0 {
                    return Err(ConfigError::validation(
                        "cache.redis.connection_timeout",
                        "Redis connection timeout must be greater than 0 seconds.",
                    ));
                }
            }
        }

        Ok(())
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        // If file logging is enabled, path must not be empty
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.token.validate()?;
        self.auth.validate()?;
        self.upstream.validate()?;
        self.logger.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}
