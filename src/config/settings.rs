//! Configuration settings structures for pokedex-api
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::utils::jwt::TOKEN_PURPOSE;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "pokedex-api".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/app.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_token_secret() -> String {
    String::new()
}

fn default_token_expiration() -> i64 {
    24 // hours
}

fn default_token_purpose() -> String {
    TOKEN_PURPOSE.to_string()
}

fn default_auth_username() -> String {
    "admin".to_string()
}

fn default_auth_password() -> String {
    "admin".to_string()
}

fn default_upstream_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_connect_timeout() -> u64 {
    2
}

fn default_read_timeout() -> u64 {
    5
}

fn default_list_cache_ttl() -> u64 {
    60
}

fn default_detail_cache_ttl() -> u64 {
    300
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_max_size() -> usize {
    1000
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_pool_size() -> u32 {
    4
}

fn default_redis_connection_timeout() -> u64 {
    5
}

fn default_redis_key_prefix() -> String {
    "pokedex".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Token Configuration
// ============================================================================

/// Session token configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Secret key for signing session tokens
    /// IMPORTANT: This should be a strong, random string in production
    /// and should be kept secret (use environment variables)
    #[serde(default = "default_token_secret")]
    pub secret: String,

    /// Token lifetime in hours
    #[serde(default = "default_token_expiration")]
    pub expiration_hours: i64,

    /// Purpose tag bound into every token
    #[serde(default = "default_token_purpose")]
    pub purpose: String,
}

impl TokenConfig {
    /// Token lifetime as a duration, saturating on overflow
    pub fn ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(self.expiration_hours.saturating_mul(3600))
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: default_token_secret(),
            expiration_hours: default_token_expiration(),
            purpose: default_token_purpose(),
        }
    }
}

// ============================================================================
// Login Credentials
// ============================================================================

/// Credentials accepted by the login endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_username")]
    pub username: String,

    #[serde(default = "default_auth_password")]
    pub password: String,
}

impl AuthConfig {
    /// Whether the supplied pair matches the configured credentials
    ///
    /// Both fields are always compared, each in constant time.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let username = self.username.as_bytes().ct_eq(username.as_bytes());
        let password = self.password.as_bytes().ct_eq(password.as_bytes());
        (username & password).into()
    }

    /// Whether the shipped `admin`/`admin` account is still in place
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_auth_username(),
            password: default_auth_password(),
        }
    }
}

// ============================================================================
// Upstream Configuration
// ============================================================================

/// Upstream PokeAPI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream REST API
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Read timeout in seconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout: u64,

    /// TTL in seconds for cached list responses
    #[serde(default = "default_list_cache_ttl")]
    pub list_cache_ttl: u64,

    /// TTL in seconds for cached detail responses
    #[serde(default = "default_detail_cache_ttl")]
    pub detail_cache_ttl: u64,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            connect_timeout: default_connect_timeout(),
            read_timeout: default_read_timeout(),
            list_cache_ttl: default_list_cache_ttl(),
            detail_cache_ttl: default_detail_cache_ttl(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to LoggerConfig
    ///
    /// This method transforms the configuration file representation into
    /// the runtime LoggerConfig used by the logger module.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = self.console.into_console_config();
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl ConsoleSettings {
    /// Convert ConsoleSettings to ConsoleConfig
    pub fn into_console_config(self) -> ConsoleConfig {
        ConsoleConfig::new(self.enabled, self.colored)
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self.parse_format()?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }

    /// Parse the format string into LogFormat enum
    fn parse_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Cache backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

/// Memory cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries in the cache
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,

    /// Time-to-live in seconds when the caller gives none
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_size: default_cache_max_size(),
            ttl_seconds: default_cache_ttl(),
        }
    }
}

/// Redis cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Time-to-live in seconds when the caller gives none
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_redis_connection_timeout")]
    pub connection_timeout: u64,

    /// Key prefix for all cache entries
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            ttl_seconds: default_cache_ttl(),
            pool_size: default_redis_pool_size(),
            connection_timeout: default_redis_connection_timeout(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache backend type
    #[serde(default)]
    pub backend: CacheBackend,

    /// Memory cache settings
    #[serde(default)]
    pub memory: MemoryCacheConfig,

    /// Redis cache settings
    #[serde(default)]
    pub redis: RedisCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            backend: CacheBackend::default(),
            memory: MemoryCacheConfig::default(),
            redis: RedisCacheConfig::default(),
        }
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Session token configuration
    #[serde(default)]
    pub token: TokenConfig,

    /// Login credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Upstream API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ========================================================================
    // Arbitrary implementations for property-based testing
    // ========================================================================

    fn arb_application_config() -> impl Strategy<Value = ApplicationConfig> {
        (
            "[a-z][a-z0-9-]{0,20}",
            "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        )
            .prop_map(|(name, version)| ApplicationConfig { name, version })
    }

    fn arb_server_config() -> impl Strategy<Value = ServerConfig> {
        ("[a-z0-9.]{1,20}", 1u16..=65535).prop_map(|(host, port)| ServerConfig { host, port })
    }

    fn arb_token_config() -> impl Strategy<Value = TokenConfig> {
        ("[a-zA-Z0-9]{32,64}", 1i64..=720, "[a-z_]{1,16}").prop_map(
            |(secret, expiration_hours, purpose)| TokenConfig {
                secret,
                expiration_hours,
                purpose,
            },
        )
    }

    fn arb_auth_config() -> impl Strategy<Value = AuthConfig> {
        ("[a-z]{1,16}", "[a-zA-Z0-9]{1,32}")
            .prop_map(|(username, password)| AuthConfig { username, password })
    }

    fn arb_upstream_config() -> impl Strategy<Value = UpstreamConfig> {
        (
            "https://[a-z]{3,10}\\.example/api",
            1u64..=30,
            1u64..=60,
            1u64..=3600,
            1u64..=86400,
        )
            .prop_map(
                |(base_url, connect_timeout, read_timeout, list_cache_ttl, detail_cache_ttl)| {
                    UpstreamConfig {
                        base_url,
                        connect_timeout,
                        read_timeout,
                        list_cache_ttl,
                        detail_cache_ttl,
                    }
                },
            )
    }

    fn arb_logger_settings() -> impl Strategy<Value = LoggerSettings> {
        (
            prop_oneof![
                Just("trace"),
                Just("debug"),
                Just("info"),
                Just("warn"),
                Just("error")
            ],
            any::<bool>(),
            any::<bool>(),
            prop_oneof![Just("full"), Just("compact"), Just("json")],
        )
            .prop_map(|(level, console, file, format)| LoggerSettings {
                level: level.to_string(),
                console: ConsoleSettings {
                    enabled: console,
                    colored: console,
                },
                file: FileSettings {
                    enabled: file,
                    format: format.to_string(),
                    ..Default::default()
                },
            })
    }

    fn arb_cache_config() -> impl Strategy<Value = CacheConfig> {
        (
            any::<bool>(),
            prop_oneof![Just(CacheBackend::Memory), Just(CacheBackend::Redis)],
            1usize..10_000,
            1u32..32,
        )
            .prop_map(|(enabled, backend, max_size, pool_size)| CacheConfig {
                enabled,
                backend,
                memory: MemoryCacheConfig {
                    max_size,
                    ..Default::default()
                },
                redis: RedisCacheConfig {
                    pool_size,
                    ..Default::default()
                },
            })
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            arb_application_config(),
            arb_server_config(),
            arb_token_config(),
            arb_auth_config(),
            arb_upstream_config(),
            arb_logger_settings(),
            arb_cache_config(),
        )
            .prop_map(
                |(application, server, token, auth, upstream, logger, cache)| Settings {
                    application,
                    server,
                    token,
                    auth,
                    upstream,
                    logger,
                    cache,
                },
            )
    }

    proptest! {
        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml_str = toml::to_string(&settings)
                .expect("Failed to serialize settings to TOML");
            let deserialized: Settings = toml::from_str(&toml_str)
                .expect("Failed to deserialize settings from TOML");
            prop_assert_eq!(settings, deserialized);
        }
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_token_config_defaults() {
        let config = TokenConfig::default();
        assert!(config.secret.is_empty());
        assert_eq!(config.expiration_hours, 24);
        assert_eq!(config.purpose, "api_auth");
        assert_eq!(config.ttl(), SignedDuration::from_hours(24));
    }

    #[test]
    fn test_token_ttl_saturates_on_huge_expiration() {
        let config = TokenConfig {
            expiration_hours: i64::MAX,
            ..Default::default()
        };
        assert_eq!(config.ttl(), SignedDuration::from_secs(i64::MAX));
    }

    #[test]
    fn test_auth_config_defaults_and_matches() {
        let config = AuthConfig::default();
        assert!(config.matches("admin", "admin"));
        assert!(!config.matches("admin", "wrong"));
        assert!(!config.matches("Admin", "admin"));
    }

    #[test]
    fn test_auth_config_matches_needs_both_fields() {
        let config = AuthConfig {
            username: "ash".to_string(),
            password: "pikachu".to_string(),
        };
        assert!(config.matches("ash", "pikachu"));
        assert!(!config.matches("ash", "pikachu2"));
        assert!(!config.matches("ash", "pikach"));
        assert!(!config.matches("misty", "pikachu"));
        assert!(!config.matches("", ""));
    }

    #[test]
    fn test_auth_config_debug_redacts_password() {
        let config = AuthConfig {
            username: "ash".to_string(),
            password: "pikachu".to_string(),
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("ash"));
        assert!(!debug.contains("pikachu"));
    }

    #[test]
    fn test_upstream_config_defaults() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.read_timeout(), Duration::from_secs(5));
        assert_eq!(config.list_cache_ttl, 60);
        assert_eq!(config.detail_cache_ttl, 300);
    }

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.memory.max_size, 1000);
        assert_eq!(config.redis.key_prefix, "pokedex");
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
            [server]
            port = 8080

            [token]
            secret = "a_very_long_secret_key_for_session_tokens"
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.token.expiration_hours, 24);
        assert_eq!(settings.upstream.read_timeout, 5);
        assert!(settings.cache.enabled);
    }

    #[test]
    fn test_settings_deserialize_cache_backend() {
        let toml_str = r#"
            [cache]
            enabled = true
            backend = "redis"

            [cache.redis]
            url = "redis://cache:6379"
            pool_size = 8
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(settings.cache.backend, CacheBackend::Redis);
        assert_eq!(settings.cache.redis.url, "redis://cache:6379");
        assert_eq!(settings.cache.redis.pool_size, 8);
        assert_eq!(settings.cache.redis.connection_timeout, 5);
    }

    #[test]
    fn test_logger_settings_into_logger_config() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            ..Default::default()
        };
        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.console.enabled);
        assert!(!config.file.enabled);
    }

    #[test]
    fn test_file_settings_into_file_config_all_formats() {
        for (format, expected) in [
            ("full", LogFormat::Full),
            ("compact", LogFormat::Compact),
            ("json", LogFormat::Json),
        ] {
            let settings = FileSettings {
                enabled: true,
                format: format.to_string(),
                ..Default::default()
            };
            assert_eq!(settings.into_file_config().unwrap().format, expected);
        }
    }

    #[test]
    fn test_file_settings_into_file_config_invalid_format() {
        let settings = FileSettings {
            format: "xml".to_string(),
            ..Default::default()
        };
        let err = settings.into_file_config().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "logger.file.format")
        );
    }

    #[test]
    fn test_logger_settings_into_logger_config_both_disabled() {
        let settings = LoggerSettings {
            console: ConsoleSettings {
                enabled: false,
                colored: false,
            },
            ..Default::default()
        };
        assert!(settings.into_logger_config().is_err());
    }
}
