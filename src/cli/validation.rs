//! CLI argument validation functions
//!
//! Value parsers for arguments that need more than a type conversion.

use std::fs;
use std::net::Ipv4Addr;
use std::path::PathBuf;

const MAX_HOSTNAME_LENGTH: usize = 253;

/// Port must parse as `u16` and be non-zero
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// Config file must exist, be a regular file and be readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// Accepts `localhost`, dotted IPv4 addresses and hostnames.
///
/// Anything made only of digits and dots is treated as an IPv4 address and
/// must parse as one.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return host
            .parse::<Ipv4Addr>()
            .map(|_| host.to_string())
            .map_err(|_| format!("Invalid IPv4 address format: '{}'", host_str));
    }

    if host.len() > MAX_HOSTNAME_LENGTH {
        return Err(format!(
            "Host address is too long (maximum {} characters)",
            MAX_HOSTNAME_LENGTH
        ));
    }

    Ok(host.to_string())
}
