use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::{DRIVE_FILE_URL, DRIVE_FOLDER_URL, MEGA_API_URL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Endpoints the provider probes talk to.
///
/// Overridable so tests and self-hosted mirrors can redirect probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub mega_api_url: String,
    pub drive_file_url: String,
    pub drive_folder_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            mega_api_url: MEGA_API_URL.to_string(),
            drive_file_url: DRIVE_FILE_URL.to_string(),
            drive_folder_url: DRIVE_FOLDER_URL.to_string(),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Transport
    pub verify_certificate: bool,
    pub request_timeout: Duration,

    // Batch policy
    pub continue_on_error: bool,

    // Provider endpoints
    pub endpoints: Endpoints,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Transport
            verify_certificate: parse_env_bool("VERIFY_CERTIFICATE", true)?,
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),

            // Batch policy
            continue_on_error: parse_env_bool("CONTINUE_ON_ERROR", false)?,

            // Provider endpoints
            endpoints: Endpoints {
                mega_api_url: env_or_default("MEGA_API_URL", MEGA_API_URL),
                drive_file_url: env_or_default("DRIVE_FILE_URL", DRIVE_FILE_URL),
                drive_folder_url: env_or_default("DRIVE_FOLDER_URL", DRIVE_FOLDER_URL),
            },
        })
    }

    /// Configuration with production endpoints and default transport settings.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            verify_certificate: true,
            request_timeout: Duration::from_secs(5),
            continue_on_error: false,
            endpoints: Endpoints::default(),
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        validate_endpoint("MEGA_API_URL", &self.endpoints.mega_api_url)?;
        validate_endpoint("DRIVE_FILE_URL", &self.endpoints.drive_file_url)?;
        validate_endpoint("DRIVE_FOLDER_URL", &self.endpoints.drive_folder_url)?;
        Ok(())
    }
}

fn validate_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        message: format!("not a valid URL: {e}"),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("must be an http(s) URL, got '{value}'"),
        });
    }
    Ok(())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => parse_bool(name, &val),
        _ => Ok(default),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_env_bool("NONEXISTENT_VAR", true).unwrap());
        assert!(!parse_env_bool("NONEXISTENT_VAR", false).unwrap());
        assert!(parse_bool("X", "YES").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_for_testing_is_valid() {
        assert!(Config::for_testing().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            request_timeout: Duration::ZERO,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut config = Config::for_testing();
        config.endpoints.mega_api_url = "ftp://g.api.mega.co.nz".to_string();
        assert!(config.validate().is_err());

        config.endpoints.mega_api_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
