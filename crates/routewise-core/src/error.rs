use core::result::Result as CoreResult;
use std::io::Error as IoError;

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for core and backend operations.
pub type Result<T> = CoreResult<T, Error>;

/// Failures raised while loading configuration or talking to a backend.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the config file failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// The config file is not valid TOML for [`RouterConfig`](crate::RouterConfig).
    #[error("Malformed config file: {0}")]
    Toml(#[from] TomlError),

    /// A config value is out of range or cannot be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No key was configured for a backend; carries the env variable name.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// The backend could not be reached or answered with a failure status.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The backend answered 2xx with a body that could not be decoded.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// A backend call exceeded its deadline.
    #[error("{provider} timed out after {after_ms}ms")]
    Timeout { provider: String, after_ms: u64 },

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Config("cache.max_size must be at least 1".to_owned()).to_string(),
            "Configuration error: cache.max_size must be at least 1"
        );
        assert_eq!(
            Error::MissingApiKey("GROQ_API_KEY".to_owned()).to_string(),
            "API key not found: GROQ_API_KEY"
        );
        let timeout = Error::Timeout {
            provider: "openai".to_owned(),
            after_ms: 5000,
        };
        assert_eq!(timeout.to_string(), "openai timed out after 5000ms");
    }

    #[test]
    fn test_error_from_io() {
        let error: Error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_error = toml::from_str::<toml::Value>("[cache\nmax_size = ").unwrap_err();
        let error: Error = toml_error.into();
        assert!(error.to_string().starts_with("Malformed config file"));
    }
}
