//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Undefined environment variable ${{{0}}}")]
    EnvVarNotSet(String),

    /// First error reported by the validator.
    #[error("{field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_path() {
        let err = ConfigError::NotFound(PathBuf::from("config/datacat.toml"));
        assert_eq!(
            err.to_string(),
            "Configuration file config/datacat.toml does not exist"
        );
    }

    #[test]
    fn test_env_var_shown_as_placeholder() {
        let err = ConfigError::EnvVarNotSet("DATACAT_DB".to_string());
        assert_eq!(err.to_string(), "Undefined environment variable ${DATACAT_DB}");
    }

    #[test]
    fn test_read_error_keeps_source() {
        use std::error::Error as _;

        let err = ConfigError::Read {
            path: PathBuf::from("/etc/datacat.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("Failed to read /etc/datacat.toml"));
        assert!(err.source().is_some());
    }
}
