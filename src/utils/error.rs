use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Storage API returned {status} for {url}")]
    HttpStatusError { status: StatusCode, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Setting {field} or `{option}` option is required.")]
    MissingConfigError { field: String, option: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("File '{name}' does not exist.")]
    NotFound { name: String },

    #[error("{operation} is not supported for this listing")]
    NotImplemented { operation: String },

    #[error("Cannot parse timestamp '{value}': {reason}")]
    TimestampParseError { value: String, reason: String },
}

impl StorageError {
    pub fn missing(field: &str, option: &str) -> Self {
        StorageError::MissingConfigError {
            field: field.to_string(),
            option: option.to_string(),
        }
    }

    /// HTTP status carried by the error, if the remote answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            StorageError::HttpStatusError { status, .. } => Some(*status),
            StorageError::RequestError(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
            || self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StorageError::ConfigError { .. }
                | StorageError::MissingConfigError { .. }
                | StorageError::InvalidConfigValueError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StorageError::MissingConfigError { .. }
            | StorageError::InvalidConfigValueError { .. }
            | StorageError::ConfigError { .. } => {
                "Check BUNNY_USERNAME, BUNNY_PASSWORD and BUNNY_HOSTNAME (or MEDIA_URL)"
            }
            StorageError::HttpStatusError { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                "The storage zone rejected the access key, check BUNNY_PASSWORD"
            }
            StorageError::HttpStatusError { .. } | StorageError::RequestError(_) => {
                "Check BUNNY_REGION and network connectivity to the storage endpoint"
            }
            StorageError::NotFound { .. } => "Verify the object name and base directory",
            StorageError::NotImplemented { .. }
            | StorageError::SerializationError(_)
            | StorageError::TimestampParseError { .. } => {
                "The directory listing had an unexpected shape, retry or inspect it with `ls`"
            }
            StorageError::IoError(_) => "Check local file permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_covers_status_404() {
        let err = StorageError::HttpStatusError {
            status: StatusCode::NOT_FOUND,
            url: "https://ny.storage.bunnycdn.com/zone/a.txt".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        let err = StorageError::NotFound {
            name: "a.txt".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "File 'a.txt' does not exist.");
    }

    #[test]
    fn test_missing_config_message() {
        let err = StorageError::missing("BUNNY_USERNAME", "username");
        assert!(err.is_config_error());
        assert_eq!(
            err.to_string(),
            "Setting BUNNY_USERNAME or `username` option is required."
        );
    }
}
