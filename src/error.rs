//! Error handling for the LaptopHub client
//!
//! Every failure the client surfaces carries one human-readable message.
//! The Display string of an error is that message and nothing else, so a
//! front end can show it directly. `ErrorCode` exists for logs only.

use std::fmt;
use thiserror::Error;

/// Unified Result type for all LaptopHub operations
pub type Result<T> = std::result::Result<T, LaptopHubError>;

/// Error codes for logging
///
/// - LH1XX: Authentication
/// - LH2XX: Network and API
/// - LH3XX: Local storage
/// - LH4XX: Configuration
/// - LH5XX: Validation
/// - LH9XX: Internal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (LH1XX)
    /// LH101: No session
    NotAuthenticated,

    // Network (LH2XX)
    /// LH201: Non-2xx status without a usable error body
    HttpStatus,
    /// LH202: Connection or transport failure
    Network,
    /// LH203: Non-2xx status with a field error body
    ApiError,
    /// LH204: Response body could not be decoded
    InvalidResponse,

    // Storage (LH3XX)
    /// LH301: Durable storage unavailable or failed
    StorageError,

    // Configuration (LH4XX)
    /// LH401: Configuration error
    ConfigError,

    // Validation (LH5XX)
    /// LH501: Request rejected before it was sent
    ValidationFailed,

    // Internal (LH9XX)
    /// LH901: Internal error
    InternalError,
}

impl ErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::NotAuthenticated => 101,
            ErrorCode::HttpStatus => 201,
            ErrorCode::Network => 202,
            ErrorCode::ApiError => 203,
            ErrorCode::InvalidResponse => 204,
            ErrorCode::StorageError => 301,
            ErrorCode::ConfigError => 401,
            ErrorCode::ValidationFailed => 501,
            ErrorCode::InternalError => 901,
        }
    }

    /// String form, e.g. "LH201"
    pub fn as_str(&self) -> String {
        format!("LH{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LH{}", self.code())
    }
}

/// Main error type for all LaptopHub operations
#[derive(Error, Debug)]
pub enum LaptopHubError {
    /// Non-2xx response with nothing better to say than the status
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// Non-2xx response whose body carried a message for the user
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A 2xx body that does not match the expected shape
    #[error("Invalid response: {message}")]
    Decode { message: String },

    /// Local validation of a request body
    #[error("{message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LaptopHubError {
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http { .. } => ErrorCode::HttpStatus,
            Self::Api { .. } => ErrorCode::ApiError,
            Self::Network { .. } => ErrorCode::Network,
            Self::Decode { .. } => ErrorCode::InvalidResponse,
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::Config { .. } => ErrorCode::ConfigError,
            Self::Storage { .. } => ErrorCode::StorageError,
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

// ==================== From Implementations ====================

impl From<reqwest::Error> for LaptopHubError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Could not connect to the server".to_string()
        } else {
            err.to_string()
        };
        Self::Network {
            message,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for LaptopHubError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<config::ConfigError> for LaptopHubError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

impl From<std::io::Error> for LaptopHubError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for LaptopHubError {
    fn from(errs: validator::ValidationErrors) -> Self {
        // Same single-message shape as a server-side field error.
        let mut fields: Vec<_> = errs.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let message = fields
            .into_iter()
            .find_map(|(name, list)| {
                list.first().map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("Invalid {}", name.replace('_', " ")),
                })
            })
            .unwrap_or_else(|| "Invalid request".to_string());
        Self::validation(message)
    }
}

impl From<dialoguer::Error> for LaptopHubError {
    fn from(err: dialoguer::Error) -> Self {
        Self::internal(format!("Prompt failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::NotAuthenticated.code(), 101);
        assert_eq!(ErrorCode::HttpStatus.as_str(), "LH201");
        assert_eq!(ErrorCode::StorageError.to_string(), "LH301");
    }

    #[test]
    fn test_display_is_bare_message() {
        assert_eq!(LaptopHubError::http(400).to_string(), "HTTP 400");
        assert_eq!(
            LaptopHubError::api(400, "already taken").to_string(),
            "already taken"
        );
    }

    #[test]
    fn test_status_helpers() {
        assert!(LaptopHubError::http(404).is_not_found());
        assert!(LaptopHubError::api(401, "expired").is_unauthorized());
        assert!(LaptopHubError::network("down").is_network_error());
        assert_eq!(LaptopHubError::NotAuthenticated.status(), None);
    }
}
