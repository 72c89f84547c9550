//! Error codes for the chat backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the chat backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// No auth token was presented with the request
    UnauthorizedMissingToken,
    /// Token failed signature, payload or expiry checks
    UnauthorizedInvalidToken,
    /// Login attempted with unknown email or wrong password
    InvalidCredentials,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// General bad request error
    BadRequest,

    // Conflicts
    /// An identity with this email already exists
    EmailTaken,

    // System Errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedMissingToken => "UNAUTHORIZED_MISSING_TOKEN",
            Self::UnauthorizedInvalidToken => "UNAUTHORIZED_INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::BadRequest => "BAD_REQUEST",

            Self::EmailTaken => "EMAIL_TAKEN",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
