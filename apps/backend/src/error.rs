use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::auth::jwt::TokenFault;
use crate::errors::ErrorCode;
use crate::trace_ctx;

/// Client-facing message for requests that arrive without a token.
pub const MSG_TOKEN_NOT_RECEIVED: &str = "Token not received";
/// Client-facing message for every token verification failure.
pub const MSG_TOKEN_EXPIRED_OR_INVALID: &str = "Token expired or invalid";

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
    /// Same text as `detail`; the browser client reads `message`.
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token not received")]
    MissingCredential,
    /// The fault is kept for logging and tests only. It never reaches the
    /// response body, which is identical for every fault.
    #[error("Token expired or invalid")]
    InvalidCredential { fault: TokenFault },
    #[error("Invalid email or password")]
    InvalidLogin,
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MissingCredential => ErrorCode::UnauthorizedMissingToken,
            AppError::InvalidCredential { .. } => ErrorCode::UnauthorizedInvalidToken,
            AppError::InvalidLogin => ErrorCode::InvalidCredentials,
            AppError::BadRequest { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Client-facing message for this error.
    pub fn message(&self) -> String {
        match self {
            AppError::MissingCredential => MSG_TOKEN_NOT_RECEIVED.to_string(),
            AppError::InvalidCredential { .. } => MSG_TOKEN_EXPIRED_OR_INVALID.to_string(),
            AppError::InvalidLogin => "Invalid email or password".to_string(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            // Configuration and internal details stay in the logs.
            AppError::Config { .. } => "Server misconfigured".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredential { .. } => StatusCode::UNAUTHORIZED,
            AppError::InvalidLogin => StatusCode::UNAUTHORIZED,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing_credential() -> Self {
        Self::MissingCredential
    }

    pub fn invalid_credential(fault: TokenFault) -> Self {
        Self::InvalidCredential { fault }
    }

    pub fn invalid_login() -> Self {
        Self::InvalidLogin
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let message = self.message();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(code = %code, error = %self, %trace_id, "request failed");
        }

        let problem_details = ProblemDetails {
            type_: format!("https://chat.local/errors/{}", code.as_str()),
            title: Self::humanize_code(code.as_str()),
            status: status.as_u16(),
            detail: message.clone(),
            code: code.as_str().to_string(),
            trace_id: trace_id.clone(),
            message,
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
