use tracing::{info, warn};

use crate::auth::jwt::TokenFault;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A protected request arrived without a usable token.
///
/// `cause` is `absent`, `empty` or `bad_cookie_signature`.
pub fn token_missing(path: &str, cause: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_MISSING",
        %trace_id,
        path,
        cause,
        "Request rejected: no token"
    );
}

/// A protected request carried a token that failed verification.
pub fn token_rejected(path: &str, fault: TokenFault) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        path,
        cause = fault.as_str(),
        "Request rejected: token expired or invalid"
    );
}

/// Log a security-relevant login failure event.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        reason,
        "Authentication failure"
    );
}

/// A session token was issued.
pub fn token_issued(subject_id: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_TOKEN_ISSUED",
        %trace_id,
        subject_id,
        email = %Redacted(email),
        "Session token issued"
    );
}
