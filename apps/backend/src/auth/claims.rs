//! Identity claim carried by every session token.

use serde::{Deserialize, Serialize};

/// Decoded identity inserted into request extensions by the `TokenGate`
/// middleware. Lives for a single request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CredentialPayload {
    pub subject_id: String,
    pub email: String,
}
