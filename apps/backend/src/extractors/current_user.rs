use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::auth::claims::CredentialPayload;
use crate::error::AppError;

/// Authenticated caller, read from the `CredentialPayload` that the
/// `TokenGate` middleware stored in request extensions.
///
/// Using this extractor on a route that is not behind the gate always
/// fails with "Token not received".
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

impl From<CredentialPayload> for CurrentUser {
    fn from(payload: CredentialPayload) -> Self {
        Self {
            id: payload.subject_id,
            email: payload.email,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<CredentialPayload>()
            .cloned()
            .map(CurrentUser::from)
            .ok_or_else(AppError::missing_credential);

        ready(user)
    }
}
