//! Session token gate
//!
//! Reads the signed auth cookie, verifies the token inside it, and stores the
//! decoded `CredentialPayload` in request extensions. Wrap it around every
//! scope whose handlers need an authenticated caller.
//!
//! Rejections are rendered as 401 responses here and never reach the
//! downstream service:
//! - no cookie, empty token, or a cookie whose envelope signature fails:
//!   "Token not received"
//! - bad token signature, malformed payload, or expiry: "Token expired or
//!   invalid" (the same body for every cause)

use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::CredentialPayload;
use crate::auth::cookie::{open_token_cookie, CookieToken};
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

pub struct TokenGate;

impl<S, B> Transform<S, ServiceRequest> for TokenGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenGateMiddleware { service }))
    }
}

pub struct TokenGateMiddleware<S> {
    service: S,
}

/// Run both integrity checks for the cookie carried by `req`.
///
/// Returns the decoded payload, or the error that should be sent back.
pub fn authenticate(
    req: &ServiceRequest,
    security_config: &SecurityConfig,
    now: SystemTime,
) -> Result<CredentialPayload, AppError> {
    let raw = req.cookie(security_config.cookie_name());

    let token = match open_token_cookie(raw, security_config) {
        CookieToken::Absent => {
            security::token_missing(req.path(), "absent");
            return Err(AppError::missing_credential());
        }
        CookieToken::Unsigned => {
            security::token_missing(req.path(), "bad_cookie_signature");
            return Err(AppError::missing_credential());
        }
        CookieToken::Present(token) => token,
    };

    if token.trim().is_empty() {
        security::token_missing(req.path(), "empty");
        return Err(AppError::missing_credential());
    }

    verify_access_token(&token, now, security_config)
        .map(|claims| claims.payload())
        .map_err(|err| {
            if let AppError::InvalidCredential { fault } = &err {
                security::token_rejected(req.path(), *fault);
            }
            err
        })
}

impl<S, B> Service<ServiceRequest> for TokenGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // AppState carries the one SecurityConfig shared by issuer and gate.
        let app_state = match req.app_data::<web::Data<AppState>>().cloned() {
            Some(state) => state,
            None => {
                return Box::pin(async move {
                    let err = AppError::config("AppState not available to TokenGate");
                    Ok(req.error_response(err).map_into_right_body())
                });
            }
        };

        match authenticate(&req, &app_state.security, SystemTime::now()) {
            Ok(payload) => {
                // Store the payload BEFORE calling the service
                req.extensions_mut().insert(payload);

                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            // Render inside the future so the trace context is in scope.
            Err(err) => Box::pin(async move { Ok(req.error_response(err).map_into_right_body()) }),
        }
    }
}
