use std::time::SystemTime;

use actix_web::cookie::time::OffsetDateTime;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{removal_cookie, token_cookie};
use crate::auth::jwt::mint_access_token;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::logging::security;
use crate::middleware::token_gate::TokenGate;
use crate::services::identities::Identity;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub id: String,
    pub email: String,
}

impl SessionResponse {
    fn ok(id: String, email: String) -> Self {
        Self {
            message: "OK",
            id,
            email,
        }
    }
}

/// Mint a token for `identity` and answer with it set as the signed cookie.
fn issue_session(
    status: StatusCode,
    identity: Identity,
    security_config: &SecurityConfig,
) -> Result<HttpResponse, AppError> {
    let token = mint_access_token(
        &identity.subject_id,
        &identity.email,
        security_config.token_ttl(),
        SystemTime::now(),
        security_config,
    )?;
    let cookie = token_cookie(&token, OffsetDateTime::now_utc(), security_config)?;

    security::token_issued(&identity.subject_id, &identity.email);

    Ok(HttpResponse::build(status)
        .cookie(cookie)
        .json(SessionResponse::ok(identity.subject_id, identity.email)))
}

/// Register a new identity and log it in.
async fn signup(
    req: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let identity = app_state
        .identities
        .register(&req.email, &req.password)
        .await?;

    issue_session(StatusCode::CREATED, identity, &app_state.security)
}

/// Check credentials and set a fresh session cookie.
async fn login(
    req: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let identity = match app_state
        .identities
        .authenticate(&req.email, &req.password)
        .await
    {
        Ok(identity) => identity,
        Err(err) => {
            if matches!(err, AppError::InvalidLogin) {
                security::login_failed("invalid_credentials", Some(&req.email));
            }
            return Err(err);
        }
    };

    issue_session(StatusCode::OK, identity, &app_state.security)
}

/// Report who the session cookie belongs to.
async fn auth_status(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(SessionResponse::ok(user.id, user.email)))
}

/// Clear the session cookie. The token itself stays valid until it expires.
async fn logout(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&app_state.security))
        .json(SessionResponse::ok(user.id, user.email)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/signup").route(web::post().to(signup)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(
            web::resource("/auth-status")
                .wrap(TokenGate)
                .route(web::get().to(auth_status)),
        )
        .service(
            web::resource("/logout")
                .wrap(TokenGate)
                .route(web::get().to(logout)),
        );
}
