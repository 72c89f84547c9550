use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, HttpResponse};
use backend_test_support::problem_details::assert_problem_details;
use chat_backend::auth::jwt::mint_access_token;
use chat_backend::auth::ttl::TokenTtl;
use chat_backend::error::{AppError, MSG_TOKEN_EXPIRED_OR_INVALID, MSG_TOKEN_NOT_RECEIVED};
use chat_backend::extractors::current_user::CurrentUser;
use chat_backend::middleware::token_gate::TokenGate;
use chat_backend::state::app_state::AppState;
use chat_backend::state::security_config::SecurityConfig;
use serde_json::json;

use crate::common::{error_body_without_trace, json_body};
use crate::support::auth::{mint_expired_token, mint_test_token, session_cookie, signed_cookie};
use crate::support::{create_test_app, test_security};

async fn whoami(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(user))
}

/// App with a single gated route, `/guarded/me`, answering with the caller.
async fn build_gated_app(
    security: SecurityConfig,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    create_test_app(AppState::in_memory(security))
        .with_routes(|cfg| {
            cfg.service(
                web::scope("/guarded")
                    .wrap(TokenGate)
                    .route("/me", web::get().to(whoami)),
            );
        })
        .build()
        .await
}

fn get_me(cookie: Option<Cookie<'static>>) -> Request {
    let req = test::TestRequest::get().uri("/guarded/me");
    match cookie {
        Some(cookie) => req.cookie(cookie).to_request(),
        None => req.to_request(),
    }
}

#[actix_web::test]
async fn valid_token_reaches_handler_with_payload() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    let cookie = session_cookie("user-42", "alice@example.com", &security);
    let resp = test::call_service(&app, get_me(Some(cookie))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body, json!({ "id": "user-42", "email": "alice@example.com" }));
}

#[actix_web::test]
async fn missing_cookie_is_not_received() {
    let app = build_gated_app(test_security()).await;

    let resp = test::call_service(&app, get_me(None)).await;

    assert_problem_details(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_MISSING_TOKEN",
        MSG_TOKEN_NOT_RECEIVED,
    )
    .await;
}

#[actix_web::test]
async fn empty_or_blank_token_is_not_received() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    for token in ["", "   "] {
        let resp = test::call_service(&app, get_me(Some(signed_cookie(token, &security)))).await;
        assert_problem_details(
            resp,
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED_MISSING_TOKEN",
            MSG_TOKEN_NOT_RECEIVED,
        )
        .await;
    }
}

#[actix_web::test]
async fn unsigned_cookie_is_not_received() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    // A perfectly valid token, but placed in the cookie without the envelope signature
    let token = mint_test_token("user-1", "u1@example.com", &security);
    let raw = Cookie::new(security.cookie_name().to_string(), token);

    let resp = test::call_service(&app, get_me(Some(raw))).await;

    assert_problem_details(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_MISSING_TOKEN",
        MSG_TOKEN_NOT_RECEIVED,
    )
    .await;
}

#[actix_web::test]
async fn cookie_with_other_name_is_ignored() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    let other = security.clone().with_cookie_name("session");
    let cookie = session_cookie("user-1", "u1@example.com", &other);

    let resp = test::call_service(&app, get_me(Some(cookie))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn garbage_token_is_invalid() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    let resp = test::call_service(
        &app,
        get_me(Some(signed_cookie("not-a-jwt-at-all", &security))),
    )
    .await;

    assert_problem_details(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_INVALID_TOKEN",
        MSG_TOKEN_EXPIRED_OR_INVALID,
    )
    .await;
}

#[actix_web::test]
async fn expired_token_is_invalid() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    let token = mint_expired_token("user-1", "u1@example.com", &security);
    let resp = test::call_service(&app, get_me(Some(signed_cookie(&token, &security)))).await;

    assert_problem_details(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_INVALID_TOKEN",
        MSG_TOKEN_EXPIRED_OR_INVALID,
    )
    .await;
}

#[actix_web::test]
async fn zero_ttl_token_is_rejected_immediately() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    let token = mint_access_token(
        "user-1",
        "u1@example.com",
        TokenTtl::from_secs(0),
        SystemTime::now(),
        &security,
    )
    .unwrap();
    let resp = test::call_service(&app, get_me(Some(signed_cookie(&token, &security)))).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_signed_with_another_secret_is_invalid() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    // Same cookie key, different token secret: the envelope opens, the token does not
    let foreign = SecurityConfig::for_tests("a-completely-different-jwt-secret");
    let token = mint_test_token("user-1", "u1@example.com", &foreign);
    let resp = test::call_service(&app, get_me(Some(signed_cookie(&token, &security)))).await;

    assert_problem_details(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_INVALID_TOKEN",
        MSG_TOKEN_EXPIRED_OR_INVALID,
    )
    .await;
}

#[actix_web::test]
async fn every_invalid_cause_yields_the_same_body() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    let expired = mint_expired_token("user-1", "u1@example.com", &security);
    let foreign = mint_test_token(
        "user-1",
        "u1@example.com",
        &SecurityConfig::for_tests("another-secret"),
    );

    let mut bodies = Vec::new();
    for token in [expired.as_str(), foreign.as_str(), "x.y.z"] {
        let resp = test::call_service(&app, get_me(Some(signed_cookie(token, &security)))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        bodies.push(error_body_without_trace(resp).await);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
}

#[actix_web::test]
async fn handler_does_not_run_on_rejection() {
    let security = test_security();
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    let app = create_test_app(AppState::in_memory(security.clone()))
        .with_routes(move |cfg| {
            let counter = counter.clone();
            cfg.service(
                web::scope("/guarded").wrap(TokenGate).route(
                    "/me",
                    web::get().to(move || {
                        let counter = counter.clone();
                        async move {
                            counter.fetch_add(1, Ordering::SeqCst);
                            HttpResponse::Ok().finish()
                        }
                    }),
                ),
            );
        })
        .build()
        .await;

    let expired = mint_expired_token("user-1", "u1@example.com", &security);
    let rejected = [
        get_me(None),
        get_me(Some(signed_cookie("", &security))),
        get_me(Some(signed_cookie(&expired, &security))),
        get_me(Some(Cookie::new(security.cookie_name().to_string(), "raw"))),
    ];
    for req in rejected {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let resp = test::call_service(
        &app,
        get_me(Some(session_cookie("user-1", "u1@example.com", &security))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn concurrent_requests_see_their_own_identity() {
    let security = test_security();
    let app = build_gated_app(security.clone()).await;

    let alice = get_me(Some(session_cookie("alice-id", "alice@example.com", &security)));
    let bob = get_me(Some(session_cookie("bob-id", "bob@example.com", &security)));
    let nobody = get_me(None);

    let (alice, bob, nobody) = futures::join!(
        test::call_service(&app, alice),
        test::call_service(&app, bob),
        test::call_service(&app, nobody),
    );

    assert_eq!(nobody.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(alice).await["id"], "alice-id");
    assert_eq!(json_body(bob).await["id"], "bob-id");
}

#[actix_web::test]
async fn rejection_carries_request_trace_id() {
    let app = build_gated_app(test_security()).await;

    let resp = test::call_service(&app, get_me(None)).await;

    let request_id = resp
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap()
        .to_string();
    let problem = assert_problem_details(
        resp,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED_MISSING_TOKEN",
        MSG_TOKEN_NOT_RECEIVED,
    )
    .await;
    assert_eq!(problem.trace_id, request_id);
}
