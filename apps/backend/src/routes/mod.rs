use actix_web::web;

pub mod health;
pub mod user;

/// Register every application route.
///
/// Protected resources wrap themselves in `TokenGate`, so tests and
/// `main.rs` share one route table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // User session routes: /api/user/**
    cfg.service(web::scope("/api/user").configure(user::configure_routes));
}
