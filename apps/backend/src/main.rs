use actix_web::{web, App, HttpServer};
use chat_backend::config::Config;
use chat_backend::middleware::cors::cors_middleware;
use chat_backend::middleware::request_trace::RequestTrace;
use chat_backend::middleware::structured_logger::StructuredLogger;
use chat_backend::routes;
use chat_backend::state::app_state::AppState;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Secrets are validated here; without them no route is ever served.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        cookie_name = config.security.cookie_name(),
        token_ttl = %config.security.token_ttl(),
        "starting chat backend"
    );

    let data = web::Data::new(AppState::in_memory(config.security.clone()));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
