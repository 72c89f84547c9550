//! Process-wide JSON logging for the `chat-backend` binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` overrides the default filter, which keeps this crate and
/// actix-web at info and quiets the server internals.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,chat_backend=info,actix_web=info,actix_server=warn"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
