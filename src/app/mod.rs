pub mod router;
pub mod server;
pub mod state;
pub mod tracing;

use crate::config::Config;
use crate::error::RelayError;

/// Application entry point. Loads configuration, initializes tracing, builds
/// the forwarder and gate, and serves until shutdown.
pub async fn run() -> Result<(), RelayError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    let config = Config::load()?;
    tracing::init_tracing(config.log_level, config.log_format);
    ::tracing::info!(
        version = crate::VERSION,
        port = config.http_port,
        "Loaded configuration"
    );

    let state = state::AppState::from_config(&config)?;
    let app = router::relay_router(state);

    server::serve(app, config.http_port).await
}
