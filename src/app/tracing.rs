use crate::config::{LogFormat, LogLevel};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` directives apply on top of the configured level.
pub fn init_tracing(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::from_default_env().add_directive(Level::from(level).into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true),
                )
                .with(filter)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .init();
        }
    }
}
