#![warn(rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod forwarder;
pub mod gate;
pub mod handler;
pub mod healthcheck;
pub mod port;
pub mod test_support;

pub use app::router::relay_router;
pub use app::state::AppState;
pub use config::Config;
pub use forwarder::{EventForwarder, ForwardOutcome};
pub use gate::{ContentGate, GateVerdict};
pub use healthcheck::{healthcheck, healthcheck_with_port};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
