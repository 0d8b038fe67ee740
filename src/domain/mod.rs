//! Domain layer for rask-hec-relay.
//!
//! Contains the types shared between the HTTP layer, the content gate and
//! the forwarder:
//! - `LogEvent` / `EventMessage`: an inbound event as submitted by a client
//! - `CollectorPayload`: the HEC wire shape built for one submission
//! - `RequestChannel` / `AckId`: correlation tokens of the ack handshake

pub mod channel;
pub mod error;
pub mod log_event;
pub mod payload;

pub use channel::RequestChannel;
pub use error::EventValidationError;
pub use log_event::{EventMessage, LogEvent};
pub use payload::{AckId, AckRequest, AckStatusResponse, CollectorPayload, SubmitResponse};
