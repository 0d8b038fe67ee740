use thiserror::Error;

/// Why an inbound request body could not be turned into a `LogEvent`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventValidationError {
    #[error("Malformed JSON body: {0}")]
    Malformed(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing required field: message")]
    MissingMessage,

    #[error("Field 'message' must be a string or an object, got {0}")]
    UnsupportedMessage(&'static str),

    #[error("Field 'source' must be a string, got {0}")]
    InvalidSource(&'static str),
}
