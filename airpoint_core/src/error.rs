use thiserror::Error;

/// Runtime failures surfaced by the bridge. None of these stop the process;
/// they are logged, counted, and reported in the run summary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("transport open failed: {0}")]
    TransportOpen(String),
    #[error("transport read failed: {0}")]
    TransportRead(String),
    #[error("timeout waiting for transport")]
    Timeout,
    #[error("input injection failed: {0}")]
    Injection(String),
    #[error("backend unavailable: {0}")]
    Unsupported(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
}

/// Why a line was not accepted as a frame. Always recoverable: the line is
/// dropped and the stream continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line matches no frame format")]
    NoMatch,
    #[error("field {field} is not a number: {value:?}")]
    BadNumber { field: &'static str, value: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing injector")]
    MissingInjector,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
