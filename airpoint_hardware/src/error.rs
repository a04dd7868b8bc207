use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("open serial port {port}: {reason}")]
    SerialOpen { port: String, reason: String },
    #[error("serial read: {0}")]
    SerialRead(String),
    #[error("serial read timeout")]
    Timeout,
    #[error("uinput device: {0}")]
    Uinput(#[source] std::io::Error),
    #[error("backend unavailable: {0}")]
    Unsupported(&'static str),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
