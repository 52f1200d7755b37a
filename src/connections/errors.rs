use std::fmt::{self, Display};

/// A central error enum for connection-related errors.
#[derive(Debug)]
pub enum ConnectionError {
    IoError(std::io::Error),
    SshError(String),
    InvalidTarget(String),
    Other(String),
}

/// Convert from std::io::Error.
impl From<std::io::Error> for ConnectionError {
    fn from(err: std::io::Error) -> ConnectionError {
        ConnectionError::IoError(err)
    }
}

/// Convert from ssh2::Error.
/// Without this, `map_err(ConnectionError::from)` won't work for session calls.
impl From<ssh2::Error> for ConnectionError {
    fn from(err: ssh2::Error) -> Self {
        ConnectionError::SshError(err.to_string())
    }
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::IoError(e) => write!(f, "IO error: {}", e),
            ConnectionError::SshError(msg) => write!(f, "SSH error: {}", msg),
            ConnectionError::InvalidTarget(msg) => write!(f, "Invalid target: {}", msg),
            ConnectionError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::IoError(e) => Some(e),
            _ => None,
        }
    }
}
