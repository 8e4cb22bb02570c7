use std::env;
use std::fmt::{self, Debug, Display};
use std::io;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Internal,
    Storage,
    Network,
    Upstream,
    Timeout,
    Validation,
    PermissionDenied,
    NotFound,
    InvalidState,
    InvalidInput,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            2 => ErrorKind::Storage,
            3 => ErrorKind::Network,
            4 => ErrorKind::Upstream,
            6 => ErrorKind::Timeout,
            1..=99 => ErrorKind::Internal,
            100 => ErrorKind::InvalidState,
            101 => ErrorKind::Validation,
            102 => ErrorKind::PermissionDenied,
            103 => ErrorKind::NotFound,
            _ => ErrorKind::InvalidInput,
        }
    }

    /// Only transport failures and 5xx upstream answers are worth a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Upstream
        )
    }

    pub fn is_user_facing(&self) -> bool {
        self.code >= 100
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        storage_error(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        storage_error(err)
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn validation_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        message: message.into(),
    }
}

pub fn permission_denied_error() -> Error {
    Error {
        code: 102,
        message: "location access was denied or is unavailable".into(),
    }
}

pub fn not_found_error(what: impl Display) -> Error {
    Error {
        code: 103,
        message: format!("{} not found", what),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 104,
        message: "invalid input".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn storage_error<T: Debug>(err: T) -> Error {
    tracing::warn!("storage error: {:?}", err);

    Error {
        code: 2,
        message: "storage error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        return timeout_error();
    }

    if err.is_decode() {
        return unexpected_error();
    }

    if let Some(status) = err.status() {
        if status.is_client_error() {
            return invalid_input_error();
        }
        return upstream_error();
    }

    network_error()
}

pub fn network_error() -> Error {
    Error {
        code: 3,
        message: "network error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

pub fn timeout_error() -> Error {
    Error {
        code: 6,
        message: "request timed out".into(),
    }
}
