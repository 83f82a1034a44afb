use std::fmt::Display;

use thiserror::Error;

/// Error produced while issuing a request or decoding its response.
///
/// Cloneable so one failed outcome can be handed to every caller attached
/// to the same deduplicated request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct FetchError {
    kind: ErrorKind,
}

impl FetchError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn transport(err: impl Display) -> Self {
        ErrorKind::Transport(err.to_string()).into()
    }

    pub(crate) fn invalid_target(err: impl Display) -> Self {
        ErrorKind::InvalidTarget(err.to_string()).into()
    }

    pub(crate) fn invalid_body(err: impl Display) -> Self {
        ErrorKind::InvalidBody(err.to_string()).into()
    }
}

impl From<ErrorKind> for FetchError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

/// What went wrong, with the upstream message flattened to a string so the
/// error stays cheap to clone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport could not produce a response at all.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The request target could not be resolved into a URL.
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    /// The response body could not be decoded into the requested shape.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}
