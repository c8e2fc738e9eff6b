use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// A failed page fetch, as reported by the host's fetch capability.
///
/// The store never produces these itself; it records whatever the host hands back so the
/// rendering layer can show it (see [`crate::PagerStore::error`]).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connectivity failure: DNS, refused connection, reset, etc.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}{}", MessageSuffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The host gave up waiting for the response.
    #[error("request timed out")]
    Timeout,
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            message: None,
        }
    }

    /// A non-success status along with the server's explanation.
    pub fn status_with_message(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: Some(message.into()),
        }
    }
}

struct MessageSuffix<'a>(&'a Option<String>);

impl fmt::Display for MessageSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(message) => write!(f, ": {message}"),
            None => Ok(()),
        }
    }
}

/// Errors reported by [`crate::PagerStore::complete`].
///
/// Both variants are already reflected in store state when they are returned: a fetch failure
/// is stored as the current error, and a stale response changes nothing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ListError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The response belongs to a fetch that was superseded or cancelled.
    #[error("stale response for generation {generation} (live generation: {live:?})")]
    StaleResponse { generation: u64, live: Option<u64> },
}

impl ListError {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleResponse { .. })
    }
}
