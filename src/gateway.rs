//! Upstream gateway trait and the error taxonomy every tool call resolves to.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::model::ToolOutput;

/// Classification of a failed (or empty) tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallErrorKind {
    /// The upstream rejected the configured credential.
    AuthFailure,
    /// Network failure, timeout, or a non-auth error status.
    UpstreamUnavailable,
    /// The upstream answered with something that is not the expected shape.
    MalformedResponse,
    /// Zero results. Only used to tag the empty outcome for presentation.
    EmptyResult,
    /// Caller-supplied data was rejected before any network call.
    InvalidArgument,
}

impl fmt::Display for CallErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallErrorKind::AuthFailure => "AuthFailure",
            CallErrorKind::UpstreamUnavailable => "UpstreamUnavailable",
            CallErrorKind::MalformedResponse => "MalformedResponse",
            CallErrorKind::EmptyResult => "EmptyResult",
            CallErrorKind::InvalidArgument => "InvalidArgument",
        };
        f.write_str(name)
    }
}

/// Tagged failure outcome of a tool invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind}: {message}")]
pub struct CallError {
    pub kind: CallErrorKind,
    pub message: String,
}

impl CallError {
    pub fn new(kind: CallErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::new(CallErrorKind::AuthFailure, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(CallErrorKind::UpstreamUnavailable, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(CallErrorKind::MalformedResponse, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(CallErrorKind::InvalidArgument, message)
    }
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CallError::unavailable(format!("upstream request timed out: {err}"))
        } else if err.is_connect() {
            CallError::unavailable(format!("could not connect to upstream: {err}"))
        } else {
            CallError::unavailable(format!("upstream request failed: {err}"))
        }
    }
}

/// Performs the remote lookups behind the two tools.
///
/// Implementations must resolve every call to either a [`ToolOutput`] or a
/// [`CallError`]; nothing above the gateway inspects transport errors.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Find places matching a free-text query, in upstream relevance order.
    async fn search_locations(&self, query: &str) -> Result<ToolOutput, CallError>;

    /// List restaurants for a location id returned by `search_locations`.
    async fn get_restaurants(&self, location_id: &str) -> Result<ToolOutput, CallError>;
}
