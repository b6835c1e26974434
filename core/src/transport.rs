//! The seam between the client core and whatever performs the HTTP I/O.

use thiserror::Error;

use crate::http::HttpRequest;

/// Failure reported by a `Transport` before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Executes an `HttpRequest` and returns the complete raw response.
///
/// The raw response is the head section (one or more status/header blocks)
/// followed by `\r\n\r\n` and the body, exactly as it came off the wire.
/// Timeouts, retries and TLS are the implementor's concern.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<String, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<String, TransportError>,
{
    fn send(&self, request: &HttpRequest) -> Result<String, TransportError> {
        self(request)
    }
}
