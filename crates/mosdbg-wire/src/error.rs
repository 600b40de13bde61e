//! Wire protocol error types.

use thiserror::Error;

/// Errors from encoding or decoding debug protocol frames.
#[derive(Debug, Error)]
pub enum WireError {
    /// The peer closed the connection before a full frame arrived.
    #[error("connection closed by peer")]
    TransportClosed,

    /// Lower-level I/O failure on the transport.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A response payload violated the fixed wire layout.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_transport_closed_display() {
        let err = WireError::TransportClosed;
        assert_eq!(err.to_string(), "connection closed by peer");
    }

    #[test]
    fn error_transport_display_contains_inner() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let err = WireError::Transport(io_err);
        assert!(err.to_string().contains("transport error"));
        assert!(err.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_malformed_response_display() {
        let err = WireError::MalformedResponse("payload too short".into());
        assert_eq!(err.to_string(), "malformed response: payload too short");
    }

    #[test]
    fn error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: WireError = io_err.into();
        assert!(matches!(err, WireError::Transport(_)));
    }
}
