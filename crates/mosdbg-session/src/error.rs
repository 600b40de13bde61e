//! Session error types.

use thiserror::Error;

use mosdbg_wire::WireError;

/// Errors from debug session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The TCP connection to the emulator could not be opened.
    #[error("cannot connect to {addr}: {source}")]
    ConnectionFailed {
        /// The address that was dialed.
        addr: String,
        /// The underlying socket error.
        source: std::io::Error,
    },

    /// An operation was attempted without a live connection.
    #[error("not connected to an emulator")]
    NotConnected,

    /// The exchange failed at the wire level.
    #[error(transparent)]
    Wire(#[from] WireError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_connection_failed_display() {
        let err = SessionError::ConnectionFailed {
            addr: "localhost:6502".into(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert!(err.to_string().contains("localhost:6502"));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn error_not_connected_display() {
        let err = SessionError::NotConnected;
        assert_eq!(err.to_string(), "not connected to an emulator");
    }

    #[test]
    fn error_wire_is_transparent() {
        let err: SessionError = WireError::TransportClosed.into();
        assert_eq!(err.to_string(), "connection closed by peer");
    }
}
