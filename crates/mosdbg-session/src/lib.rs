//! mosdbg-session — debug session management for mosdbg.
//!
//! Owns the TCP connection to a remote emulator's debug port and
//! exposes one blocking method per protocol command. The wire format
//! itself lives in `mosdbg-wire`.

pub mod error;
pub mod session;

// Re-export key types for convenience.
pub use error::SessionError;
pub use session::{ConnectionState, DebugSession, CLIENT_VERSION};
