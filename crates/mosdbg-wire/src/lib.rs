//! mosdbg-wire — wire codec for the 6502 emulator debug protocol.
//!
//! Implements the length-prefixed binary framing spoken by the
//! emulator's debug port, plus typed decoding of each response payload:
//! register dumps, memory blocks, and breakpoint lists. Everything here
//! is transport-agnostic; sockets live in `mosdbg-session`.

pub mod breakpoints;
pub mod error;
pub mod frame;
pub mod hexdump;
pub mod memory;
pub mod registers;

// Re-export key types for convenience.
pub use breakpoints::BreakpointList;
pub use error::WireError;
pub use frame::{encode_request, read_frame, Command};
pub use hexdump::format_memory_dump;
pub use memory::MemoryBlock;
pub use registers::{RegisterSnapshot, StatusFlag};
