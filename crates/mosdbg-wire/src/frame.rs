//! Frame layer of the emulator debug protocol.
//!
//! Requests are `[u16 length][u16 opcode][payload]` and responses
//! `[u16 length][payload]`, all integers big-endian. The length field
//! counts every byte after itself, so a request's length is always
//! `2 + payload.len()`.

use std::io::Read;

use tracing::trace;

use crate::error::WireError;

/// Commands understood by the emulator's debug port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Command {
    /// Query the emulator's version string.
    About = 1,
    /// Ask the emulator process to exit.
    Shutdown = 2,
    /// Disassemble memory into a text listing.
    Disassemble = 3,
    /// Dump the CPU registers.
    ReadRegisters = 4,
    /// Execute a number of instructions, then halt.
    Step = 5,
    /// Pause the emulator.
    Halt = 6,
    /// Resume execution until the next halt.
    Continue = 7,
    /// Read a block of emulator memory.
    ReadMemory = 8,
    /// Set an instruction breakpoint.
    AddBreakpoint = 9,
    /// Clear an instruction breakpoint.
    RemoveBreakpoint = 10,
    /// List instruction and memory-access breakpoints.
    ListBreakpoints = 11,
    /// Set a watchpoint on memory access.
    AddWatchpoint = 12,
    /// Clear a memory-access watchpoint.
    RemoveWatchpoint = 13,
}

impl Command {
    /// The opcode sent on the wire.
    pub fn opcode(self) -> u16 {
        self as u16
    }
}

/// Build a request frame: `[u16 length][u16 opcode][payload]`.
///
/// The payload is copied verbatim; its per-command shape is the
/// caller's responsibility.
pub fn encode_request(command: Command, payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() + 2) as u16;
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&length.to_be_bytes());
    frame.extend_from_slice(&command.opcode().to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Read one response frame, returning its payload.
///
/// Blocks until the 2-byte length prefix and the full declared payload
/// have arrived, accumulating across short reads. A zero-length frame
/// yields an empty payload.
pub fn read_frame(transport: &mut impl Read) -> Result<Vec<u8>, WireError> {
    let mut prefix = [0u8; 2];
    read_full(transport, &mut prefix)?;
    let length = u16::from_be_bytes(prefix) as usize;
    let mut payload = vec![0u8; length];
    read_full(transport, &mut payload)?;
    trace!("read response frame with {} byte payload", length);
    Ok(payload)
}

/// Fill `buf` completely, mapping EOF mid-read to `TransportClosed`.
fn read_full(transport: &mut impl Read, buf: &mut [u8]) -> Result<(), WireError> {
    let mut filled = 0;
    while filled < buf.len() {
        match transport.read(&mut buf[filled..]) {
            Ok(0) => return Err(WireError::TransportClosed),
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WireError::Transport(e)),
        }
    }
    Ok(())
}
