//! Breakpoint list decoding.

use crate::error::WireError;

/// The emulator's current breakpoints, as reported in response to every
/// breakpoint and watchpoint command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointList {
    /// Addresses that halt execution before the instruction there runs.
    pub instruction: Vec<u16>,
    /// Addresses that halt execution when read or written.
    pub memory_access: Vec<u16>,
}

impl BreakpointList {
    /// Decode `[u16 nInstr][u16 nMem][nInstr addrs][nMem addrs]`,
    /// big-endian, instruction addresses first.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        if payload.len() < 4 {
            return Err(WireError::MalformedResponse(format!(
                "breakpoint list header needs 4 bytes, got {}",
                payload.len()
            )));
        }
        let n_instr = u16::from_be_bytes([payload[0], payload[1]]) as usize;
        let n_mem = u16::from_be_bytes([payload[2], payload[3]]) as usize;
        let expected = 4 + 2 * (n_instr + n_mem);
        if payload.len() < expected {
            return Err(WireError::MalformedResponse(format!(
                "breakpoint list declares {} addresses but frame is {} bytes",
                n_instr + n_mem,
                payload.len()
            )));
        }
        let mut addrs = payload[4..expected]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        Ok(Self {
            instruction: addrs.by_ref().take(n_instr).collect(),
            memory_access: addrs.collect(),
        })
    }

    /// True when no breakpoints of either kind are set.
    pub fn is_empty(&self) -> bool {
        self.instruction.is_empty() && self.memory_access.is_empty()
    }
}
