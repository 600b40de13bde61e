//! CPU register snapshot decoding.
//!
//! The emulator answers `ReadRegisters`, `Step`, `Halt`, and `Continue`
//! with the same fixed 16-byte dump:
//! `[X][Y][A][SP][PC:u16][SR][pad][clockHigh:u32][clockLow:u32]`,
//! big-endian. The pad byte carries no information.

use std::fmt;

use crate::error::WireError;

/// Wire length of a register dump payload.
const PAYLOAD_LEN: usize = 16;

/// A named bit of the 6502 status register.
///
/// Bit 0x20 is unused by the architecture and never decodes to a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    /// Carry out of the last arithmetic operation (0x01).
    Carry,
    /// Last result was zero (0x02).
    Zero,
    /// Maskable interrupts are disabled (0x04).
    InterruptDisable,
    /// BCD arithmetic mode (0x08).
    Decimal,
    /// Execution stopped via BRK or the debugger (0x10).
    Breakpoint,
    /// Signed overflow in the last operation (0x40).
    Overflow,
    /// Last result was negative (0x80).
    Negative,
}

impl StatusFlag {
    /// Every named flag, low bit first.
    pub const ALL: [StatusFlag; 7] = [
        StatusFlag::Carry,
        StatusFlag::Zero,
        StatusFlag::InterruptDisable,
        StatusFlag::Decimal,
        StatusFlag::Breakpoint,
        StatusFlag::Overflow,
        StatusFlag::Negative,
    ];

    /// The bit this flag occupies in the status register.
    pub fn mask(self) -> u8 {
        match self {
            StatusFlag::Carry => 0x01,
            StatusFlag::Zero => 0x02,
            StatusFlag::InterruptDisable => 0x04,
            StatusFlag::Decimal => 0x08,
            StatusFlag::Breakpoint => 0x10,
            StatusFlag::Overflow => 0x40,
            StatusFlag::Negative => 0x80,
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusFlag::Carry => "Carry",
            StatusFlag::Zero => "Zero",
            StatusFlag::InterruptDisable => "InterruptDisable",
            StatusFlag::Decimal => "Decimal",
            StatusFlag::Breakpoint => "Breakpoint",
            StatusFlag::Overflow => "Overflow",
            StatusFlag::Negative => "Negative",
        };
        f.write_str(name)
    }
}

/// A point-in-time dump of the emulated CPU's registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Accumulator.
    pub accumulator: u8,
    /// Stack pointer (offset into the $01xx stack page).
    pub stack_pointer: u8,
    /// Program counter.
    pub program_counter: u16,
    /// Raw status register byte.
    pub status: u8,
    /// High half of the cycle counter.
    pub clock_high: u32,
    /// Low half of the cycle counter.
    pub clock_low: u32,
}

impl RegisterSnapshot {
    /// Decode the fixed 16-byte register dump payload.
    ///
    /// Any other payload length is malformed.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        if payload.len() != PAYLOAD_LEN {
            return Err(WireError::MalformedResponse(format!(
                "register dump must be {} bytes, got {}",
                PAYLOAD_LEN,
                payload.len()
            )));
        }
        Ok(Self {
            x: payload[0],
            y: payload[1],
            accumulator: payload[2],
            stack_pointer: payload[3],
            program_counter: u16::from_be_bytes([payload[4], payload[5]]),
            status: payload[6],
            // payload[7] is padding
            clock_high: u32::from_be_bytes([payload[8], payload[9], payload[10], payload[11]]),
            clock_low: u32::from_be_bytes([payload[12], payload[13], payload[14], payload[15]]),
        })
    }

    /// Re-encode into the 16-byte wire layout, pad byte zero.
    pub fn to_bytes(&self) -> [u8; PAYLOAD_LEN] {
        let mut bytes = [0u8; PAYLOAD_LEN];
        bytes[0] = self.x;
        bytes[1] = self.y;
        bytes[2] = self.accumulator;
        bytes[3] = self.stack_pointer;
        bytes[4..6].copy_from_slice(&self.program_counter.to_be_bytes());
        bytes[6] = self.status;
        bytes[8..12].copy_from_slice(&self.clock_high.to_be_bytes());
        bytes[12..16].copy_from_slice(&self.clock_low.to_be_bytes());
        bytes
    }

    /// The flags set in the status register, low bit first.
    pub fn flags(&self) -> Vec<StatusFlag> {
        StatusFlag::ALL
            .iter()
            .copied()
            .filter(|flag| self.status & flag.mask() != 0)
            .collect()
    }

    /// Total cycle count assembled from the two 32-bit halves.
    pub fn clock_count(&self) -> u64 {
        (u64::from(self.clock_high) << 32) | u64::from(self.clock_low)
    }
}
