//! Memory dump decoding.

use crate::error::WireError;

/// A block of emulator memory returned by a `ReadMemory` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    /// Address of the first byte in `data`.
    pub base_address: u16,
    /// The bytes read, in address order.
    pub data: Vec<u8>,
}

impl MemoryBlock {
    /// Decode a memory dump payload: `[addr:u16][count:u16][data]`.
    ///
    /// Fails when the payload is shorter than its own header plus the
    /// declared count. Bytes beyond the declared count are ignored.
    pub fn decode(payload: &[u8]) -> Result<Self, WireError> {
        if payload.len() < 4 {
            return Err(WireError::MalformedResponse(format!(
                "memory dump header needs 4 bytes, got {}",
                payload.len()
            )));
        }
        let base_address = u16::from_be_bytes([payload[0], payload[1]]);
        let count = u16::from_be_bytes([payload[2], payload[3]]) as usize;
        let data = &payload[4..];
        if data.len() < count {
            return Err(WireError::MalformedResponse(format!(
                "memory dump declares {} bytes but carries {}",
                count,
                data.len()
            )));
        }
        Ok(Self {
            base_address,
            data: data[..count].to_vec(),
        })
    }

    /// Number of bytes in the block.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the block carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_decode_header_and_data() {
        let payload = [0x02, 0x00, 0x00, 0x04, 0xde, 0xad, 0xbe, 0xef];
        let block = MemoryBlock::decode(&payload).unwrap();
        assert_eq!(block.base_address, 0x0200);
        assert_eq!(block.data, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(block.len(), 4);
    }

    #[test]
    fn memory_decode_zero_count() {
        let payload = [0x10, 0x00, 0x00, 0x00];
        let block = MemoryBlock::decode(&payload).unwrap();
        assert_eq!(block.base_address, 0x1000);
        assert!(block.is_empty());
    }

    #[test]
    fn memory_decode_rejects_short_header() {
        for len in [0usize, 1, 2, 3] {
            let payload = vec![0u8; len];
            let err = MemoryBlock::decode(&payload).unwrap_err();
            assert!(matches!(err, WireError::MalformedResponse(_)));
        }
    }

    #[test]
    fn memory_decode_rejects_truncated_data() {
        // Declares 4 bytes, carries 2.
        let payload = [0x02, 0x00, 0x00, 0x04, 0xde, 0xad];
        let err = MemoryBlock::decode(&payload).unwrap_err();
        assert!(err.to_string().contains("declares 4"));
    }

    #[test]
    fn memory_decode_ignores_trailing_bytes() {
        let payload = [0x02, 0x00, 0x00, 0x02, 0xaa, 0xbb, 0xcc, 0xdd];
        let block = MemoryBlock::decode(&payload).unwrap();
        assert_eq!(block.data, vec![0xaa, 0xbb]);
    }
}
