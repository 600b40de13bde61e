//! Hex+ASCII rendering of memory blocks.

use std::fmt::Write;

use crate::memory::MemoryBlock;

/// Render a memory block as a hex+ASCII dump, 16 bytes per line.
///
/// Each line carries a 4-digit lowercase hex address, sixteen
/// space-separated hex cells with an extra space after the eighth, and
/// the ASCII column between `|` characters. Lines are aligned to
/// 16-byte address boundaries, so positions before the block's base on
/// the first line and after its final byte on the last line render as
/// blank cells. Printable bytes (0x20..=0x7e) appear literally in the
/// ASCII column; everything else is a dot.
pub fn format_memory_dump(block: &MemoryBlock) -> String {
    if block.data.is_empty() {
        return String::new();
    }
    let base = u32::from(block.base_address);
    let end = base + block.data.len() as u32;
    let mut lines = Vec::new();
    let mut row = base & !0xf;
    while row < end {
        lines.push(format_row(row, base, end, &block.data));
        row += 16;
    }
    lines.join("\n")
}

fn format_row(row: u32, base: u32, end: u32, data: &[u8]) -> String {
    let mut hex = String::new();
    let mut ascii = String::new();
    for i in 0..16u32 {
        let addr = row + i;
        if addr >= base && addr < end {
            let byte = data[(addr - base) as usize];
            let _ = write!(hex, "{:02x}", byte);
            ascii.push(if (0x20..=0x7e).contains(&byte) {
                byte as char
            } else {
                '.'
            });
        } else {
            hex.push_str("  ");
            ascii.push(' ');
        }
        if i != 15 {
            hex.push(' ');
            if i == 7 {
                hex.push(' ');
            }
        }
    }
    format!("{:04x}  {}  |{}|", row, hex, ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(base_address: u16, data: &[u8]) -> MemoryBlock {
        MemoryBlock {
            base_address,
            data: data.to_vec(),
        }
    }

    #[test]
    fn hexdump_full_aligned_line() {
        let dump = format_memory_dump(&block(0x0010, &[0x41; 16]));
        assert_eq!(
            dump,
            "0010  41 41 41 41 41 41 41 41  41 41 41 41 41 41 41 41  |AAAAAAAAAAAAAAAA|"
        );
    }

    #[test]
    fn hexdump_blank_leading_cells_on_unaligned_base() {
        let dump = format_memory_dump(&block(0x0008, b"ABCDEFGH"));
        let expected = format!(
            "0000  {}41 42 43 44 45 46 47 48  |        ABCDEFGH|",
            " ".repeat(25)
        );
        assert_eq!(dump, expected);
    }

    #[test]
    fn hexdump_blank_trailing_cells_on_short_last_line() {
        let dump = format_memory_dump(&block(0x0020, &[0x00, 0x01]));
        let expected = format!("0020  00 01{}  |..{}|", " ".repeat(43), " ".repeat(14));
        assert_eq!(dump, expected);
    }

    #[test]
    fn hexdump_unaligned_block_spans_two_lines() {
        let dump = format_memory_dump(&block(0x100a, &[0x61; 16]));
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1000"));
        assert!(lines[1].starts_with("1010"));
        // Six bytes land on the first line, ten on the second.
        assert!(lines[0].ends_with(&format!("|{}aaaaaa|", " ".repeat(10))));
        assert!(lines[1].ends_with(&format!("|aaaaaaaaaa{}|", " ".repeat(6))));
    }

    #[test]
    fn hexdump_extra_gap_splits_the_row() {
        let dump = format_memory_dump(&block(0x0000, &[0xff; 16]));
        assert!(dump.contains("ff ff ff ff ff ff ff ff  ff ff ff ff ff ff ff ff"));
    }

    #[test]
    fn hexdump_nonprintable_bytes_become_dots() {
        let dump = format_memory_dump(&block(0x0000, &[0x00, 0x1f, 0x20, 0x7e, 0x7f, 0xff]));
        // 0x20 is a literal space, 0x7e a literal tilde, the rest dots.
        assert!(dump.ends_with(&format!("|.. ~..{}|", " ".repeat(10))));
    }

    #[test]
    fn hexdump_addresses_are_lowercase_hex() {
        let dump = format_memory_dump(&block(0xabc0, &[0x01]));
        assert!(dump.starts_with("abc0"));
    }

    #[test]
    fn hexdump_empty_block_renders_nothing() {
        assert_eq!(format_memory_dump(&block(0x1234, &[])), "");
    }
}
