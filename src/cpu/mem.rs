use std::fmt::{self, Debug};

use crate::debug::{self, DebugHexByte};
use crate::error::{Result, VmError};

const LEN: usize = 4 * 1024;

#[derive(Clone)]
pub struct Mem {
    bytes: Box<[u8; LEN]>,
}

impl Mem {
    pub const LEN: usize = LEN;
    pub const ROM_START: u16 = 0x0200;
    pub const MAX_ROM_LEN: usize = Self::LEN - Self::ROM_START as usize;
    pub const FONT_START: u16 = 0x0050;

    /// Zeroed memory with the built-in hex digit sprites in place.
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: Box::new([0u8; LEN]),
        };
        mem.reset();
        mem
    }

    /// Zero every byte, then copy the font table into its reserved region.
    pub fn reset(&mut self) {
        self.bytes.fill(0);

        let font: Vec<_> = DIGITS.into_iter().flatten().collect();
        let start = Self::FONT_START as usize;
        self.bytes[start..][..font.len()].copy_from_slice(&font);
    }

    /// Copy a ROM into memory, starting at offset 0x200.
    ///
    /// A ROM that doesn't fit is rejected before anything is written.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > Self::MAX_ROM_LEN {
            return Err(VmError::ProgramTooLarge {
                len: rom.len(),
                max: Self::MAX_ROM_LEN,
            });
        }

        let start = Self::ROM_START as usize;
        self.bytes[start..][..rom.len()].copy_from_slice(rom);
        Ok(())
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(VmError::OutOfBoundsAccess { addr })
    }

    pub fn write_byte(&mut self, addr: usize, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(addr)
            .ok_or(VmError::OutOfBoundsAccess { addr })?;
        *byte = value;
        Ok(())
    }

    /// Big endian: the byte at `addr` is the high byte.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let hi = self.read_byte(addr)?;
        let lo = self.read_byte(addr + 1)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Borrow `len` bytes starting at `addr`, failing if any of them is out of range.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        self.check_range(addr, len)?;
        Ok(&self.bytes[addr..addr + len])
    }

    /// Mutable version of [`Mem::slice`].
    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        self.check_range(addr, len)?;
        Ok(&mut self.bytes[addr..addr + len])
    }

    fn check_range(&self, addr: usize, len: usize) -> Result<()> {
        // Checked even for an empty range: `addr` itself must be a valid slice start.
        if addr.saturating_add(len) > Self::LEN {
            // Report the first address that doesn't exist.
            return Err(VmError::OutOfBoundsAccess {
                addr: addr.max(Self::LEN),
            });
        }
        Ok(())
    }

    /// Address of the 5-byte glyph for the low nibble of `digit`.
    pub fn sprite_offset(digit: u8) -> u16 {
        Self::FONT_START + (digit & 0x0f) as u16 * GLYPH_LEN as u16
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

const GLYPH_LEN: usize = 5;

/// Bitmaps for the built-in hex digit sprites.
const DIGITS: [[u8; GLYPH_LEN]; 16] = [
    [0xF0, 0x90, 0x90, 0x90, 0xF0],
    [0x20, 0x60, 0x20, 0x20, 0x70],
    [0xF0, 0x10, 0xF0, 0x80, 0xF0],
    [0xF0, 0x10, 0xF0, 0x10, 0xF0],
    [0x90, 0x90, 0xF0, 0x10, 0x10],
    [0xF0, 0x80, 0xF0, 0x10, 0xF0],
    [0xF0, 0x80, 0xF0, 0x90, 0xF0],
    [0xF0, 0x10, 0x20, 0x40, 0x40],
    [0xF0, 0x90, 0xF0, 0x90, 0xF0],
    [0xF0, 0x90, 0xF0, 0x10, 0xF0],
    [0xF0, 0x90, 0xF0, 0x90, 0x90],
    [0xE0, 0x90, 0xE0, 0x90, 0xE0],
    [0xF0, 0x80, 0x80, 0x80, 0xF0],
    [0xE0, 0x90, 0x90, 0x90, 0xE0],
    [0xF0, 0x80, 0xF0, 0x80, 0xF0],
    [0xF0, 0x80, 0xF0, 0x80, 0x80],
];

impl Debug for Mem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return self.debug_compact(f);
        }

        // Similar to unix `hexdump`: print rows of bytes.

        writeln!(f)?;

        let mut prev_blank = false;
        for (i, line) in self.bytes.chunks(16).enumerate() {
            // Skip large blocks of zeros.
            if line.iter().all(|&b| b == 0) {
                // Print an indication at the start of the block.
                if !prev_blank {
                    writeln!(f, "...")?;
                }
                prev_blank = true;
                continue;
            }
            prev_blank = false;

            write!(f, "{i:02x}0: ")?;
            debug::write_row(f, line)?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Mem {
    /// Helper for <Mem as Debug>::fmt
    fn debug_compact(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show up to and including the last non-zero value.
        // I.e., skip the suffix of all zeros.
        let last_nonzero = self.bytes.iter().rposition(|&x| x != 0);
        let end_idx = last_nonzero.map(|i| i + 1).unwrap_or(0);
        let entries = self.bytes[..end_idx].iter().copied().map(DebugHexByte);

        f.debug_list().entries(entries).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_at_reserved_offset() {
        let mem = Mem::new();
        let font = mem.slice(0x050, 80).unwrap();
        let expected: Vec<u8> = DIGITS.into_iter().flatten().collect();
        assert_eq!(font, &expected[..]);
        assert_eq!(&font[..5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(&font[75..], &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn everything_outside_font_is_zeroed() {
        let mem = Mem::new();
        assert!(mem.bytes[..0x050].iter().all(|&b| b == 0));
        assert!(mem.bytes[0x0a0..].iter().all(|&b| b == 0));
    }

    #[test]
    fn reset_clears_program_and_restores_font() {
        let mut mem = Mem::new();
        mem.load_program(&[0x12, 0x34]).unwrap();
        mem.write_byte(0x050, 0xff).unwrap();

        mem.reset();

        assert_eq!(mem.read_word(0x200).unwrap(), 0);
        assert_eq!(mem.read_byte(0x050).unwrap(), 0xF0);
    }

    #[test]
    fn program_is_placed_at_0x200() {
        let mut mem = Mem::new();
        mem.load_program(&[0x00, 0xe0, 0x12, 0x00]).unwrap();
        assert_eq!(mem.slice(0x200, 4).unwrap(), &[0x00, 0xe0, 0x12, 0x00]);
        assert_eq!(mem.read_byte(0x204).unwrap(), 0);
    }

    #[test]
    fn largest_program_fits() {
        let mut mem = Mem::new();
        let rom = vec![0xaa; 3584];
        mem.load_program(&rom).unwrap();
        assert_eq!(mem.read_byte(0xfff).unwrap(), 0xaa);
    }

    #[test]
    fn oversized_program_leaves_memory_untouched() {
        let mut mem = Mem::new();
        mem.load_program(&[1, 2, 3]).unwrap();
        let before = mem.clone();

        let err = mem.load_program(&vec![0xbb; 3585]).unwrap_err();

        assert!(matches!(
            err,
            VmError::ProgramTooLarge {
                len: 3585,
                max: 3584
            }
        ));
        assert_eq!(before.bytes, mem.bytes);
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut mem = Mem::new();
        assert!(matches!(
            mem.read_byte(0x1000),
            Err(VmError::OutOfBoundsAccess { addr: 0x1000 })
        ));
        assert!(matches!(
            mem.write_byte(0x1234, 1),
            Err(VmError::OutOfBoundsAccess { addr: 0x1234 })
        ));
        // The second byte of a word at the last address doesn't exist.
        assert!(matches!(
            mem.read_word(0xfff),
            Err(VmError::OutOfBoundsAccess { addr: 0x1000 })
        ));
    }

    #[test]
    fn slices_are_bounds_checked() {
        let mem = Mem::new();
        assert_eq!(mem.slice(0xffe, 2).unwrap().len(), 2);
        assert!(matches!(
            mem.slice(0xffe, 3),
            Err(VmError::OutOfBoundsAccess { addr: 0x1000 })
        ));
        assert!(mem.slice(0x1000, 0).unwrap().is_empty());
    }

    #[test]
    fn empty_slices_past_the_end_fail() {
        let mut mem = Mem::new();
        assert!(matches!(
            mem.slice(0x1001, 0),
            Err(VmError::OutOfBoundsAccess { addr: 0x1001 })
        ));
        assert!(matches!(
            mem.slice(0x2000, 0),
            Err(VmError::OutOfBoundsAccess { addr: 0x2000 })
        ));
        assert!(matches!(
            mem.slice_mut(0xffff, 0),
            Err(VmError::OutOfBoundsAccess { addr: 0xffff })
        ));
    }

    #[test]
    fn sprite_offsets_use_low_nibble() {
        assert_eq!(Mem::sprite_offset(0x0), 0x050);
        assert_eq!(Mem::sprite_offset(0xa), 0x050 + 50);
        assert_eq!(Mem::sprite_offset(0xf), 0x09b);
        assert_eq!(Mem::sprite_offset(0x1f), 0x09b);
    }

    #[test]
    fn compact_debug_skips_trailing_zeros() {
        let mut mem = Mem::new();
        mem.reset();
        mem.bytes.fill(0);
        mem.write_byte(2, 0xab).unwrap();
        assert_eq!(format!("{mem:?}"), "[00, 00, ab]");
    }
}
