//! Helpers for Debug impls.

use std::fmt::{self, Debug};

pub(crate) struct DebugHexByte(pub u8);

impl Debug for DebugHexByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// Write a row of hex-formatted bytes, with an extra gap after the 8th.
pub(crate) fn write_row(f: &mut fmt::Formatter<'_>, line: &[u8]) -> fmt::Result {
    for (i, byte) in line.iter().enumerate() {
        match i {
            0 => write!(f, "{byte:02x}")?,
            8 => write!(f, "  {byte:02x}")?,
            _ => write!(f, " {byte:02x}")?,
        }
    }
    Ok(())
}
