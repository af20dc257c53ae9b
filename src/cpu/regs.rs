use std::{
    fmt::{self, Debug},
    ops::{Index, IndexMut},
};

use crate::debug;

/// V0 through VF. VF doubles as the carry/borrow/collision flag.
#[derive(Clone, Default)]
pub struct Regs {
    regs: [u8; 16],
}

impl Regs {
    pub const FLAG: u8 = 0xf;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_flag(&mut self, set: bool) {
        self.regs[Self::FLAG as usize] = set as u8;
    }
}

/// Indexed by a 4-bit register number taken from an opcode.
impl Index<u8> for Regs {
    type Output = u8;

    fn index(&self, index: u8) -> &Self::Output {
        &self.regs[(index & 0x0f) as usize]
    }
}

impl IndexMut<u8> for Regs {
    fn index_mut(&mut self, index: u8) -> &mut Self::Output {
        &mut self.regs[(index & 0x0f) as usize]
    }
}

impl Debug for Regs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        debug::write_row(f, &self.regs)?;
        write!(f, " ]")?;
        Ok(())
    }
}
