use crate::error::{Result, VmError};

pub const CAPACITY: usize = 16;

/// Return addresses for nested subroutine calls.
#[derive(Debug, Clone)]
pub struct Stack {
    values: [u16; CAPACITY],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            values: [0; CAPACITY],
            sp: 0,
        }
    }

    /// Fails without modifying the stack if it's already full.
    pub fn push(&mut self, value: u16) -> Result<()> {
        let slot = self.values.get_mut(self.sp).ok_or(VmError::StackOverflow)?;
        *slot = value;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.values[self.sp])
    }

    /// Number of return addresses currently held (0..=16).
    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
