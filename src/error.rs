use std::{io, path::PathBuf};

/// Failures surfaced by the virtual machine. All of them are fatal: the run
/// loop stops and reports them rather than continuing.
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    #[error("program is {len} bytes, but at most {max} bytes fit above 0x200")]
    ProgramTooLarge { len: usize, max: usize },

    #[error("unknown opcode 0x{opcode:04x} (pc=0x{pc:04x})")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("memory access out of bounds at 0x{addr:04x}")]
    OutOfBoundsAccess { addr: usize },

    #[error("stack overflow: more than 16 nested calls")]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("failed to read ROM {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = VmError> = std::result::Result<T, E>;
