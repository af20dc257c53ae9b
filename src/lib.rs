//! A CHIP-8 virtual machine.
//!
//! [`Chip8`] is the machine itself: feed it a ROM, call [`Chip8::step`] to
//! execute instructions, and [`Chip8::tick_timers`] as wall-clock time
//! passes. [`run`] does that pacing for you against a [`Frontend`], such as
//! the [`TerminalIo`] one.

mod config;
mod cpu;
mod debug;
mod error;
mod run;
mod terminal_io;

pub use config::Config;
pub use cpu::{
    Chip8, Frame, Instr, Keypad, Mem, Point, Screen, State, Step, Timers, HEIGHT, WIDTH,
};
pub use error::{Result, VmError};
pub use run::{run, Control, Exit, Frontend};
pub use terminal_io::TerminalIo;

use std::{fs, path::Path};

/// Read a ROM image from disk. Size is checked when it's loaded.
pub fn read_rom(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| VmError::FileRead {
        path: path.to_owned(),
        source,
    })
}
