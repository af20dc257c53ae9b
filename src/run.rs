//! The paced run loop, and the seam to whatever hosts the machine.

use crate::config::Config;
use crate::cpu::{Chip8, Frame, Keypad, Step, Timers};
use anyhow::{Context, Result};
use log::{error, info};
use std::{
    thread,
    time::{Duration, Instant},
};

/// What the host has to provide: input, and somewhere to show the display.
pub trait Frontend {
    /// Called once per frame, between instructions. Update `keypad` from
    /// pending input events. A returned `Control::Quit` is the only way to
    /// stop the loop from outside.
    fn poll_input(&mut self, keypad: &mut Keypad) -> Result<Control>;

    /// Called once per frame with the current display and sound flag.
    fn present(&mut self, frame: &Frame, sound_active: bool) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Why [`run`] returned normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// Only with [`Config::exit_on_halt`].
    Halted,
}

/// Don't try to catch up on more than this much lost time at once.
const MAX_BACKLOG: Duration = Duration::from_millis(100);

/// Converts elapsed time into a number of instructions to execute.
#[derive(Debug)]
struct Pacer {
    period: Duration,
    pending: Duration,
}

impl Pacer {
    fn new(instructions_per_second: u32) -> Self {
        let period = Duration::from_secs(1) / instructions_per_second.max(1);
        Self {
            period: period.max(Duration::from_nanos(1)),
            pending: Duration::ZERO,
        }
    }

    fn owed(&mut self, elapsed: Duration) -> u32 {
        self.pending = (self.pending + elapsed).min(MAX_BACKLOG);
        let n = (self.pending.as_nanos() / self.period.as_nanos()) as u32;
        self.pending -= self.period * n;
        n
    }
}

/// Drive `chip8` until the frontend asks to quit, the program halts (if
/// configured), or the interpreter fails.
///
/// Each iteration is one 60 Hz frame: poll input, advance the timers by the
/// wall-clock time that passed, execute the instructions owed at the
/// configured rate, present the display, then sleep until the next frame.
pub fn run(chip8: &mut Chip8, frontend: &mut dyn Frontend, config: &Config) -> Result<Exit> {
    info!(
        "running at {} instructions per second",
        config.instructions_per_second
    );

    let mut pacer = Pacer::new(config.instructions_per_second);
    let mut previous = Instant::now();

    loop {
        if frontend.poll_input(chip8.keypad_mut())? == Control::Quit {
            info!("quit requested");
            return Ok(Exit::Quit);
        }

        let now = Instant::now();
        let elapsed = now.duration_since(previous);
        previous = now;

        chip8.tick_timers(elapsed);

        for _ in 0..pacer.owed(elapsed) {
            if config.exit_on_halt && chip8.is_halted() {
                frontend.present(&chip8.frame(), chip8.sound_active())?;
                info!("program halted at 0x{:03x}", chip8.pc());
                return Ok(Exit::Halted);
            }

            match chip8.step() {
                // Nothing will change until the next poll.
                Ok(Step::Waiting) => break,
                Ok(_) => {}
                Err(err) => {
                    error!("machine state at failure: {chip8:#?}");
                    return Err(err).context("interpreter stopped");
                }
            }
        }

        frontend.present(&chip8.frame(), chip8.sound_active())?;
        sleep_until(now + Timers::TICK);
    }
}

fn sleep_until(deadline: Instant) {
    thread::sleep(deadline.saturating_duration_since(Instant::now()));
}
