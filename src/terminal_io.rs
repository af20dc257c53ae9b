mod keyboard;
mod screen;

use self::keyboard::Keyboard;
use self::screen::DisplayFrame;
use crate::cpu::{Frame, Keypad};
use crate::run::{Control, Frontend};
use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::{debug, info};
use std::io::{self, Write};

/// A `crossterm`-based implementation of `Frontend`.
///
/// Sound is the terminal bell, rung whenever the sound timer starts.
#[derive(Debug)]
pub struct TerminalIo {
    keyboard: Keyboard,
    last_frame: Option<Frame>,
    beeping: bool,
    enhanced_keyboard: bool,
}

impl TerminalIo {
    pub fn setup() -> Result<Self> {
        let enhanced_keyboard = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if !enhanced_keyboard {
            info!("terminal doesn't report key releases; keys are held for a few frames");
        }

        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        // From here on, dropping `this` restores the terminal.
        let this = Self {
            keyboard: Keyboard::new(enhanced_keyboard),
            last_frame: None,
            beeping: false,
            enhanced_keyboard,
        };

        let mut stdout = io::stdout();
        if enhanced_keyboard {
            stdout.execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        stdout
            .execute(EnterAlternateScreen)?
            .execute(Hide)?
            .execute(Clear(ClearType::All))?;

        Ok(this)
    }

    fn render(&self, frame: &Frame) -> Result<()> {
        io::stdout()
            .execute(MoveTo(0, 0))?
            .execute(Print(DisplayFrame(frame)))?;
        Ok(())
    }
}

impl Frontend for TerminalIo {
    fn poll_input(&mut self, keypad: &mut Keypad) -> Result<Control> {
        self.keyboard.update(keypad)
    }

    fn present(&mut self, frame: &Frame, sound_active: bool) -> Result<()> {
        if self.last_frame.as_ref() != Some(frame) {
            self.render(frame)?;
            self.last_frame = Some(frame.clone());
        }

        if sound_active && !self.beeping {
            debug!("beep");
            let mut stdout = io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        self.beeping = sound_active;

        Ok(())
    }
}

impl Drop for TerminalIo {
    fn drop(&mut self) {
        fn try_drop(this: &mut TerminalIo) -> Result<()> {
            // Reset the terminal mode. Otherwise it gets all wonky, and you
            // have to close it and open a new one.
            let mut stdout = io::stdout();
            stdout.execute(Show)?.execute(LeaveAlternateScreen)?;
            if this.enhanced_keyboard {
                stdout.execute(PopKeyboardEnhancementFlags)?;
            }
            terminal::disable_raw_mode()?;

            // After leaving the Alternate Screen in the terminal, the text goes away,
            // so we print it again here. This lets us see the last state the screen was
            // in when the emulator exited.
            if let Some(frame) = &this.last_frame {
                print!("{frame:?}");
            }
            Ok(())
        }

        // Ignore errors.
        try_drop(self).ok();
    }
}
