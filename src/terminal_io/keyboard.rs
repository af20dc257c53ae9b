use crate::cpu::Keypad;
use crate::run::Control;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Without release events, a key counts as held for this many frames after
/// each press (or auto-repeat).
const HOLD_FRAMES: u8 = 6;

#[derive(Debug)]
pub struct Keyboard {
    reports_release: bool,
    held: [u8; 16],
}

impl Keyboard {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            held: [0; 16],
        }
    }

    /// Consume pending input events; update `keypad`.
    pub fn update(&mut self, keypad: &mut Keypad) -> Result<Control> {
        if !self.reports_release {
            self.expire_held(keypad);
        }

        while event::poll(Duration::from_secs(0))? {
            match filter_event(&event::read()?) {
                Some(Input::Quit) => return Ok(Control::Quit),
                Some(Input::Key { key, pressed }) => {
                    keypad.set_key_state(key, pressed);
                    if pressed && !self.reports_release {
                        self.held[key as usize] = HOLD_FRAMES;
                    }
                }
                None => {}
            }
        }

        Ok(Control::Continue)
    }

    fn expire_held(&mut self, keypad: &mut Keypad) {
        for (key, frames) in self.held.iter_mut().enumerate() {
            if *frames == 0 {
                continue;
            }
            *frames -= 1;
            if *frames == 0 {
                keypad.set_key_state(key as u8, false);
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Key { key: u8, pressed: bool },
    Quit,
}

/// If this is a relevant terminal event, translate it.
fn filter_event(terminal_event: &Event) -> Option<Input> {
    let Event::Key(e) = terminal_event else {
        return None;
    };
    let pressed = match e.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => true,
        KeyEventKind::Release => false,
    };

    let is_ctrl_c = matches!(e.code, KeyCode::Char('c' | 'C'))
        && e.modifiers.contains(KeyModifiers::CONTROL);
    if pressed && (is_ctrl_c || e.code == KeyCode::Esc) {
        return Some(Input::Quit);
    }

    let KeyCode::Char(c) = e.code else {
        return None;
    };
    let key = keycode_to_chip8(c)?;

    Some(Input::Key { key, pressed })
}

/// Translate a key from the physical keyboard into one of the 16 virtual keys
/// on the CHIP-8.
///
/// The COSMAC VIP hex keypad maps onto the 4x4 square from `1` to `v`:
///
/// ```text
/// 1 2 3 C      1 2 3 4
/// 4 5 6 D      q w e r
/// 7 8 9 E      a s d f
/// A 0 B F      z x c v
/// ```
fn keycode_to_chip8(c: char) -> Option<u8> {
    let key = match c.to_ascii_lowercase() {
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        '4' => 0xc,

        'q' => 0x4,
        'w' => 0x5,
        'e' => 0x6,
        'r' => 0xd,

        'a' => 0x7,
        's' => 0x8,
        'd' => 0x9,
        'f' => 0xe,

        'z' => 0xa,
        'x' => 0x0,
        'c' => 0xb,
        'v' => 0xf,

        _ => return None,
    };
    Some(key)
}
