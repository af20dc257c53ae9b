/// State of the 16 hex keys, `0x0..=0xf`.
///
/// Written by the frontend between instructions, read by the interpreter.
/// Key numbers above `0xf` use only their low nibble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_state(&mut self, key: u8, pressed: bool) {
        self.pressed[(key & 0x0f) as usize] = pressed;
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed[(key & 0x0f) as usize]
    }

    /// Lowest-numbered key that is currently down, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed.iter().position(|&p| p).map(|k| k as u8)
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; 16];
    }
}
