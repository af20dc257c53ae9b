use crate::cpu::Frame;
use std::fmt::{self, Display};

/// Renders a frame for a raw-mode terminal. Each pixel is two cells wide so
/// the picture keeps roughly the right aspect ratio.
pub struct DisplayFrame<'a>(pub &'a Frame);

impl<'a> Display for DisplayFrame<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.rows() {
            for &pixel in row {
                let cell = if pixel { "██" } else { "  " };
                write!(f, "{cell}")?;
            }
            // Raw mode doesn't translate \n into \r\n for us.
            write!(f, "\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{Screen, HEIGHT, WIDTH};

    #[test]
    fn one_line_per_row() {
        let mut screen = Screen::new();
        screen.draw_sprite((0, 0).into(), &[0x80]);
        let text = DisplayFrame(&screen.snapshot()).to_string();

        let lines: Vec<_> = text.split("\r\n").collect();
        // Trailing separator leaves an empty last element.
        assert_eq!(lines.len(), HEIGHT + 1);
        assert!(lines[0].starts_with("██  "));
        assert_eq!(lines[1].chars().count(), 2 * WIDTH);
    }
}
