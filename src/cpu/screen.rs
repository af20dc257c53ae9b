use std::fmt::{self, Debug};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl From<(u8, u8)> for Point {
    fn from((x, y): (u8, u8)) -> Self {
        Self {
            x: x as usize,
            y: y as usize,
        }
    }
}

impl Point {
    /// Offset by `(dx, dy)`, wrapping around both screen edges.
    #[must_use]
    pub fn wrapping_add(self, dx: usize, dy: usize) -> Self {
        Self {
            x: (self.x + dx) % WIDTH,
            y: (self.y + dy) % HEIGHT,
        }
    }
}

/// A read-only copy of the display, handed to whoever paints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    rows: [[bool; WIDTH]; HEIGHT],
}

impl Frame {
    fn blank() -> Self {
        Self {
            rows: [[false; WIDTH]; HEIGHT],
        }
    }

    /// Coordinates wrap like sprite drawing does.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.rows[y % HEIGHT][x % WIDTH]
    }

    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.rows
    }

    pub fn lit_pixels(&self) -> usize {
        self.rows.iter().flatten().filter(|&&p| p).count()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::blank()
    }
}

impl Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in &self.rows {
            for &pixel in row {
                let c = if pixel { '#' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The 64x32 monochrome display buffer.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    frame: Frame,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.frame = Frame::blank();
    }

    /// XOR an 8-pixel-wide sprite onto the screen, one byte per row, wrapping
    /// at both edges. Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, top_left: Point, sprite: &[u8]) -> bool {
        let top_left = top_left.wrapping_add(0, 0);
        let mut collision = false;

        for (dy, &row) in sprite.iter().enumerate() {
            for dx in 0..8 {
                let bit = 0x80 >> dx;
                if row & bit != 0 && self.flip(top_left.wrapping_add(dx, dy)) {
                    collision = true;
                }
            }
        }

        collision
    }

    /// Return true if the pixel was lit before flipping.
    fn flip(&mut self, p: Point) -> bool {
        let pixel = &mut self.frame.rows[p.y][p.x];
        let was_high = *pixel;
        *pixel ^= true;
        was_high
    }

    pub fn snapshot(&self) -> Frame {
        self.frame.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pixel_collides_on_second_draw() {
        let mut screen = Screen::new();

        assert!(!screen.draw_sprite((0, 0).into(), &[0x80]));
        assert!(screen.snapshot().pixel(0, 0));
        assert_eq!(screen.snapshot().lit_pixels(), 1);

        assert!(screen.draw_sprite((0, 0).into(), &[0x80]));
        assert!(!screen.snapshot().pixel(0, 0));
        assert_eq!(screen.snapshot().lit_pixels(), 0);
    }

    #[test]
    fn sprites_wrap_on_both_axes() {
        let mut screen = Screen::new();
        screen.draw_sprite((62, 31).into(), &[0xf0, 0xf0]);

        let frame = screen.snapshot();
        for (x, y) in [(62, 31), (63, 31), (0, 31), (1, 31), (62, 0), (1, 0)] {
            assert!(frame.pixel(x, y), "({x}, {y}) should be lit");
        }
        assert_eq!(frame.lit_pixels(), 8);
    }

    #[test]
    fn start_position_wraps_too() {
        let mut screen = Screen::new();
        screen.draw_sprite((64 + 3, 32 + 2).into(), &[0x80]);
        assert!(screen.snapshot().pixel(3, 2));
    }

    #[test]
    fn overlap_without_lit_pixels_is_not_a_collision() {
        let mut screen = Screen::new();
        screen.draw_sprite((0, 0).into(), &[0b1010_0000]);
        assert!(!screen.draw_sprite((0, 0).into(), &[0b0101_0000]));
        assert_eq!(screen.snapshot().lit_pixels(), 4);
    }

    #[test]
    fn clear_turns_everything_off() {
        let mut screen = Screen::new();
        screen.draw_sprite((10, 10).into(), &[0xff; 15]);
        screen.clear();
        assert_eq!(screen.snapshot(), Frame::default());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut screen = Screen::new();
        let before = screen.snapshot();
        screen.draw_sprite((5, 5).into(), &[0x80]);
        assert_eq!(before.lit_pixels(), 0);
        assert_eq!(screen.snapshot().lit_pixels(), 1);
    }

    #[test]
    fn debug_draws_hash_for_lit_pixels() {
        let mut screen = Screen::new();
        screen.draw_sprite((0, 0).into(), &[0xc0]);
        let text = format!("{:?}", screen.snapshot());
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with("##."));
        assert_eq!(first_row.len(), WIDTH);
    }
}
