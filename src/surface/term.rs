//! Terminal preview of a rendered framebuffer.
//!
//! Maps two framebuffer rows onto one terminal row using the upper-half
//! block, with the 4-bit grayscale levels mapped onto the 256-color
//! grayscale ramp. Output is queued and flushed once per frame.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use super::{FrameBuffer, SurfaceError};
use crate::types::Color;

/// Writes framebuffer contents to a terminal.
#[derive(Debug)]
pub struct TermPreview<W: Write> {
    out: W,
}

impl TermPreview<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TermPreview<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print the buffer, two pixel rows per terminal line.
    pub fn present(&mut self, buffer: &FrameBuffer) -> Result<(), SurfaceError> {
        for y in (0..buffer.height() as i32).step_by(2) {
            for x in 0..buffer.width() as i32 {
                let top = buffer.get(x, y).unwrap_or(Color::BLACK);
                let bottom = buffer.get(x, y + 1).unwrap_or(Color::BLACK);
                queue!(
                    self.out,
                    SetForegroundColor(gray(top)),
                    SetBackgroundColor(gray(bottom)),
                    Print('▀'),
                )?;
            }
            queue!(self.out, ResetColor, Print('\n'))?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Map a 4-bit level onto the xterm grayscale ramp, snapping the extremes to
/// true black and white.
fn gray(color: Color) -> TermColor {
    match color.level() {
        0 => TermColor::AnsiValue(16),
        15 => TermColor::AnsiValue(231),
        level => TermColor::AnsiValue(232 + (level as u16 * 24 / 16) as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_writes_one_line_per_pixel_pair() {
        let mut buffer = FrameBuffer::new(4, 4);
        buffer.set_pixel(0, 0, Color::WHITE);

        let mut preview = TermPreview::new(Vec::new());
        preview.present(&buffer).unwrap();
        let out = String::from_utf8(preview.into_inner()).unwrap();

        assert_eq!(out.matches('▀').count(), 8);
        assert_eq!(out.matches('\n').count(), 2);
        // The lit pixel maps to true white.
        assert!(out.contains("38;5;231"));
    }
}
