//! Software framebuffer surface.
//!
//! A width x height grid of 4-bit grayscale pixels backing the renderer when
//! no hardware is attached: previews, golden tests, image export. The
//! drawing algorithms are ported from the Adafruit GFX library
//! (<https://github.com/adafruit/Adafruit-GFX-Library>), so the software
//! output matches what the generated firmware code produces on a device.
//!
//! # Design
//!
//! - **Flat storage**: `Vec<Color>` with row-major indexing.
//! - **Clipping**: out-of-bounds pixels are dropped silently; shapes may
//!   extend past the edges.
//! - **Text state**: cursor, text color and font are surface state, set by
//!   the cursor/color/font calls and consumed by `print`.

use log::warn;

use super::{DisplaySurface, SurfaceError};
use crate::font::FontLibrary;
use crate::types::{Bounds, Color, Corners, Point, Sides, Size};

/// A 2D buffer of grayscale pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    fonts: FontLibrary,
    cursor: Point,
    text_color: Color,
    font: Option<String>,
}

impl FrameBuffer {
    /// Create a black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width * height) as usize],
            fonts: FontLibrary::new(),
            cursor: Point::ZERO,
            text_color: Color::WHITE,
            font: None,
        }
    }

    /// Create a black buffer with a preloaded font library.
    pub fn with_fonts(width: u32, height: u32, fonts: FontLibrary) -> Self {
        Self {
            fonts,
            ..Self::new(width, height)
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Point::ZERO, Size::new(self.width, self.height))
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Get a pixel (None if out of bounds).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            Some(self.pixels[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    /// Set a pixel; out-of-bounds writes are dropped.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    /// Fill the whole buffer with one level.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Reset to black.
    pub fn clear(&mut self) {
        self.fill(Color::BLACK);
    }

    /// Iterate over pixels with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        self.pixels.iter().enumerate().map(|(i, color)| {
            let x = (i % self.width as usize) as i32;
            let y = (i / self.width as usize) as i32;
            (x, y, *color)
        })
    }

    // =========================================================================
    // Rasterizers (ported from Adafruit GFX)
    // =========================================================================

    fn h_line(&mut self, x: i32, y: i32, width: i32, color: Color) {
        for i in 0..width {
            self.set_pixel(x + i, y, color);
        }
    }

    fn v_line(&mut self, x: i32, y: i32, height: i32, color: Color) {
        for i in 0..height {
            self.set_pixel(x, y + i, color);
        }
    }

    // Bresenham walk, normalized to a shallow left-to-right slope.
    fn line_impl(&mut self, mut x0: i32, mut y0: i32, mut x1: i32, mut y1: i32, color: Color) {
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let mut err = dx / 2;
        let y_step = if y0 < y1 { 1 } else { -1 };

        while x0 <= x1 {
            if steep {
                self.set_pixel(y0, x0, color);
            } else {
                self.set_pixel(x0, y0, color);
            }
            err -= dy;
            if err < 0 {
                y0 += y_step;
                err += dx;
            }
            x0 += 1;
        }
    }

    // Midpoint circle, all eight octants plus the four cardinal points.
    fn circle_impl(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        self.set_pixel(x0, y0 + r, color);
        self.set_pixel(x0, y0 - r, color);
        self.set_pixel(x0 + r, y0, color);
        self.set_pixel(x0 - r, y0, color);

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            self.set_pixel(x0 + x, y0 + y, color);
            self.set_pixel(x0 - x, y0 + y, color);
            self.set_pixel(x0 + x, y0 - y, color);
            self.set_pixel(x0 - x, y0 - y, color);
            self.set_pixel(x0 + y, y0 + x, color);
            self.set_pixel(x0 - y, y0 + x, color);
            self.set_pixel(x0 + y, y0 - x, color);
            self.set_pixel(x0 - y, y0 - x, color);
        }
    }

    // One arc per selected quadrant; rounded rects stroke their corners with
    // this.
    fn circle_helper(&mut self, x0: i32, y0: i32, r: i32, corners: Corners, color: Color) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            if corners.contains(Corners::BOTTOM_RIGHT) {
                self.set_pixel(x0 + x, y0 + y, color);
                self.set_pixel(x0 + y, y0 + x, color);
            }
            if corners.contains(Corners::TOP_RIGHT) {
                self.set_pixel(x0 + x, y0 - y, color);
                self.set_pixel(x0 + y, y0 - x, color);
            }
            if corners.contains(Corners::BOTTOM_LEFT) {
                self.set_pixel(x0 - y, y0 + x, color);
                self.set_pixel(x0 - x, y0 + y, color);
            }
            if corners.contains(Corners::TOP_LEFT) {
                self.set_pixel(x0 - y, y0 - x, color);
                self.set_pixel(x0 - x, y0 - y, color);
            }
        }
    }

    // Vertical-scanline fill of one or both circle halves; `delta` stretches
    // the scanlines for rounded-rect interiors.
    fn fill_circle_helper(
        &mut self,
        x0: i32,
        y0: i32,
        r: i32,
        sides: Sides,
        delta: i32,
        color: Color,
    ) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;
        let mut px = x;
        let mut py = y;

        let delta = delta + 1;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            if x < y + 1 {
                if sides.contains(Sides::RIGHT) {
                    self.v_line(x0 + x, y0 - y, 2 * y + delta, color);
                }
                if sides.contains(Sides::LEFT) {
                    self.v_line(x0 - x, y0 - y, 2 * y + delta, color);
                }
            }
            if y != py {
                if sides.contains(Sides::RIGHT) {
                    self.v_line(x0 + py, y0 - px, 2 * px + delta, color);
                }
                if sides.contains(Sides::LEFT) {
                    self.v_line(x0 - py, y0 - px, 2 * px + delta, color);
                }
                py = y;
            }
            px = x;
        }
    }

    // Scanline triangle fill, vertices sorted by y.
    fn fill_triangle(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        mut x1: i32,
        mut y1: i32,
        mut x2: i32,
        mut y2: i32,
        color: Color,
    ) {
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }
        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
            std::mem::swap(&mut x1, &mut x2);
        }
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }

        // Degenerate: all vertices on one scanline.
        if y0 == y2 {
            let mut a = x0;
            let mut b = x0;
            if x1 < a {
                a = x1;
            } else if x1 > b {
                b = x1;
            }
            if x2 < a {
                a = x2;
            } else if x2 > b {
                b = x2;
            }
            self.h_line(a, y0, b - a + 1, color);
            return;
        }

        let dx01 = x1 - x0;
        let dy01 = y1 - y0;
        let dx02 = x2 - x0;
        let dy02 = y2 - y0;
        let dx12 = x2 - x1;
        let dy12 = y2 - y1;
        let mut sa = 0;
        let mut sb = 0;

        // Include the y1 scanline in the upper half for flat-bottomed
        // triangles; otherwise it belongs to the lower half (which also
        // keeps both loops clear of zero divisors).
        let last = if y1 == y2 { y1 } else { y1 - 1 };

        let mut y = y0;
        while y <= last {
            let mut a = x0 + sa / dy01;
            let mut b = x0 + sb / dy02;
            sa += dx01;
            sb += dx02;
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            self.h_line(a, y, b - a + 1, color);
            y += 1;
        }

        sa = dx12 * (y - y1);
        sb = dx02 * (y - y0);
        while y <= y2 {
            let mut a = x1 + sa / dy12;
            let mut b = x0 + sb / dy02;
            sa += dx12;
            sb += dx02;
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            self.h_line(a, y, b - a + 1, color);
            y += 1;
        }
    }
}

/// Vertices of a regular polygon, clockwise from the top.
fn polygon_points(cx: i32, cy: i32, sides: u32, radius: u32, rotation: f32) -> Vec<(i32, i32)> {
    let step = std::f32::consts::TAU / sides as f32;
    (0..sides)
        .map(|i| {
            let angle = rotation + i as f32 * step;
            let x = cx as f32 + radius as f32 * angle.sin();
            let y = cy as f32 - radius as f32 * angle.cos();
            (x.floor() as i32, y.floor() as i32)
        })
        .collect()
}

impl DisplaySurface for FrameBuffer {
    fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.line_impl(x0, y0, x1, y1, color);
        Ok(())
    }

    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (w, h) = (width as i32, height as i32);
        self.h_line(x, y, w, color);
        self.h_line(x, y + h - 1, w, color);
        self.v_line(x, y, h, color);
        self.v_line(x + w - 1, y, h, color);
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        for row in 0..height as i32 {
            self.h_line(x, y + row, width as i32, color);
        }
        Ok(())
    }

    fn draw_round_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (w, h) = (width as i32, height as i32);
        let r = (radius as i32).min(w.min(h) / 2);

        self.h_line(x + r, y, w - 2 * r, color);
        self.h_line(x + r, y + h - 1, w - 2 * r, color);
        self.v_line(x, y + r, h - 2 * r, color);
        self.v_line(x + w - 1, y + r, h - 2 * r, color);

        self.circle_helper(x + r, y + r, r, Corners::TOP_LEFT, color);
        self.circle_helper(x + w - r - 1, y + r, r, Corners::TOP_RIGHT, color);
        self.circle_helper(x + w - r - 1, y + h - r - 1, r, Corners::BOTTOM_RIGHT, color);
        self.circle_helper(x + r, y + h - r - 1, r, Corners::BOTTOM_LEFT, color);
        Ok(())
    }

    fn fill_round_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (w, h) = (width as i32, height as i32);
        let r = (radius as i32).min(w.min(h) / 2);

        self.fill_rect(x + r, y, (w - 2 * r) as u32, height, color)?;
        self.fill_circle_helper(x + w - r - 1, y + r, r, Sides::RIGHT, h - 2 * r - 1, color);
        self.fill_circle_helper(x + r, y + r, r, Sides::LEFT, h - 2 * r - 1, color);
        Ok(())
    }

    fn draw_circle(
        &mut self,
        x: i32,
        y: i32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.circle_impl(x, y, radius as i32, color);
        Ok(())
    }

    fn fill_circle(
        &mut self,
        x: i32,
        y: i32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let r = radius as i32;
        self.v_line(x, y - r, 2 * r + 1, color);
        self.fill_circle_helper(x, y, r, Sides::BOTH, 0, color);
        Ok(())
    }

    fn draw_polygon(
        &mut self,
        x: i32,
        y: i32,
        sides: u32,
        radius: u32,
        rotation: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let points = polygon_points(x, y, sides, radius, rotation);
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            self.line_impl(x0, y0, x1, y1, color);
        }
        Ok(())
    }

    fn fill_polygon(
        &mut self,
        x: i32,
        y: i32,
        sides: u32,
        radius: u32,
        rotation: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let points = polygon_points(x, y, sides, radius, rotation);
        for i in 0..points.len() {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % points.len()];
            self.fill_triangle(x, y, x1, y1, x2, y2, color);
        }
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        data: &[u8],
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let bytes_per_row = width.div_ceil(8) as usize;
        for row in 0..height {
            for col in 0..width {
                let index = row as usize * bytes_per_row + (col / 8) as usize;
                let Some(byte) = data.get(index) else {
                    continue;
                };
                if byte & (1 << (7 - col % 8)) != 0 {
                    self.set_pixel(x + col as i32, y + row as i32, color);
                }
            }
        }
        Ok(())
    }

    fn set_cursor(&mut self, x: i32, y: i32) -> Result<(), SurfaceError> {
        self.cursor = Point::new(x, y);
        Ok(())
    }

    fn set_text_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.text_color = color;
        Ok(())
    }

    fn set_font(&mut self, font: &str) -> Result<(), SurfaceError> {
        self.font = Some(font.to_string());
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), SurfaceError> {
        let Some(name) = self.font.as_deref() else {
            warn!("print without a font selected, skipping {text:?}");
            return Ok(());
        };
        let Some(font) = self.fonts.get(name) else {
            warn!("font `{name}` is not loaded, skipping {text:?}");
            return Ok(());
        };

        let width = self.width;
        let height = self.height;
        let color = self.text_color;
        let start_x = self.cursor.x;
        let mut x = self.cursor.x;
        let mut y = self.cursor.y;

        for c in text.chars() {
            if c == '\n' {
                x = start_x;
                y += font.y_advance;
                continue;
            }
            let Some(glyph) = font.glyph(c) else {
                continue;
            };
            for gy in 0..glyph.height {
                for gx in 0..glyph.width {
                    if !font.glyph_pixel(glyph, gx, gy) {
                        continue;
                    }
                    let px = x + glyph.dx + gx as i32;
                    let py = y + font.baseline + glyph.dy + gy as i32;
                    if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                        self.pixels[(py as u32 * width + px as u32) as usize] = color;
                    }
                }
            }
            x += glyph.x_advance;
        }

        self.cursor = Point::new(x, y);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
