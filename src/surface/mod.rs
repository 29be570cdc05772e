//! Display surfaces - the output boundary of the renderer.
//!
//! The renderer knows nothing about pixels, terminals or hardware. It issues
//! primitive drawing calls against the [`DisplaySurface`] trait and the
//! surface decides what they mean: capture them for a test, rasterize them
//! into a software framebuffer, or forward them to a device.
//!
//! Calls are synchronous and take effect in exactly the order they are
//! issued. A surface is owned by one render call at a time; callers that
//! share a surface across renders are responsible for serializing them.

pub mod framebuffer;
pub mod recording;
pub mod term;

pub use framebuffer::FrameBuffer;
pub use recording::{DrawCall, Recording};
pub use term::TermPreview;

use thiserror::Error;

use crate::types::Color;

/// A failed surface write.
///
/// Propagated to the render caller, aborting the remaining traversal.
/// Drawing is not retried: without a prior clear a blind retry could
/// double-paint.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("display write failed: {0}")]
    Device(String),
}

/// The drawing contract consumed by the renderer.
///
/// The methods mirror the Adafruit GFX primitive set the generated firmware
/// code calls: shape primitives with a trailing 4-bit grayscale color, plus
/// the cursor/color/font/print quadruple for text runs. Coordinates are
/// absolute; the renderer has already applied all placement offsets.
pub trait DisplaySurface {
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color)
    -> Result<(), SurfaceError>;

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color)
    -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color)
    -> Result<(), SurfaceError>;

    fn draw_round_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    fn fill_round_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    fn draw_circle(&mut self, x: i32, y: i32, radius: u32, color: Color)
    -> Result<(), SurfaceError>;

    fn fill_circle(&mut self, x: i32, y: i32, radius: u32, color: Color)
    -> Result<(), SurfaceError>;

    /// Stroke a regular polygon. `rotation` is in radians.
    fn draw_polygon(
        &mut self,
        x: i32,
        y: i32,
        sides: u32,
        radius: u32,
        rotation: f32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    fn fill_polygon(
        &mut self,
        x: i32,
        y: i32,
        sides: u32,
        radius: u32,
        rotation: f32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    /// Blit a 1-bit-per-pixel bitmap; rows are byte aligned, MSB first, set
    /// bits paint in `color`.
    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        data: &[u8],
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    fn set_cursor(&mut self, x: i32, y: i32) -> Result<(), SurfaceError>;

    fn set_text_color(&mut self, color: Color) -> Result<(), SurfaceError>;

    /// Select the named GFX font for subsequent prints.
    fn set_font(&mut self, font: &str) -> Result<(), SurfaceError>;

    /// Draw text at the current cursor with the current color and font.
    fn print(&mut self, text: &str) -> Result<(), SurfaceError>;
}
