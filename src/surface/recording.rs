//! A call-capturing surface for tests.
//!
//! Records every drawing call as a [`DrawCall`] value in issue order, so
//! tests can assert absolute coordinates, paint order, and full call
//! sequences. Can optionally be armed to fail at a given call index to
//! exercise error propagation.

use super::{DisplaySurface, SurfaceError};
use crate::types::Color;

/// One captured drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    },
    Rect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    },
    FillRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    },
    RoundRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: Color,
    },
    FillRoundRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: Color,
    },
    Circle {
        x: i32,
        y: i32,
        radius: u32,
        color: Color,
    },
    FillCircle {
        x: i32,
        y: i32,
        radius: u32,
        color: Color,
    },
    Polygon {
        x: i32,
        y: i32,
        sides: u32,
        radius: u32,
        rotation: f32,
        color: Color,
    },
    FillPolygon {
        x: i32,
        y: i32,
        sides: u32,
        radius: u32,
        rotation: f32,
        color: Color,
    },
    Bitmap {
        x: i32,
        y: i32,
        data: Vec<u8>,
        width: u32,
        height: u32,
        color: Color,
    },
    SetCursor {
        x: i32,
        y: i32,
    },
    SetTextColor {
        color: Color,
    },
    SetFont {
        font: String,
    },
    Print {
        text: String,
    },
}

/// A surface that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    calls: Vec<DrawCall>,
    fail_at: Option<usize>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording surface whose `index`-th call (0-based) fails with a
    /// device error instead of being recorded.
    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(index),
        }
    }

    /// The captured calls, in issue order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: DrawCall) -> Result<(), SurfaceError> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(SurfaceError::Device("injected failure".into()));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl DisplaySurface for Recording {
    fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCall::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        })
    }

    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCall::Rect {
            x,
            y,
            width,
            height,
            color,
        })
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCall::FillRect {
            x,
            y,
            width,
            height,
            color,
        })
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
        self.record(DrawCall::RoundRect {
            x,
            y,
            width,
            height,
            radius,
            color,
        })
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
        self.record(DrawCall::FillRoundRect {
            x,
            y,
            width,
            height,
            radius,
            color,
        })
    }

    fn draw_circle(
        &mut self,
        x: i32,
        y: i32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCall::Circle {
            x,
            y,
            radius,
            color,
        })
    }

    fn fill_circle(
        &mut self,
        x: i32,
        y: i32,
        radius: u32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCall::FillCircle {
            x,
            y,
            radius,
            color,
        })
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
        self.record(DrawCall::Polygon {
            x,
            y,
            sides,
            radius,
            rotation,
            color,
        })
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
        self.record(DrawCall::FillPolygon {
            x,
            y,
            sides,
            radius,
            rotation,
            color,
        })
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
        self.record(DrawCall::Bitmap {
            x,
            y,
            data: data.to_vec(),
            width,
            height,
            color,
        })
    }

    fn set_cursor(&mut self, x: i32, y: i32) -> Result<(), SurfaceError> {
        self.record(DrawCall::SetCursor { x, y })
    }

    fn set_text_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.record(DrawCall::SetTextColor { color })
    }

    fn set_font(&mut self, font: &str) -> Result<(), SurfaceError> {
        self.record(DrawCall::SetFont {
            font: font.to_string(),
        })
    }

    fn print(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.record(DrawCall::Print {
            text: text.to_string(),
        })
    }
}
