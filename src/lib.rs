//! # gfx-scene
//!
//! Scene model, software renderer and code generator for Adafruit GFX style
//! displays.
//!
//! A scene is an immutable tree: frames contain primitives (lines, rects,
//! circles, polygons, bitmaps, text runs) and instances of reusable
//! components placed at (x, y) offsets. The tree is built once from a
//! declarative description and rendered read-only.
//!
//! ## Architecture
//!
//! ```text
//! SceneDesc → build() → Scene → render_frame() → DisplaySurface
//!                          └──→ codegen::generate() → C header
//! ```
//!
//! The renderer walks the tree depth-first in declaration order and issues
//! primitive calls against an injected [`DisplaySurface`] - a capturing
//! test double, a software framebuffer with the GFX rasterizers, or a real
//! device behind the same trait. The code generator walks the same tree and
//! emits the `drawComponentX` / `drawFrameX` functions the firmware
//! compiles.
//!
//! ## Modules
//!
//! - [`types`] - Geometry and the 4-bit grayscale color space
//! - [`scene`] - The node tree, descriptions, and the validating builder
//! - [`render`] - Depth-first traversal issuing drawing calls
//! - [`surface`] - The display surface trait and its implementations
//! - [`font`] - GFX font parsing and glyph lookup
//! - [`codegen`] - Adafruit GFX C header emission

pub mod codegen;
pub mod font;
pub mod render;
pub mod scene;
pub mod surface;
pub mod types;

// Re-export commonly used items
pub use types::{Bounds, Color, Corners, Point, Sides, Size};

pub use font::{Font, FontError, FontLibrary, Glyph};

pub use scene::{
    Bitmap, Circle, Component, ComponentDesc, ComponentId, Frame, FrameDesc, Group, GroupDesc,
    Instance, InstanceDesc, Item, ItemDesc, Line, Polygon, Rect, Scene, SceneDesc, SceneError,
    Text,
};

pub use render::{RenderError, render_frame, render_scene};

pub use surface::{DisplaySurface, DrawCall, FrameBuffer, Recording, SurfaceError, TermPreview};

pub use codegen::{generate, sanitize_identifier};
