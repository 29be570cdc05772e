//! Scene traversal - turning a tree into drawing calls.
//!
//! The renderer walks a frame's children depth-first, in declaration order,
//! and issues one batch of primitive calls per item against the injected
//! [`DisplaySurface`]. Paint order is document order: later siblings paint
//! over earlier ones, with no z-index and no culling.
//!
//! Each instance translates its subtree by its placement offset; offsets
//! accumulate down the tree, so a primitive's absolute position is the sum
//! of all ancestor placements plus its local coordinates. The traversal
//! holds no state of its own - rendering the same frame onto two fresh
//! surfaces produces identical call sequences.
//!
//! A failing surface call aborts the remaining traversal and is handed back
//! to the caller; whatever was already drawn stays drawn.

use log::trace;
use thiserror::Error;

use crate::scene::{ComponentId, Frame, Item, Scene};
use crate::surface::{DisplaySurface, SurfaceError};
use crate::types::Point;

/// Errors from rendering a scene.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// A frame references a component the scene does not hold. Unreachable
    /// for built scenes; hand-assembled frames can get this wrong.
    #[error("unknown component id {0:?}")]
    UnknownComponent(ComponentId),
}

/// Render every frame of the scene in declaration order.
pub fn render_scene(scene: &Scene, surface: &mut dyn DisplaySurface) -> Result<(), RenderError> {
    for frame in scene.frames() {
        render_frame(scene, frame, surface)?;
    }
    Ok(())
}

/// Render one frame.
pub fn render_frame(
    scene: &Scene,
    frame: &Frame,
    surface: &mut dyn DisplaySurface,
) -> Result<(), RenderError> {
    trace!("rendering frame `{}` ({})", frame.name, frame.size);
    render_items(scene, &frame.children, Point::ZERO, surface)
}

fn render_items(
    scene: &Scene,
    items: &[Item],
    offset: Point,
    surface: &mut dyn DisplaySurface,
) -> Result<(), RenderError> {
    for item in items {
        if item.is_hidden() {
            continue;
        }
        render_item(scene, item, offset, surface)?;
    }
    Ok(())
}

fn render_item(
    scene: &Scene,
    item: &Item,
    offset: Point,
    surface: &mut dyn DisplaySurface,
) -> Result<(), RenderError> {
    match item {
        Item::Line(line) => {
            let from = line.from + offset;
            let to = line.to + offset;
            surface.draw_line(from.x, from.y, to.x, to.y, line.color)?;
        }
        Item::Rect(rect) => {
            let p = rect.position + offset;
            let Point { x, y } = p;
            let (w, h) = (rect.size.width, rect.size.height);
            match (rect.filled, rect.radius) {
                (false, 0) => surface.draw_rect(x, y, w, h, rect.color)?,
                (true, 0) => surface.fill_rect(x, y, w, h, rect.color)?,
                (false, r) => surface.draw_round_rect(x, y, w, h, r, rect.color)?,
                (true, r) => surface.fill_round_rect(x, y, w, h, r, rect.color)?,
            }
        }
        Item::Circle(circle) => {
            let c = circle.center + offset;
            if circle.filled {
                surface.fill_circle(c.x, c.y, circle.radius, circle.color)?;
            } else {
                surface.draw_circle(c.x, c.y, circle.radius, circle.color)?;
            }
        }
        Item::Polygon(polygon) => {
            let c = polygon.center + offset;
            if polygon.filled {
                surface.fill_polygon(
                    c.x,
                    c.y,
                    polygon.sides,
                    polygon.radius,
                    polygon.rotation,
                    polygon.color,
                )?;
            } else {
                surface.draw_polygon(
                    c.x,
                    c.y,
                    polygon.sides,
                    polygon.radius,
                    polygon.rotation,
                    polygon.color,
                )?;
            }
        }
        Item::Bitmap(bitmap) => {
            let p = bitmap.position + offset;
            surface.draw_bitmap(
                p.x,
                p.y,
                &bitmap.data,
                bitmap.size.width,
                bitmap.size.height,
                bitmap.color,
            )?;
        }
        Item::Text(text) => {
            // Fixed configuration order: cursor, color, font, print.
            let p = text.position + offset;
            surface.set_cursor(p.x, p.y)?;
            surface.set_text_color(text.color)?;
            surface.set_font(&text.font)?;
            surface.print(&text.content)?;
        }
        Item::Group(group) => {
            // Groups are an editor construct; children keep their own
            // coordinates.
            render_items(scene, &group.children, offset, surface)?;
        }
        Item::Instance(instance) => {
            let component = scene
                .component(instance.component)
                .ok_or(RenderError::UnknownComponent(instance.component))?;
            render_items(scene, &component.children, offset + instance.position, surface)?;
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
