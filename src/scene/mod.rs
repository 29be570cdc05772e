//! The scene tree: frames, components, and drawing primitives.
//!
//! A scene is built once from a declarative description (see [`SceneDesc`])
//! and rendered read-only thereafter. Paint order is document order: children
//! are stored in the order they were declared, and later siblings paint over
//! earlier ones.
//!
//! Component definitions live in an arena on the [`Scene`] and are referenced
//! by [`ComponentId`], so one definition can be instanced at many placements
//! without duplication. The placement offset belongs to the [`Instance`]
//! edge, not to the component itself.

mod builder;

pub use builder::{
    ComponentDesc, FrameDesc, GroupDesc, InstanceDesc, ItemDesc, SceneDesc, SceneError,
};

use crate::types::{Bounds, Color, Point, Size};

// =============================================================================
// Primitives
// =============================================================================

/// A straight line between two points, endpoints inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub name: String,
    pub hidden: bool,
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            name: "Line".into(),
            hidden: false,
            from: Point::ZERO,
            to: Point::ZERO,
            color: Color::WHITE,
        }
    }
}

/// An axis-aligned rectangle, optionally rounded and/or filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub name: String,
    pub hidden: bool,
    pub position: Point,
    pub size: Size,
    /// Corner radius; 0 draws a plain rectangle.
    pub radius: u32,
    pub color: Color,
    pub filled: bool,
}

impl Default for Rect {
    fn default() -> Self {
        Self {
            name: "Rect".into(),
            hidden: false,
            position: Point::ZERO,
            size: Size::default(),
            radius: 0,
            color: Color::WHITE,
            filled: false,
        }
    }
}

/// A circle around a center point.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub name: String,
    pub hidden: bool,
    pub center: Point,
    pub radius: u32,
    pub color: Color,
    pub filled: bool,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            name: "Circle".into(),
            hidden: false,
            center: Point::ZERO,
            radius: 0,
            color: Color::WHITE,
            filled: false,
        }
    }
}

/// A regular polygon described by center, circumradius, side count and
/// rotation (radians).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub name: String,
    pub hidden: bool,
    pub center: Point,
    pub radius: u32,
    pub sides: u32,
    pub rotation: f32,
    pub color: Color,
    pub filled: bool,
}

impl Default for Polygon {
    fn default() -> Self {
        Self {
            name: "Polygon".into(),
            hidden: false,
            center: Point::ZERO,
            radius: 0,
            sides: 3,
            rotation: 0.0,
            color: Color::WHITE,
            filled: false,
        }
    }
}

/// A 1-bit-per-pixel image. Rows are byte aligned, MSB first, matching the
/// GFX `drawBitmap` layout; set bits paint in `color`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub name: String,
    pub hidden: bool,
    pub position: Point,
    pub size: Size,
    pub data: Vec<u8>,
    pub color: Color,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self {
            name: "Bitmap".into(),
            hidden: false,
            position: Point::ZERO,
            size: Size::default(),
            data: Vec::new(),
            color: Color::WHITE,
        }
    }
}

/// A text run drawn with a named GFX font.
///
/// Rendering configures the surface in a fixed order: cursor, text color,
/// font, then the print itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub name: String,
    pub hidden: bool,
    pub position: Point,
    pub content: String,
    pub font: String,
    pub color: Color,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            name: "Text".into(),
            hidden: false,
            position: Point::ZERO,
            content: String::new(),
            font: String::new(),
            color: Color::WHITE,
        }
    }
}

// =============================================================================
// Composite nodes
// =============================================================================

/// Identifier of a component definition within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) usize);

/// A placement of a component at an (x, y) offset within the parent's
/// coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub name: String,
    pub hidden: bool,
    pub component: ComponentId,
    pub position: Point,
}

/// An editor grouping of items. Children keep their own coordinates; a group
/// adds no offset of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub hidden: bool,
    pub children: Vec<Item>,
}

/// One visual element of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Line(Line),
    Rect(Rect),
    Circle(Circle),
    Polygon(Polygon),
    Bitmap(Bitmap),
    Text(Text),
    Group(Group),
    Instance(Instance),
}

impl Item {
    /// The editor-facing name of this item.
    pub fn name(&self) -> &str {
        match self {
            Item::Line(v) => &v.name,
            Item::Rect(v) => &v.name,
            Item::Circle(v) => &v.name,
            Item::Polygon(v) => &v.name,
            Item::Bitmap(v) => &v.name,
            Item::Text(v) => &v.name,
            Item::Group(v) => &v.name,
            Item::Instance(v) => &v.name,
        }
    }

    /// Hidden items are skipped by the renderer and the code generator.
    pub fn is_hidden(&self) -> bool {
        match self {
            Item::Line(v) => v.hidden,
            Item::Rect(v) => v.hidden,
            Item::Circle(v) => v.hidden,
            Item::Polygon(v) => v.hidden,
            Item::Bitmap(v) => v.hidden,
            Item::Text(v) => v.hidden,
            Item::Group(v) => v.hidden,
            Item::Instance(v) => v.hidden,
        }
    }
}

/// A reusable subtree of primitives and nested instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub size: Size,
    pub children: Vec<Item>,
}

impl Component {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Point::ZERO, self.size)
    }
}

/// One full display layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub size: Size,
    pub children: Vec<Item>,
}

impl Frame {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Point::ZERO, self.size)
    }
}

// =============================================================================
// Scene
// =============================================================================

/// A validated, immutable scene: component definitions plus the frames that
/// instantiate them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    components: Vec<Component>,
    frames: Vec<Frame>,
}

impl Scene {
    pub(crate) fn new(components: Vec<Component>, frames: Vec<Frame>) -> Self {
        Self { components, frames }
    }

    /// Component definitions in declaration order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Frames in declaration order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Resolve a component id.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    /// Look up a component definition by name.
    pub fn component_by_name(&self, name: &str) -> Option<(ComponentId, &Component)> {
        self.components
            .iter()
            .position(|c| c.name == name)
            .map(|i| (ComponentId(i), &self.components[i]))
    }

    /// Look up a frame by name.
    pub fn frame(&self, name: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.name == name)
    }
}

/// Collect the component references reachable through these items, looking
/// through groups.
pub(crate) fn instance_refs(items: &[Item], out: &mut Vec<ComponentId>) {
    for item in items {
        match item {
            Item::Instance(instance) => out.push(instance.component),
            Item::Group(group) => instance_refs(&group.children, out),
            _ => {}
        }
    }
}
