//! Declarative scene descriptions and the builder that turns them into a
//! validated [`Scene`].
//!
//! Descriptions reference components by name, the form the editor exports.
//! Building resolves names to [`ComponentId`]s and rejects descriptions a
//! finite, acyclic tree cannot be made from: undefined or duplicate component
//! names, components that include themselves, negative dimensions, and
//! bitmaps whose data does not match their size.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use super::{
    Bitmap, Circle, Component, ComponentId, Frame, Group, Instance, Item, Line, Polygon, Rect,
    Scene, Text,
};
use crate::types::{Point, Size};

/// Errors from building a scene out of a description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("instance `{instance}` references undefined component `{component}`")]
    UndefinedComponent { instance: String, component: String },
    #[error("duplicate component name `{0}`")]
    DuplicateComponent(String),
    #[error("component `{0}` includes itself, directly or transitively")]
    RecursiveComponent(String),
    #[error("invalid geometry in `{item}`: {reason}")]
    InvalidGeometry { item: String, reason: String },
}

// =============================================================================
// Description types
// =============================================================================

/// The declarative form of a scene, as handed over by the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDesc {
    pub components: Vec<ComponentDesc>,
    pub frames: Vec<FrameDesc>,
}

/// A component definition. Dimensions are nominal and may be invalid here;
/// the builder checks them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentDesc {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub children: Vec<ItemDesc>,
}

impl ComponentDesc {
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            children: Vec::new(),
        }
    }
}

/// A frame definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDesc {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub children: Vec<ItemDesc>,
}

impl FrameDesc {
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            children: Vec::new(),
        }
    }
}

/// An instance placement referencing its component by name.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceDesc {
    pub name: String,
    pub hidden: bool,
    pub component: String,
    pub position: Point,
}

impl InstanceDesc {
    pub fn new(component: impl Into<String>, position: Point) -> Self {
        let component = component.into();
        Self {
            name: component.clone(),
            hidden: false,
            component,
            position,
        }
    }
}

/// A group of items in description form.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDesc {
    pub name: String,
    pub hidden: bool,
    pub children: Vec<ItemDesc>,
}

impl Default for GroupDesc {
    fn default() -> Self {
        Self {
            name: "Group".into(),
            hidden: false,
            children: Vec::new(),
        }
    }
}

/// One item of a description. Primitive payloads are the same value types the
/// built tree uses; only instances and groups differ.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDesc {
    Line(Line),
    Rect(Rect),
    Circle(Circle),
    Polygon(Polygon),
    Bitmap(Bitmap),
    Text(Text),
    Group(GroupDesc),
    Instance(InstanceDesc),
}

impl From<Line> for ItemDesc {
    fn from(v: Line) -> Self {
        Self::Line(v)
    }
}
impl From<Rect> for ItemDesc {
    fn from(v: Rect) -> Self {
        Self::Rect(v)
    }
}
impl From<Circle> for ItemDesc {
    fn from(v: Circle) -> Self {
        Self::Circle(v)
    }
}
impl From<Polygon> for ItemDesc {
    fn from(v: Polygon) -> Self {
        Self::Polygon(v)
    }
}
impl From<Bitmap> for ItemDesc {
    fn from(v: Bitmap) -> Self {
        Self::Bitmap(v)
    }
}
impl From<Text> for ItemDesc {
    fn from(v: Text) -> Self {
        Self::Text(v)
    }
}
impl From<GroupDesc> for ItemDesc {
    fn from(v: GroupDesc) -> Self {
        Self::Group(v)
    }
}
impl From<InstanceDesc> for ItemDesc {
    fn from(v: InstanceDesc) -> Self {
        Self::Instance(v)
    }
}

// =============================================================================
// Building
// =============================================================================

impl SceneDesc {
    /// Resolve and validate this description into an immutable [`Scene`].
    pub fn build(self) -> Result<Scene, SceneError> {
        let mut ids: HashMap<String, ComponentId> = HashMap::new();
        for (index, component) in self.components.iter().enumerate() {
            if ids
                .insert(component.name.clone(), ComponentId(index))
                .is_some()
            {
                return Err(SceneError::DuplicateComponent(component.name.clone()));
            }
        }

        let components = self
            .components
            .into_iter()
            .map(|desc| {
                Ok(Component {
                    size: checked_size(&desc.name, desc.width, desc.height)?,
                    children: build_items(desc.children, &ids)?,
                    name: desc.name,
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        let frames = self
            .frames
            .into_iter()
            .map(|desc| {
                Ok(Frame {
                    size: checked_size(&desc.name, desc.width, desc.height)?,
                    children: build_items(desc.children, &ids)?,
                    name: desc.name,
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        check_inclusion_cycles(&components)?;

        debug!(
            "built scene: {} components, {} frames",
            components.len(),
            frames.len()
        );
        Ok(Scene::new(components, frames))
    }
}

fn checked_size(owner: &str, width: i32, height: i32) -> Result<Size, SceneError> {
    if width < 0 || height < 0 {
        return Err(SceneError::InvalidGeometry {
            item: owner.to_string(),
            reason: format!("negative dimensions {width}x{height}"),
        });
    }
    Ok(Size::new(width as u32, height as u32))
}

fn build_items(
    items: Vec<ItemDesc>,
    ids: &HashMap<String, ComponentId>,
) -> Result<Vec<Item>, SceneError> {
    items
        .into_iter()
        .map(|item| build_item(item, ids))
        .collect()
}

fn build_item(item: ItemDesc, ids: &HashMap<String, ComponentId>) -> Result<Item, SceneError> {
    match item {
        ItemDesc::Line(line) => Ok(Item::Line(line)),
        ItemDesc::Rect(rect) => Ok(Item::Rect(rect)),
        ItemDesc::Circle(circle) => Ok(Item::Circle(circle)),
        ItemDesc::Polygon(polygon) => {
            if polygon.sides < 3 {
                return Err(SceneError::InvalidGeometry {
                    item: polygon.name,
                    reason: format!("a polygon needs at least 3 sides, got {}", polygon.sides),
                });
            }
            Ok(Item::Polygon(polygon))
        }
        ItemDesc::Bitmap(bitmap) => {
            let bytes_per_row = bitmap.size.width.div_ceil(8) as usize;
            let expected = bytes_per_row * bitmap.size.height as usize;
            if bitmap.data.len() != expected {
                return Err(SceneError::InvalidGeometry {
                    item: bitmap.name,
                    reason: format!(
                        "bitmap data is {} bytes, expected {} for {}",
                        bitmap.data.len(),
                        expected,
                        bitmap.size
                    ),
                });
            }
            Ok(Item::Bitmap(bitmap))
        }
        ItemDesc::Text(text) => Ok(Item::Text(text)),
        ItemDesc::Group(group) => Ok(Item::Group(Group {
            name: group.name,
            hidden: group.hidden,
            children: build_items(group.children, ids)?,
        })),
        ItemDesc::Instance(instance) => {
            let component = ids.get(&instance.component).copied().ok_or_else(|| {
                SceneError::UndefinedComponent {
                    instance: instance.name.clone(),
                    component: instance.component.clone(),
                }
            })?;
            Ok(Item::Instance(Instance {
                name: instance.name,
                hidden: instance.hidden,
                component,
                position: instance.position,
            }))
        }
    }
}

// =============================================================================
// Cycle detection
// =============================================================================

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Reject component definitions that include themselves, directly or
/// transitively. The tree must stay finite; rendering such a scene would
/// recurse forever.
fn check_inclusion_cycles(components: &[Component]) -> Result<(), SceneError> {
    let mut states = vec![Visit::Unvisited; components.len()];
    for index in 0..components.len() {
        visit(index, components, &mut states)?;
    }
    Ok(())
}

fn visit(
    index: usize,
    components: &[Component],
    states: &mut Vec<Visit>,
) -> Result<(), SceneError> {
    match states[index] {
        Visit::Done => return Ok(()),
        Visit::InProgress => {
            return Err(SceneError::RecursiveComponent(
                components[index].name.clone(),
            ));
        }
        Visit::Unvisited => {}
    }

    states[index] = Visit::InProgress;
    let mut references = Vec::new();
    super::instance_refs(&components[index].children, &mut references);
    for reference in references {
        visit(reference.0, components, states)?;
    }
    states[index] = Visit::Done;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn line_component(name: &str) -> ComponentDesc {
        let mut component = ComponentDesc::new(name, 10, 10);
        component.children.push(
            Line {
                from: Point::ZERO,
                to: Point::new(10, 10),
                color: Color::WHITE,
                ..Default::default()
            }
            .into(),
        );
        component
    }

    #[test]
    fn test_build_resolves_instances() {
        let mut frame = FrameDesc::new("Frame4", 128, 64);
        frame
            .children
            .push(InstanceDesc::new("Component", Point::new(29, 22)).into());

        let scene = SceneDesc {
            components: vec![line_component("Component")],
            frames: vec![frame],
        }
        .build()
        .unwrap();

        let frame = scene.frame("Frame4").unwrap();
        let Item::Instance(instance) = &frame.children[0] else {
            panic!("expected an instance");
        };
        assert_eq!(instance.position, Point::new(29, 22));
        let component = scene.component(instance.component).unwrap();
        assert_eq!(component.name, "Component");
    }

    #[test]
    fn test_undefined_component_rejected() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame
            .children
            .push(InstanceDesc::new("Missing", Point::ZERO).into());

        let err = SceneDesc {
            components: vec![],
            frames: vec![frame],
        }
        .build()
        .unwrap_err();
        assert_eq!(
            err,
            SceneError::UndefinedComponent {
                instance: "Missing".into(),
                component: "Missing".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let err = SceneDesc {
            components: vec![line_component("Twice"), line_component("Twice")],
            frames: vec![],
        }
        .build()
        .unwrap_err();
        assert_eq!(err, SceneError::DuplicateComponent("Twice".into()));
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let err = SceneDesc {
            components: vec![],
            frames: vec![FrameDesc::new("Frame", -1, 64)],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_polygon_needs_three_sides() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame.children.push(
            Polygon {
                sides: 2,
                radius: 5,
                ..Default::default()
            }
            .into(),
        );

        let err = SceneDesc {
            components: vec![],
            frames: vec![frame],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_bitmap_data_must_match_size() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame.children.push(
            Bitmap {
                size: Size::new(10, 2),
                // 10 px wide rows need 2 bytes each.
                data: vec![0xff; 3],
                ..Default::default()
            }
            .into(),
        );

        let err = SceneDesc {
            components: vec![],
            frames: vec![frame],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_self_inclusion_rejected() {
        let mut component = ComponentDesc::new("Loop", 10, 10);
        component
            .children
            .push(InstanceDesc::new("Loop", Point::ZERO).into());

        let err = SceneDesc {
            components: vec![component],
            frames: vec![],
        }
        .build()
        .unwrap_err();
        assert_eq!(err, SceneError::RecursiveComponent("Loop".into()));
    }

    #[test]
    fn test_transitive_inclusion_cycle_rejected() {
        let mut a = ComponentDesc::new("A", 10, 10);
        a.children.push(InstanceDesc::new("B", Point::ZERO).into());
        let mut b = ComponentDesc::new("B", 10, 10);
        b.children.push(InstanceDesc::new("C", Point::ZERO).into());
        let mut c = ComponentDesc::new("C", 10, 10);
        c.children.push(InstanceDesc::new("A", Point::ZERO).into());

        let err = SceneDesc {
            components: vec![a, b, c],
            frames: vec![],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, SceneError::RecursiveComponent(_)));
    }

    #[test]
    fn test_instance_inside_group_is_resolved() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame.children.push(
            GroupDesc {
                children: vec![InstanceDesc::new("Component", Point::new(1, 2)).into()],
                ..Default::default()
            }
            .into(),
        );

        let scene = SceneDesc {
            components: vec![line_component("Component")],
            frames: vec![frame],
        }
        .build()
        .unwrap();

        let Item::Group(group) = &scene.frames()[0].children[0] else {
            panic!("expected a group");
        };
        assert!(matches!(group.children[0], Item::Instance(_)));
    }

    #[test]
    fn test_diamond_inclusion_is_not_a_cycle() {
        // A includes B and C, both include D. Shared, but acyclic.
        let mut a = ComponentDesc::new("A", 10, 10);
        a.children.push(InstanceDesc::new("B", Point::ZERO).into());
        a.children.push(InstanceDesc::new("C", Point::ZERO).into());
        let mut b = ComponentDesc::new("B", 10, 10);
        b.children.push(InstanceDesc::new("D", Point::ZERO).into());
        let mut c = ComponentDesc::new("C", 10, 10);
        c.children.push(InstanceDesc::new("D", Point::ZERO).into());
        let d = line_component("D");

        assert!(
            SceneDesc {
                components: vec![a, b, c, d],
                frames: vec![],
            }
            .build()
            .is_ok()
        );
    }
}
