//! Adafruit GFX code generation.
//!
//! Walks a scene and emits the C header the firmware compiles: one
//! `drawComponent` function per component, one `drawFrame` function per
//! frame, and a `PROGMEM` byte array per bitmap. Component functions take
//! explicit `(int16_t x, int16_t y)` placement parameters and frames call
//! them with each instance's offset, so a component drawn at three
//! placements is emitted once and called three times.
//!
//! Components are emitted in dependency order so every `drawComponent`
//! function is declared before its first call site. Hidden items are left
//! out entirely.

use std::collections::HashMap;

use log::debug;

use crate::scene::{ComponentId, Item, Scene, instance_refs};

/// How much commentary the generated code carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comments {
    /// Bare drawing calls.
    None,
    /// A trailing name comment per item.
    Names,
    /// Name comments plus block markers for text runs and groups.
    #[default]
    All,
}

/// Code generation settings.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub comments: Comments,
    /// Also give frame functions `(int16_t x, int16_t y)` offset parameters,
    /// for drawing a frame at an offset on a larger display.
    pub include_offset: bool,
}

/// Generate the full display code for a scene.
pub fn generate(scene: &Scene, options: &Options) -> String {
    let mut namer = Namer::default();

    // Function identifiers are fixed up front, in declaration order, so
    // instance call sites always match their component's final name.
    let component_names: Vec<(String, String)> = scene
        .components()
        .iter()
        .map(|component| {
            let display = namer.unique(&component.name);
            let ident = sanitize_identifier(&display);
            (display, ident)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "/**\n * Created with gfx-scene@{} (github.com/arnoson/gfx-ui): a scene renderer and code generator for Adafruit GFX graphics.\n */\n\n",
        env!("CARGO_PKG_VERSION"),
    ));

    for id in dependency_order(scene) {
        let component = &scene.components()[id.0];
        let (display, ident) = &component_names[id.0];
        out.push_str(&format!(
            "void drawComponent{ident}(int16_t x, int16_t y) {{ // {display} ({})\n",
            component.size
        ));
        emit_items(
            &mut out,
            &component.children,
            true,
            options,
            &component_names,
            &mut namer,
        );
        out.push_str("};\n\n");
    }

    for frame in scene.frames() {
        let display = namer.unique(&frame.name);
        let ident = sanitize_identifier(&display);
        let params = if options.include_offset {
            "int16_t x, int16_t y"
        } else {
            ""
        };
        out.push_str(&format!(
            "void drawFrame{ident}({params}) {{ // {display} ({})\n",
            frame.size
        ));
        emit_items(
            &mut out,
            &frame.children,
            options.include_offset,
            options,
            &component_names,
            &mut namer,
        );
        out.push_str("};\n\n");
    }

    out.truncate(out.trim_end().len());
    out.push('\n');
    debug!("generated {} bytes of display code", out.len());
    out
}

/// Make a name usable as a C identifier: whitespace runs become underscores,
/// everything else non-alphanumeric is dropped, and a leading digit gets an
/// underscore prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident = name.split_whitespace().collect::<Vec<_>>().join("_");
    ident.retain(|c| c.is_ascii_alphanumeric() || c == '_');
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

// =============================================================================
// Emission
// =============================================================================

/// Per-generation unique naming: the first use of a name stays as-is, later
/// uses get `_1`, `_2`, ... suffixes.
#[derive(Default)]
struct Namer {
    counts: HashMap<String, usize>,
}

impl Namer {
    fn unique(&mut self, name: &str) -> String {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        let unique = if *count > 0 {
            format!("{name}_{count}")
        } else {
            name.to_string()
        };
        *count += 1;
        unique
    }
}

fn emit_items(
    out: &mut String,
    items: &[Item],
    offsets: bool,
    options: &Options,
    component_names: &[(String, String)],
    namer: &mut Namer,
) {
    for item in items {
        if item.is_hidden() {
            continue;
        }
        let code = item_code(item, offsets, options, component_names, namer);
        out.push_str(&indent_lines(&code, "  "));
        out.push('\n');
    }
}

fn item_code(
    item: &Item,
    offsets: bool,
    options: &Options,
    component_names: &[(String, String)],
    namer: &mut Namer,
) -> String {
    match item {
        Item::Line(line) => format!(
            "display.drawLine({}, {}, {}, {}, {});{}",
            coord(offsets, 'x', line.from.x),
            coord(offsets, 'y', line.from.y),
            coord(offsets, 'x', line.to.x),
            coord(offsets, 'y', line.to.y),
            line.color,
            name_comment(options, &line.name),
        ),
        Item::Rect(rect) => {
            let method = match (rect.filled, rect.radius) {
                (false, 0) => "drawRect",
                (true, 0) => "fillRect",
                (false, _) => "drawRoundRect",
                (true, _) => "fillRoundRect",
            };
            let radius = if rect.radius > 0 {
                format!("{}, ", rect.radius)
            } else {
                String::new()
            };
            format!(
                "display.{method}({}, {}, {}, {}, {radius}{});{}",
                coord(offsets, 'x', rect.position.x),
                coord(offsets, 'y', rect.position.y),
                rect.size.width,
                rect.size.height,
                rect.color,
                name_comment(options, &rect.name),
            )
        }
        Item::Circle(circle) => {
            let method = if circle.filled { "fillCircle" } else { "drawCircle" };
            format!(
                "display.{method}({}, {}, {}, {});{}",
                coord(offsets, 'x', circle.center.x),
                coord(offsets, 'y', circle.center.y),
                circle.radius,
                circle.color,
                name_comment(options, &circle.name),
            )
        }
        Item::Polygon(polygon) => {
            let method = if polygon.filled {
                "fillRegularPolygon"
            } else {
                "drawRegularPolygon"
            };
            format!(
                "gfxui::{method}({}, {}, {}, {}, {}, {});{}",
                coord(offsets, 'x', polygon.center.x),
                coord(offsets, 'y', polygon.center.y),
                polygon.sides,
                polygon.radius,
                polygon.rotation,
                polygon.color,
                name_comment(options, &polygon.name),
            )
        }
        Item::Bitmap(bitmap) => {
            let ident = sanitize_identifier(&format!("{}_bytes", namer.unique(&bitmap.name)));
            let mut code = format!("static const byte {ident}[] PROGMEM = {{\n");
            for (i, byte) in bitmap.data.iter().enumerate() {
                if i > 0 && i % 12 == 0 {
                    code.push('\n');
                }
                if i % 12 == 0 {
                    code.push_str("  ");
                }
                code.push_str(&format!("0x{byte:02x}, "));
            }
            if !code.ends_with('\n') {
                code.push('\n');
            }
            code.push_str("};\n");
            code.push_str(&format!(
                "display.drawBitmap({}, {}, {ident}, {}, {}, {});{}",
                coord(offsets, 'x', bitmap.position.x),
                coord(offsets, 'y', bitmap.position.y),
                bitmap.size.width,
                bitmap.size.height,
                bitmap.color,
                name_comment(options, &bitmap.name),
            ));
            code
        }
        Item::Text(text) => {
            let mut code = String::new();
            if options.comments == Comments::All {
                code.push_str(&format!("// text-start {} \n", text.name));
            }
            code.push_str(&format!(
                "display.setCursor({}, {});\n",
                coord(offsets, 'x', text.position.x),
                coord(offsets, 'y', text.position.y),
            ));
            code.push_str(&format!("display.setTextColor({});\n", text.color));
            code.push_str(&format!("display.setFont(&{});\n", text.font));
            code.push_str(&format!("display.print({:?});", text.content));
            match options.comments {
                Comments::All => code.push_str("\n// text-end"),
                Comments::Names => code.push_str(&format!(" // {}", text.name)),
                Comments::None => {}
            }
            code
        }
        Item::Group(group) => {
            let mut lines = Vec::new();
            if options.comments == Comments::All {
                lines.push(format!("// group-start {} ", group.name));
            }
            for child in &group.children {
                if child.is_hidden() {
                    continue;
                }
                lines.push(item_code(child, offsets, options, component_names, namer));
            }
            if options.comments == Comments::All {
                lines.push("// group-end".to_string());
            }
            lines.join("\n")
        }
        Item::Instance(instance) => {
            let (_, ident) = &component_names[instance.component.0];
            format!(
                "drawComponent{ident}({}, {});{}",
                coord(offsets, 'x', instance.position.x),
                coord(offsets, 'y', instance.position.y),
                name_comment(options, &instance.name),
            )
        }
    }
}

fn coord(offsets: bool, axis: char, value: i32) -> String {
    if offsets {
        format!("{axis} + {value}")
    } else {
        value.to_string()
    }
}

fn name_comment(options: &Options, name: &str) -> String {
    match options.comments {
        Comments::None => String::new(),
        Comments::Names => format!(" // {name}"),
        // The full mode carries a trailing settings slot after the name.
        Comments::All => format!(" // {name} "),
    }
}

fn indent_lines(code: &str, indent: &str) -> String {
    code.lines()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Dependency order
// =============================================================================

/// Post-order over the component inclusion graph, stable with respect to
/// declaration order, so referenced components are emitted before their
/// callers. The builder guarantees the graph is acyclic.
fn dependency_order(scene: &Scene) -> Vec<ComponentId> {
    let mut order = Vec::new();
    let mut seen = vec![false; scene.components().len()];
    for index in 0..scene.components().len() {
        visit(ComponentId(index), scene, &mut seen, &mut order);
    }
    order
}

fn visit(id: ComponentId, scene: &Scene, seen: &mut [bool], order: &mut Vec<ComponentId>) {
    if seen[id.0] {
        return;
    }
    seen[id.0] = true;
    let mut references = Vec::new();
    instance_refs(&scene.components()[id.0].children, &mut references);
    for reference in references {
        visit(reference, scene, seen, order);
    }
    order.push(id);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        Bitmap, ComponentDesc, FrameDesc, InstanceDesc, Line, SceneDesc,
    };
    use crate::types::{Color, Point, Size};

    fn line_component(name: &str) -> ComponentDesc {
        let mut component = ComponentDesc::new(name, 10, 10);
        component.children.push(
            Line {
                to: Point::new(10, 10),
                ..Default::default()
            }
            .into(),
        );
        component
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Frame4"), "Frame4");
        assert_eq!(sanitize_identifier("My Component 2"), "My_Component_2");
        assert_eq!(sanitize_identifier("2fast"), "_2fast");
        assert_eq!(sanitize_identifier("a-b!c"), "abc");
    }

    #[test]
    fn test_duplicate_frame_names_get_suffixes() {
        let scene = SceneDesc {
            components: vec![],
            frames: vec![FrameDesc::new("Frame", 128, 64), FrameDesc::new("Frame", 128, 64)],
        }
        .build()
        .unwrap();

        let code = generate(&scene, &Options::default());
        assert!(code.contains("void drawFrameFrame() {"));
        assert!(code.contains("void drawFrameFrame_1() {"));
        assert!(code.contains("// Frame_1 (128x64)"));
    }

    #[test]
    fn test_components_emitted_in_dependency_order() {
        // Outer is declared first but instances Inner.
        let mut outer = ComponentDesc::new("Outer", 20, 20);
        outer
            .children
            .push(InstanceDesc::new("Inner", Point::new(1, 1)).into());

        let scene = SceneDesc {
            components: vec![outer, line_component("Inner")],
            frames: vec![],
        }
        .build()
        .unwrap();

        let code = generate(&scene, &Options::default());
        let inner_at = code.find("void drawComponentInner").unwrap();
        let outer_at = code.find("void drawComponentOuter").unwrap();
        assert!(inner_at < outer_at);
        assert!(code.contains("drawComponentInner(x + 1, y + 1);"));
    }

    #[test]
    fn test_hidden_items_are_left_out() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame.children.push(
            Line {
                name: "Secret".into(),
                hidden: true,
                to: Point::new(4, 4),
                ..Default::default()
            }
            .into(),
        );

        let scene = SceneDesc {
            components: vec![],
            frames: vec![frame],
        }
        .build()
        .unwrap();

        let code = generate(&scene, &Options::default());
        assert!(!code.contains("drawLine"));
        assert!(!code.contains("Secret"));
    }

    #[test]
    fn test_bitmap_array_emission() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame.children.push(
            Bitmap {
                name: "Logo".into(),
                position: Point::new(4, 5),
                size: Size::new(16, 2),
                data: vec![0x12, 0x34, 0x56, 0x78],
                color: Color::WHITE,
                ..Default::default()
            }
            .into(),
        );

        let scene = SceneDesc {
            components: vec![],
            frames: vec![frame],
        }
        .build()
        .unwrap();

        let code = generate(&scene, &Options::default());
        assert!(code.contains("static const byte Logo_bytes[] PROGMEM = {"));
        assert!(code.contains("0x12, 0x34, 0x56, 0x78, "));
        assert!(code.contains("display.drawBitmap(4, 5, Logo_bytes, 16, 2, 15);"));
    }

    #[test]
    fn test_frame_offset_params() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame
            .children
            .push(InstanceDesc::new("Component", Point::new(29, 22)).into());

        let scene = SceneDesc {
            components: vec![line_component("Component")],
            frames: vec![frame],
        }
        .build()
        .unwrap();

        let options = Options {
            include_offset: true,
            ..Default::default()
        };
        let code = generate(&scene, &options);
        assert!(code.contains("void drawFrameFrame(int16_t x, int16_t y) {"));
        assert!(code.contains("drawComponentComponent(x + 29, y + 22);"));
    }

    #[test]
    fn test_comments_none_drops_commentary() {
        let mut frame = FrameDesc::new("Frame", 128, 64);
        frame.children.push(
            Line {
                to: Point::new(4, 4),
                ..Default::default()
            }
            .into(),
        );

        let scene = SceneDesc {
            components: vec![],
            frames: vec![frame],
        }
        .build()
        .unwrap();

        let options = Options {
            comments: Comments::None,
            ..Default::default()
        };
        let code = generate(&scene, &options);
        assert!(code.contains("display.drawLine(0, 0, 4, 4, 15);\n"));
        assert!(!code.contains("// Line"));
    }
}
