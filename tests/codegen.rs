//! Generated code shape against a known project.

use gfx_scene::codegen::Options;
use gfx_scene::{
    Color, ComponentDesc, FrameDesc, InstanceDesc, Line, Point, SceneDesc, Text, generate,
};

fn test_project() -> SceneDesc {
    let mut component = ComponentDesc::new("Component", 10, 10);
    component.children.push(
        Line {
            to: Point::new(10, 10),
            color: Color::new(15),
            ..Default::default()
        }
        .into(),
    );

    let mut param = ComponentDesc::new("Param", 35, 12);
    param.children.push(
        Text {
            position: Point::new(3, 2),
            content: "Param".into(),
            font: "miwos7pt".into(),
            color: Color::new(15),
            ..Default::default()
        }
        .into(),
    );

    let mut frame = FrameDesc::new("Frame4", 128, 64);
    for position in [Point::new(29, 22), Point::new(8, 7), Point::new(5, 27)] {
        frame
            .children
            .push(InstanceDesc::new("Component", position).into());
    }

    SceneDesc {
        components: vec![component, param],
        frames: vec![frame],
    }
}

#[test]
fn generates_component_and_frame_functions() {
    let scene = test_project().build().unwrap();
    let code = generate(&scene, &Options::default());

    assert!(code.starts_with("/**\n * Created with gfx-scene@"));

    let component = "void drawComponentComponent(int16_t x, int16_t y) { // Component (10x10)\n\
                     \x20 display.drawLine(x + 0, y + 0, x + 10, y + 10, 15); // Line \n\
                     };";
    assert!(code.contains(component), "missing component fn in:\n{code}");

    let param = "void drawComponentParam(int16_t x, int16_t y) { // Param (35x12)\n\
                 \x20 // text-start Text \n\
                 \x20 display.setCursor(x + 3, y + 2);\n\
                 \x20 display.setTextColor(15);\n\
                 \x20 display.setFont(&miwos7pt);\n\
                 \x20 display.print(\"Param\");\n\
                 \x20 // text-end\n\
                 };";
    assert!(code.contains(param), "missing text component fn in:\n{code}");

    let frame = "void drawFrameFrame4() { // Frame4 (128x64)\n\
                 \x20 drawComponentComponent(29, 22); // Component \n\
                 \x20 drawComponentComponent(8, 7); // Component \n\
                 \x20 drawComponentComponent(5, 27); // Component \n\
                 };";
    assert!(code.contains(frame), "missing frame fn in:\n{code}");
}

#[test]
fn generation_is_deterministic() {
    let scene = test_project().build().unwrap();
    let first = generate(&scene, &Options::default());
    let second = generate(&scene, &Options::default());
    assert_eq!(first, second);
}
