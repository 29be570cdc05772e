//! Renders a small demo project to the terminal and prints the generated
//! display code.
//!
//! ```sh
//! cargo run --example preview
//! ```

use gfx_scene::codegen::Options;
use gfx_scene::{
    Circle, Color, ComponentDesc, FrameBuffer, FrameDesc, InstanceDesc, Line, Point, Polygon,
    Rect, SceneDesc, Size, TermPreview, generate, render_scene,
};

fn demo_project() -> SceneDesc {
    let mut marker = ComponentDesc::new("Marker", 11, 11);
    marker.children.push(
        Line {
            to: Point::new(10, 10),
            ..Default::default()
        }
        .into(),
    );
    marker.children.push(
        Line {
            from: Point::new(10, 0),
            to: Point::new(0, 10),
            ..Default::default()
        }
        .into(),
    );

    let mut frame = FrameDesc::new("Demo", 128, 64);
    frame.children.push(
        Rect {
            size: Size::new(128, 64),
            radius: 6,
            ..Default::default()
        }
        .into(),
    );
    frame.children.push(
        Circle {
            center: Point::new(100, 32),
            radius: 14,
            color: Color::new(9),
            filled: true,
            ..Default::default()
        }
        .into(),
    );
    frame.children.push(
        Polygon {
            center: Point::new(64, 32),
            radius: 16,
            sides: 6,
            ..Default::default()
        }
        .into(),
    );
    for position in [Point::new(12, 10), Point::new(12, 40)] {
        frame
            .children
            .push(InstanceDesc::new("Marker", position).into());
    }

    SceneDesc {
        components: vec![marker],
        frames: vec![frame],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let scene = demo_project().build()?;

    let mut buffer = FrameBuffer::new(128, 64);
    render_scene(&scene, &mut buffer)?;
    TermPreview::stdout().present(&buffer)?;

    println!();
    print!("{}", generate(&scene, &Options::default()));
    Ok(())
}
