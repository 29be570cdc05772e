//! End-to-end rendering behavior over built scenes.
//!
//! The fixture mirrors a small editor project: a line component instanced
//! three times in one frame, plus a labeled text component.

use gfx_scene::{
    Color, ComponentDesc, DrawCall, FrameBuffer, FrameDesc, InstanceDesc, Line, Point, Recording,
    RenderError, SceneDesc, Text, render_frame, render_scene,
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
fn absolute_coordinates_sum_placements() {
    let scene = test_project().build().unwrap();
    let mut surface = Recording::new();
    render_frame(&scene, scene.frame("Frame4").unwrap(), &mut surface).unwrap();

    assert_eq!(
        surface.calls()[0],
        DrawCall::Line {
            x0: 29,
            y0: 22,
            x1: 39,
            y1: 32,
            color: Color::new(15),
        }
    );
}

#[test]
fn paint_order_is_document_order() {
    let scene = test_project().build().unwrap();
    let mut surface = Recording::new();
    render_frame(&scene, scene.frame("Frame4").unwrap(), &mut surface).unwrap();

    let origins: Vec<(i32, i32)> = surface
        .calls()
        .iter()
        .map(|call| match call {
            DrawCall::Line { x0, y0, .. } => (*x0, *y0),
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(origins, vec![(29, 22), (8, 7), (5, 27)]);
}

#[test]
fn rendering_twice_yields_identical_sequences() {
    let scene = test_project().build().unwrap();
    let frame = scene.frame("Frame4").unwrap();

    let mut first = Recording::new();
    render_frame(&scene, frame, &mut first).unwrap();
    let mut second = Recording::new();
    render_frame(&scene, frame, &mut second).unwrap();

    assert_eq!(first.calls(), second.calls());
    assert!(!first.is_empty());
}

#[test]
fn text_configures_cursor_color_font_then_prints() {
    let mut desc = test_project();
    let mut frame = FrameDesc::new("Labels", 128, 64);
    frame
        .children
        .push(InstanceDesc::new("Param", Point::ZERO).into());
    desc.frames.push(frame);
    let scene = desc.build().unwrap();

    let mut surface = Recording::new();
    render_frame(&scene, scene.frame("Labels").unwrap(), &mut surface).unwrap();

    assert_eq!(
        surface.calls(),
        &[
            DrawCall::SetCursor { x: 3, y: 2 },
            DrawCall::SetTextColor {
                color: Color::new(15),
            },
            DrawCall::SetFont {
                font: "miwos7pt".into(),
            },
            DrawCall::Print {
                text: "Param".into(),
            },
        ]
    );
}

#[test]
fn empty_frame_renders_no_calls() {
    let scene = SceneDesc {
        components: vec![],
        frames: vec![FrameDesc::new("Empty", 128, 64)],
    }
    .build()
    .unwrap();

    let mut surface = Recording::new();
    render_frame(&scene, scene.frame("Empty").unwrap(), &mut surface).unwrap();
    assert!(surface.is_empty());
}

#[test]
fn nested_instances_accumulate_offsets() {
    let mut inner = ComponentDesc::new("Inner", 2, 2);
    inner.children.push(
        Line {
            to: Point::new(1, 1),
            ..Default::default()
        }
        .into(),
    );

    let mut outer = ComponentDesc::new("Outer", 10, 10);
    outer
        .children
        .push(InstanceDesc::new("Inner", Point::new(2, 3)).into());

    let mut frame = FrameDesc::new("Frame", 128, 64);
    frame
        .children
        .push(InstanceDesc::new("Outer", Point::new(10, 10)).into());

    let scene = SceneDesc {
        components: vec![inner, outer],
        frames: vec![frame],
    }
    .build()
    .unwrap();

    let mut surface = Recording::new();
    render_frame(&scene, scene.frame("Frame").unwrap(), &mut surface).unwrap();
    assert_eq!(
        surface.calls(),
        &[DrawCall::Line {
            x0: 12,
            y0: 13,
            x1: 13,
            y1: 14,
            color: Color::WHITE,
        }]
    );
}

#[test]
fn surface_failure_aborts_traversal() {
    let scene = test_project().build().unwrap();
    let mut surface = Recording::failing_at(1);

    let err = render_frame(&scene, scene.frame("Frame4").unwrap(), &mut surface).unwrap_err();
    assert!(matches!(err, RenderError::Surface(_)));
    // The first call landed; nothing after the failure was issued.
    assert_eq!(surface.len(), 1);
}

#[test]
fn render_scene_visits_frames_in_declaration_order() {
    let mut first = FrameDesc::new("First", 16, 16);
    first.children.push(
        Line {
            to: Point::new(1, 0),
            ..Default::default()
        }
        .into(),
    );
    let mut second = FrameDesc::new("Second", 16, 16);
    second.children.push(
        Line {
            to: Point::new(2, 0),
            ..Default::default()
        }
        .into(),
    );

    let scene = SceneDesc {
        components: vec![],
        frames: vec![first, second],
    }
    .build()
    .unwrap();

    let mut surface = Recording::new();
    render_scene(&scene, &mut surface).unwrap();
    let ends: Vec<i32> = surface
        .calls()
        .iter()
        .map(|call| match call {
            DrawCall::Line { x1, .. } => *x1,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(ends, vec![1, 2]);
}

#[test]
fn framebuffer_receives_translated_pixels() {
    let scene = test_project().build().unwrap();
    let mut buffer = FrameBuffer::new(128, 64);
    render_frame(&scene, scene.frame("Frame4").unwrap(), &mut buffer).unwrap();

    // Endpoints of each placed line instance.
    for (x, y) in [(29, 22), (39, 32), (8, 7), (18, 17), (5, 27), (15, 37)] {
        assert_eq!(buffer.get(x, y), Some(Color::new(15)), "({x}, {y})");
    }
    assert_eq!(buffer.get(0, 0), Some(Color::BLACK));
}
