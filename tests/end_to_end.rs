use skyline_viewer::delivery::wire::{read_overlays, write_overlay};
use skyline_viewer::skyline::{extract, Building, Direction, Orientation, Segment, Skyline};
use skyline_viewer::viewer::{BoundingBox, SurfaceSize, ViewerState, ViewerTask};

fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(x1, y1, x2, y2).expect("finite segment")
}

#[test]
fn diagonal_skyline_fills_square_surface() {
    let sky = Skyline::new(Direction::Up, vec![Building::new(0.0, 1.0, 0.0, 10.0)]);
    let segments = extract(&sky, Orientation::Vertical);
    assert_eq!(segments, vec![seg(0.0, 0.0, 10.0, 10.0)]);

    let mut state = ViewerState::default();
    state.resize(SurfaceSize::new(100.0, 100.0));
    state.apply(ViewerTask::AddOverlay { segments });
    assert_eq!(state.bounds(), BoundingBox::new(0.0, 10.0, 0.0, 10.0));

    let t = state.transform().expect("viewport");
    assert!((t.scale - 8.264_462_809_917_354).abs() < 1e-9);
    assert_eq!((t.center.x, t.center.y), (5.0, 5.0));

    let lines = state.draw_lines(2.0);
    assert_eq!(lines.len(), 1);
    // the rising line runs from bottom-left to top-right on screen
    assert!(lines[0].from[0] < lines[0].to[0]);
    assert!(lines[0].from[1] > lines[0].to[1]);
}

#[test]
fn flat_building_is_reflected_under_horizontal_orientation() {
    let sky = Skyline::new(Direction::Up, vec![Building::new(2.0, 0.0, 0.0, 5.0)]);
    assert_eq!(
        extract(&sky, Orientation::Vertical),
        vec![seg(0.0, 2.0, 5.0, 2.0)]
    );
    assert_eq!(
        extract(&sky, Orientation::Horizontal),
        vec![seg(2.0, 0.0, 2.0, 5.0)]
    );

    let diagonal = Skyline::new(Direction::Up, vec![Building::new(0.0, 1.0, 0.0, 10.0)]);
    assert_eq!(
        extract(&diagonal, Orientation::Horizontal),
        extract(&diagonal, Orientation::Vertical)
    );
}

#[test]
fn bounding_box_does_not_depend_on_delivery_order() {
    let a = vec![seg(0.0, 0.0, 1.0, 1.0)];
    let b = vec![seg(-4.0, 3.0, 2.0, 9.0)];
    let c = vec![seg(7.0, -2.0, 8.0, 0.5)];

    let mut first = ViewerState::default();
    first.add_overlay([a.clone(), b.clone()].concat());
    first.add_overlay(c.clone());

    let mut second = ViewerState::default();
    second.add_overlay(c);
    second.add_overlay([a, b].concat());

    assert_eq!(first.bounds(), second.bounds());
    assert_ne!(first.overlays()[0].segments, second.overlays()[0].segments);
}

#[test]
fn overlays_survive_the_text_protocol() {
    let sky = Skyline::new(
        Direction::Down,
        vec![
            Building::sentinel(f64::NEG_INFINITY, 0.0),
            Building::new(1.0, 0.25, 0.0, 4.0),
            Building::sentinel(4.0, f64::INFINITY),
        ],
    );
    let vertical = extract(&sky, Orientation::Vertical);
    let horizontal = extract(&sky, Orientation::Horizontal);

    let mut pipe = Vec::new();
    write_overlay(&mut pipe, &vertical).expect("write");
    write_overlay(&mut pipe, &horizontal).expect("write");

    let mut state = ViewerState::default();
    read_overlays(pipe.as_slice(), |segments| {
        state.apply(ViewerTask::AddOverlay { segments })
    })
    .expect("read");

    assert_eq!(state.overlays().len(), 2);
    assert_eq!(
        state.overlays()[0].segments,
        vec![seg(0.0, -1.0, 4.0, -2.0)]
    );
    assert_eq!(
        state.overlays()[1].segments,
        vec![seg(-1.0, 0.0, -2.0, 4.0)]
    );
    assert_ne!(state.overlays()[0].color, state.overlays()[1].color);
}
