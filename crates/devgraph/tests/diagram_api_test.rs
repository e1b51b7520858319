//! Integration tests for the Diagram API
//!
//! These tests drive the diagram through gestures only, the way a front end
//! would.

use devgraph::{
    Diagram, DiagramError,
    arrow::ArrowId,
    config::AppConfig,
    device::{Connectable, DeviceId},
    geometry::Point,
    gesture::{Gesture, InteractionMode, Key, MouseButton, Outcome},
    view::{RecordingView, ViewEvent},
};

fn new_diagram() -> Diagram<RecordingView> {
    Diagram::with_view(AppConfig::default(), RecordingView::new())
}

fn drop_device(diagram: &mut Diagram<RecordingView>, device_type: &str, x: f32, y: f32) -> DeviceId {
    let template = diagram
        .config()
        .palette()
        .get(device_type)
        .cloned()
        .expect("builtin template");
    match diagram.handle(Gesture::Drop {
        template,
        position: Point::new(x, y),
    }) {
        Ok(Outcome::DeviceAdded(id)) => id,
        other => panic!("drop failed: {other:?}"),
    }
}

fn left_click(diagram: &mut Diagram<RecordingView>, device: DeviceId) -> Outcome {
    diagram
        .handle(Gesture::MouseDown {
            device,
            button: MouseButton::Left,
        })
        .expect("known device")
}

fn draw_arrow(diagram: &mut Diagram<RecordingView>, start: DeviceId, end: DeviceId) -> ArrowId {
    diagram
        .handle(Gesture::ToggleArrowMode)
        .expect("toggle arrow mode");
    left_click(diagram, start);
    match left_click(diagram, end) {
        Outcome::ArrowCommitted(arrow) => arrow,
        other => panic!("arrow not committed: {other:?}"),
    }
}

/// Every committed arrow is listed exactly once on each side, and every
/// relation-list entry points at a committed arrow.
fn assert_consistent(diagram: &Diagram<RecordingView>) {
    for arrow in diagram.arrows() {
        let end = arrow.end_device().expect("committed arrows have an end");
        let start = diagram.device(arrow.start()).expect("start device exists");
        let end = diagram.device(end).expect("end device exists");

        let outgoing = start
            .arrows_out()
            .iter()
            .filter(|link| link.arrow() == arrow.id())
            .count();
        let incoming = end
            .arrows_in()
            .iter()
            .filter(|link| link.arrow() == arrow.id())
            .count();
        assert_eq!(outgoing, 1, "arrow {} missing from start", arrow.id());
        assert_eq!(incoming, 1, "arrow {} missing from end", arrow.id());
        assert!(start.is_connected_to(end.id()));
        assert!(end.is_connected_to(start.id()));
    }

    for device in diagram.devices() {
        for link in device.arrows_in().iter().chain(device.arrows_out()) {
            assert!(
                diagram.arrow(link.arrow()).is_some(),
                "device {} references deleted arrow {}",
                device.id(),
                link.arrow()
            );
        }
    }

    assert_eq!(diagram.arrow_count(), diagram.arrows().count() as i64);
    assert_eq!(diagram.device_count(), diagram.devices().count() as i64);
    assert_eq!(
        diagram.temporary_arrow().is_some(),
        diagram.mode() == InteractionMode::DrawingArrow
    );
}

#[test]
fn test_drop_drag_delete_scenario() {
    let mut diagram = new_diagram();
    let sensor = drop_device(&mut diagram, "sensor", 50.0, 50.0);
    let machine = drop_device(&mut diagram, "machine", 400.0, 50.0);
    let valve = drop_device(&mut diagram, "valve", 400.0, 400.0);

    draw_arrow(&mut diagram, machine, sensor);
    draw_arrow(&mut diagram, sensor, valve);
    assert_eq!(diagram.arrow_count(), 2);

    diagram.handle(Gesture::DragStart(sensor)).expect("drag start");
    diagram
        .handle(Gesture::Drag {
            device: sensor,
            position: Point::new(80.0, 80.0),
        })
        .expect("drag");
    diagram.handle(Gesture::DragStop(sensor)).expect("drag stop");

    let moved = diagram.device(sensor).expect("sensor exists");
    assert_eq!(moved.position(), Point::new(80.0, 80.0));
    assert_eq!(moved.center(), Point::new(140.0, 130.0));
    let machine_center = diagram.device(machine).unwrap().center();
    let valve_center = diagram.device(valve).unwrap().center();
    for arrow in diagram.arrows() {
        if arrow.start() == sensor {
            assert_eq!(arrow.start_point(), moved.intersection(valve_center));
        } else {
            assert_eq!(arrow.end_point(), moved.intersection(machine_center));
        }
    }

    left_click(&mut diagram, sensor);
    let outcome = diagram
        .handle(Gesture::KeyPress(Key::Delete))
        .expect("delete");

    assert_eq!(
        outcome,
        Outcome::DeviceDeleted {
            device: sensor,
            arrows_removed: 2,
        }
    );
    assert_eq!(diagram.arrow_count(), 0);
    assert_eq!(diagram.device_count(), 2);
    assert_eq!(diagram.device(machine).unwrap().degree(), 0);
    assert_eq!(diagram.device(valve).unwrap().degree(), 0);
    assert_consistent(&diagram);
}

#[test]
fn test_double_toggle_returns_to_clean_idle() {
    let mut diagram = new_diagram();
    let a = drop_device(&mut diagram, "sensor", 0.0, 0.0);
    left_click(&mut diagram, a);

    diagram.handle(Gesture::ToggleArrowMode).unwrap();
    diagram.handle(Gesture::ToggleArrowMode).unwrap();

    assert_eq!(diagram.mode(), InteractionMode::Idle);
    assert_eq!(diagram.selected_device(), None);
    assert!(diagram.temporary_arrow().is_none());
    assert!(!diagram.device(a).unwrap().is_active());
}

#[test]
fn test_toggle_off_while_drawing_discards_temporary_arrow() {
    let mut diagram = new_diagram();
    let a = drop_device(&mut diagram, "sensor", 0.0, 0.0);

    diagram.handle(Gesture::ToggleArrowMode).unwrap();
    let Outcome::ArrowStarted(arrow) = left_click(&mut diagram, a) else {
        panic!("arrow should start");
    };
    diagram
        .handle(Gesture::MouseMove(Point::new(500.0, 500.0)))
        .unwrap();

    assert_eq!(
        diagram.handle(Gesture::ToggleArrowMode),
        Ok(Outcome::ModeChanged(InteractionMode::Idle))
    );
    assert!(diagram.temporary_arrow().is_none());
    assert_eq!(diagram.selected_device(), None);
    assert_eq!(diagram.arrow_count(), 0);
    assert!(diagram.view().events().contains(&ViewEvent::ArrowRemoved(arrow)));
    assert_consistent(&diagram);
}

#[test]
fn test_self_loop_click_never_commits() {
    let mut diagram = new_diagram();
    let a = drop_device(&mut diagram, "sensor", 0.0, 0.0);

    diagram.handle(Gesture::ToggleArrowMode).unwrap();
    left_click(&mut diagram, a);
    let outcome = left_click(&mut diagram, a);

    assert!(matches!(outcome, Outcome::ArrowCancelled(_)));
    assert_eq!(diagram.arrow_count(), 0);
    assert_eq!(diagram.device(a).unwrap().degree(), 0);
}

#[test]
fn test_parallel_arrows_are_allowed() {
    let mut diagram = new_diagram();
    let a = drop_device(&mut diagram, "sensor", 0.0, 0.0);
    let b = drop_device(&mut diagram, "machine", 300.0, 0.0);

    let first = draw_arrow(&mut diagram, a, b);
    let second = draw_arrow(&mut diagram, a, b);
    let back = draw_arrow(&mut diagram, b, a);

    assert_ne!(first, second);
    assert_ne!(second, back);
    assert_eq!(diagram.arrow_count(), 3);
    assert_eq!(diagram.device(a).unwrap().arrows_out().len(), 2);
    assert_eq!(diagram.device(a).unwrap().arrows_in().len(), 1);
    assert_eq!(
        diagram.relation_summary(b).unwrap().to_string(),
        "predecessors: [Sensor 1, Sensor 1], successors: [Sensor 1]"
    );
    assert_consistent(&diagram);
}

#[test]
fn test_arrow_selection_sequence() {
    let mut diagram = new_diagram();
    let a = drop_device(&mut diagram, "sensor", 0.0, 0.0);
    let b = drop_device(&mut diagram, "machine", 300.0, 0.0);
    let c = drop_device(&mut diagram, "valve", 600.0, 0.0);
    let x = draw_arrow(&mut diagram, a, b);
    let y = draw_arrow(&mut diagram, b, c);

    for arrow in [x, y, x] {
        diagram.handle(Gesture::ArrowClick(arrow)).unwrap();
    }

    assert_eq!(diagram.selected_arrow(), Some(x));
    assert!(diagram.arrow(x).unwrap().is_active());
    assert!(!diagram.arrow(y).unwrap().is_active());
}

#[test]
fn test_drop_outside_area_is_ignored() {
    let mut diagram = new_diagram();
    let template = diagram.config().palette().get("valve").cloned().unwrap();

    let outcome = diagram
        .handle(Gesture::Drop {
            template,
            position: Point::new(990.0, 690.0),
        })
        .unwrap();

    assert!(matches!(outcome, Outcome::Ignored(_)));
    assert_eq!(diagram.device_count(), 0);
}

#[test]
fn test_counters_are_reported_to_view() {
    let mut diagram = new_diagram();
    let a = drop_device(&mut diagram, "sensor", 0.0, 0.0);
    let b = drop_device(&mut diagram, "machine", 300.0, 0.0);
    draw_arrow(&mut diagram, a, b);

    let counters: Vec<_> = diagram
        .view()
        .events()
        .iter()
        .filter_map(|event| match event {
            ViewEvent::CounterChanged { name, count } => Some((*name, *count)),
            _ => None,
        })
        .collect();

    assert_eq!(counters, vec![("devices", 1), ("devices", 2), ("arrows", 1)]);
}

#[test]
fn test_stale_ids_are_errors() {
    let mut diagram = new_diagram();
    let a = drop_device(&mut diagram, "sensor", 0.0, 0.0);
    let b = drop_device(&mut diagram, "machine", 300.0, 0.0);
    let arrow = draw_arrow(&mut diagram, a, b);
    diagram.delete_device(b).unwrap();

    assert_eq!(
        diagram.handle(Gesture::DragStart(b)),
        Err(DiagramError::UnknownDevice(b))
    );
    assert_eq!(
        diagram.handle(Gesture::ArrowClick(arrow)),
        Err(DiagramError::UnknownArrow(arrow))
    );
    assert_consistent(&diagram);
}

#[test]
fn test_page_coordinates_for_drop() {
    let config: AppConfig = toml::from_str(
        r#"
        [area]
        origin_x = 100.0
        origin_y = 40.0
        "#,
    )
    .unwrap();
    let mut diagram = Diagram::with_view(config, RecordingView::new());

    let position = diagram.relative_coordinates(Point::new(150.0, 90.0));
    let id = drop_device(&mut diagram, "sensor", position.x(), position.y());

    assert_eq!(diagram.device(id).unwrap().position(), Point::new(50.0, 50.0));
}
