//! Property tests over random gesture sequences.
//!
//! Whatever the user does, the relation lists, the arrow registry, the
//! counters and the drawing state must agree with each other.

use proptest::prelude::*;

use devgraph::{
    Diagram,
    config::AppConfig,
    device::Connectable,
    geometry::{Point, Size},
    gesture::{Gesture, InteractionMode, Key, MouseButton, Outcome},
};

#[derive(Debug, Clone)]
enum Step {
    Drop { kind: usize, x: f32, y: f32 },
    Click { device: usize, button: usize },
    Move { x: f32, y: f32 },
    Toggle,
    Hover { device: usize },
    Leave { device: usize },
    QuickAdd,
    ArrowClick { arrow: usize },
    Drag { device: usize, x: f32, y: f32 },
    Resize { device: usize, width: f32, height: f32 },
    ContextMenu { device: usize },
    Delete,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0usize..4, -50.0f32..1000.0, -50.0f32..700.0)
            .prop_map(|(kind, x, y)| Step::Drop { kind, x, y }),
        4 => (0usize..8, 0usize..3).prop_map(|(device, button)| Step::Click { device, button }),
        1 => (0.0f32..1000.0, 0.0f32..700.0).prop_map(|(x, y)| Step::Move { x, y }),
        2 => Just(Step::Toggle),
        1 => (0usize..8).prop_map(|device| Step::Hover { device }),
        1 => (0usize..8).prop_map(|device| Step::Leave { device }),
        1 => Just(Step::QuickAdd),
        1 => (0usize..8).prop_map(|arrow| Step::ArrowClick { arrow }),
        1 => (0usize..8, -100.0f32..1100.0, -100.0f32..800.0)
            .prop_map(|(device, x, y)| Step::Drag { device, x, y }),
        1 => (0usize..8, 10.0f32..200.0, 10.0f32..200.0)
            .prop_map(|(device, width, height)| Step::Resize { device, width, height }),
        1 => (0usize..8).prop_map(|device| Step::ContextMenu { device }),
        1 => Just(Step::Delete),
    ]
}

/// Turns a step into a gesture against the live diagram, or `None` when the
/// step refers to an element that does not exist.
fn to_gesture(diagram: &Diagram, step: &Step) -> Option<Gesture> {
    let device = |index: usize| diagram.devices().nth(index).map(|device| device.id());
    let gesture = match *step {
        Step::Drop { kind, x, y } => Gesture::Drop {
            template: diagram.config().palette().entries()[kind].clone(),
            position: Point::new(x, y),
        },
        Step::Click { device: index, button } => Gesture::MouseDown {
            device: device(index)?,
            button: [MouseButton::Left, MouseButton::Middle, MouseButton::Right][button],
        },
        Step::Move { x, y } => Gesture::MouseMove(Point::new(x, y)),
        Step::Toggle => Gesture::KeyPress(Key::Char('a')),
        Step::Hover { device: index } => Gesture::HoverDevice(device(index)?),
        Step::Leave { device: index } => Gesture::LeaveDevice(device(index)?),
        Step::QuickAdd => Gesture::QuickAddArrow,
        Step::ArrowClick { arrow } => Gesture::ArrowClick(diagram.arrows().nth(arrow)?.id()),
        Step::Drag { device: index, x, y } => Gesture::Drag {
            device: device(index)?,
            position: Point::new(x, y),
        },
        Step::Resize {
            device: index,
            width,
            height,
        } => Gesture::Resize {
            device: device(index)?,
            size: Size::new(width, height),
        },
        Step::ContextMenu { device: index } => Gesture::ContextMenu {
            device: device(index)?,
            position: Point::new(0.0, 0.0),
        },
        Step::Delete => Gesture::DeleteSelected,
    };
    Some(gesture)
}

fn check_invariants(diagram: &Diagram) -> Result<(), TestCaseError> {
    for arrow in diagram.arrows() {
        prop_assert!(arrow.is_committed());
        let end_id = arrow.end_device().expect("committed arrows have an end");
        prop_assert_ne!(arrow.start(), end_id);

        let start = diagram.device(arrow.start()).expect("start exists");
        let end = diagram.device(end_id).expect("end exists");
        prop_assert_eq!(
            start
                .arrows_out()
                .iter()
                .filter(|link| link.arrow() == arrow.id() && link.peer() == end_id)
                .count(),
            1
        );
        prop_assert_eq!(
            end.arrows_in()
                .iter()
                .filter(|link| link.arrow() == arrow.id() && link.peer() == start.id())
                .count(),
            1
        );
        prop_assert!(start.is_connected_to(end_id));
        prop_assert!(end.is_connected_to(start.id()));
    }

    for device in diagram.devices() {
        prop_assert!(device.position().x() >= 0.0 && device.position().y() >= 0.0);
        for link in device.arrows_in().iter().chain(device.arrows_out()) {
            prop_assert!(diagram.arrow(link.arrow()).is_some());
            prop_assert!(diagram.device(link.peer()).is_some());
        }
    }

    prop_assert_eq!(diagram.arrow_count(), diagram.arrows().count() as i64);
    prop_assert_eq!(diagram.device_count(), diagram.devices().count() as i64);
    prop_assert_eq!(
        diagram.temporary_arrow().is_some(),
        diagram.mode() == InteractionMode::DrawingArrow
    );
    if let Some(arrow) = diagram.temporary_arrow() {
        prop_assert!(arrow.is_temporary());
        prop_assert!(diagram.arrow(arrow.id()).is_none());
        prop_assert_eq!(diagram.selected_device(), Some(arrow.start()));
    }
    if let Some(selected) = diagram.selected_device() {
        prop_assert!(diagram.device(selected).is_some());
    }
    if let Some(selected) = diagram.selected_arrow() {
        prop_assert!(diagram.arrow(selected).is_some_and(|arrow| arrow.is_active()));
    }
    for arrow in diagram.arrows() {
        prop_assert_eq!(arrow.is_active(), diagram.selected_arrow() == Some(arrow.id()));
    }
    Ok(())
}

proptest! {
    #[test]
    fn random_gestures_keep_diagram_consistent(steps in prop::collection::vec(step_strategy(), 1..80)) {
        let mut diagram = Diagram::new(AppConfig::default());

        for step in &steps {
            let Some(gesture) = to_gesture(&diagram, step) else {
                continue;
            };
            let outcome = diagram.handle(gesture);
            prop_assert!(outcome.is_ok(), "gesture failed: {:?}", outcome);
            check_invariants(&diagram)?;
        }
    }

    #[test]
    fn cascade_delete_removes_exactly_attached_arrows(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let mut diagram = Diagram::new(AppConfig::default());
        for step in &steps {
            if let Some(gesture) = to_gesture(&diagram, step) {
                diagram.handle(gesture).expect("live ids");
            }
        }

        let Some(victim) = diagram.devices().next().map(|device| device.id()) else {
            return Ok(());
        };
        let degree = diagram.device(victim).unwrap().degree();
        let arrows_before = diagram.arrow_count();

        let removed = diagram.delete_device(victim).expect("known device");

        prop_assert_eq!(removed, degree);
        prop_assert_eq!(diagram.arrow_count(), arrows_before - degree as i64);
        for device in diagram.devices() {
            prop_assert!(!device.is_connected_to(victim));
        }
        check_invariants(&diagram)?;
    }
}

#[test]
fn test_outcome_for_commit_is_reported() {
    let mut diagram = Diagram::new(AppConfig::default());
    let sensor = diagram.config().palette().get("sensor").cloned().unwrap();
    let a = diagram.add_device(&sensor, Point::new(0.0, 0.0)).unwrap();
    let b = diagram.add_device(&sensor, Point::new(300.0, 0.0)).unwrap();

    diagram.handle(Gesture::ToggleArrowMode).unwrap();
    diagram
        .handle(Gesture::MouseDown { device: a, button: MouseButton::Left })
        .unwrap();
    let outcome = diagram
        .handle(Gesture::MouseDown { device: b, button: MouseButton::Left })
        .unwrap();

    assert!(matches!(outcome, Outcome::ArrowCommitted(_)));
}
