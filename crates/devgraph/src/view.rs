//! Rendering collaborator interface.
//!
//! The diagram never draws anything itself. It reports every visible change
//! to a [`DiagramView`], which a front end implements to update its DOM,
//! canvas or terminal. All methods default to doing nothing, so a view only
//! overrides what it renders.

use std::fmt;

use devgraph_core::geometry::{Point, Size};

use crate::{
    arrow::{Arrow, ArrowId},
    counter::Counter,
    device::{Device, DeviceId},
};

/// Titles of the devices connected to a device, for its summary lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationSummary {
    predecessors: Vec<String>,
    successors: Vec<String>,
}

impl RelationSummary {
    pub fn new(predecessors: Vec<String>, successors: Vec<String>) -> Self {
        Self {
            predecessors,
            successors,
        }
    }

    /// Titles of the start devices of incoming arrows, in arrow order.
    pub fn predecessors(&self) -> &[String] {
        &self.predecessors
    }

    /// Titles of the end devices of outgoing arrows, in arrow order.
    pub fn successors(&self) -> &[String] {
        &self.successors
    }
}

impl fmt::Display for RelationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "predecessors: [{}], successors: [{}]",
            self.predecessors.join(", "),
            self.successors.join(", ")
        )
    }
}

/// The quick-add arrow button shown over a hovered device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affordance {
    device: DeviceId,
    position: Point,
    size: Size,
}

impl Affordance {
    /// Places the affordance flush with the bottom-right corner of `device`.
    pub fn for_device(device: &Device, size: Size) -> Self {
        let position = device
            .position()
            .add_size(device.size())
            .sub_size(size);
        Self {
            device: device.id(),
            position,
            size,
        }
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Top-left corner of the affordance.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// Observer of visible diagram changes.
#[allow(unused_variables)]
pub trait DiagramView {
    /// A device was created; `image` is the registered markup for its type.
    fn device_added(&mut self, device: &Device, image: Option<&str>) {}

    /// A device moved or changed size.
    fn device_moved(&mut self, device: &Device) {}

    fn device_removed(&mut self, device: DeviceId) {}

    fn device_activated(&mut self, device: DeviceId, active: bool) {}

    /// The predecessor/successor lists of a device changed.
    fn relations_changed(&mut self, device: DeviceId, summary: &RelationSummary) {}

    /// An arrow was created or one of its endpoints moved.
    fn arrow_drawn(&mut self, arrow: &Arrow) {}

    fn arrow_removed(&mut self, arrow: ArrowId) {}

    fn arrow_activated(&mut self, arrow: ArrowId, active: bool) {}

    /// The arrow button's active state changed.
    fn arrow_mode_changed(&mut self, active: bool) {}

    /// The quick-add affordance was shown, moved (`Some`) or hidden (`None`).
    fn affordance_changed(&mut self, affordance: Option<Affordance>) {}

    fn context_menu_requested(&mut self, device: DeviceId, position: Point) {}

    fn counter_changed(&mut self, counter: &Counter) {}
}

/// A view that renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl DiagramView for NullView {}

/// A recorded view notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    DeviceAdded { device: DeviceId, image: Option<String> },
    DeviceMoved { device: DeviceId, position: Point },
    DeviceRemoved(DeviceId),
    DeviceActivated { device: DeviceId, active: bool },
    RelationsChanged { device: DeviceId, summary: RelationSummary },
    ArrowDrawn { arrow: ArrowId, start: Point, end: Point },
    ArrowRemoved(ArrowId),
    ArrowActivated { arrow: ArrowId, active: bool },
    ArrowModeChanged(bool),
    AffordanceChanged(Option<Affordance>),
    ContextMenuRequested { device: DeviceId, position: Point },
    CounterChanged { name: &'static str, count: i64 },
}

/// A view that records every notification, for headless front ends and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Returns the recorded events and starts a fresh recording.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}

impl DiagramView for RecordingView {
    fn device_added(&mut self, device: &Device, image: Option<&str>) {
        self.events.push(ViewEvent::DeviceAdded {
            device: device.id(),
            image: image.map(str::to_string),
        });
    }

    fn device_moved(&mut self, device: &Device) {
        self.events.push(ViewEvent::DeviceMoved {
            device: device.id(),
            position: device.position(),
        });
    }

    fn device_removed(&mut self, device: DeviceId) {
        self.events.push(ViewEvent::DeviceRemoved(device));
    }

    fn device_activated(&mut self, device: DeviceId, active: bool) {
        self.events
            .push(ViewEvent::DeviceActivated { device, active });
    }

    fn relations_changed(&mut self, device: DeviceId, summary: &RelationSummary) {
        self.events.push(ViewEvent::RelationsChanged {
            device,
            summary: summary.clone(),
        });
    }

    fn arrow_drawn(&mut self, arrow: &Arrow) {
        self.events.push(ViewEvent::ArrowDrawn {
            arrow: arrow.id(),
            start: arrow.start_point(),
            end: arrow.end_point(),
        });
    }

    fn arrow_removed(&mut self, arrow: ArrowId) {
        self.events.push(ViewEvent::ArrowRemoved(arrow));
    }

    fn arrow_activated(&mut self, arrow: ArrowId, active: bool) {
        self.events.push(ViewEvent::ArrowActivated { arrow, active });
    }

    fn arrow_mode_changed(&mut self, active: bool) {
        self.events.push(ViewEvent::ArrowModeChanged(active));
    }

    fn affordance_changed(&mut self, affordance: Option<Affordance>) {
        self.events.push(ViewEvent::AffordanceChanged(affordance));
    }

    fn context_menu_requested(&mut self, device: DeviceId, position: Point) {
        self.events
            .push(ViewEvent::ContextMenuRequested { device, position });
    }

    fn counter_changed(&mut self, counter: &Counter) {
        self.events.push(ViewEvent::CounterChanged {
            name: counter.name(),
            count: counter.count(),
        });
    }
}
