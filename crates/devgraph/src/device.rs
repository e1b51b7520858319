//! Devices: the typed nodes of a diagram.
//!
//! A [`Device`] knows its own geometry and keeps two ordered relation lists,
//! one for arrows it starts ([`Device::arrows_out`]) and one for arrows that
//! end at it ([`Device::arrows_in`]). Each entry is an [`ArrowLink`] naming
//! the arrow and the device at its other end, so connection queries stay
//! local to the device.
//!
//! Devices never reach into other devices. Keeping both ends of an arrow in
//! sync is the job of [`Diagram`](crate::Diagram).

use std::fmt;

use log::trace;

use devgraph_core::{
    geometry::{Bounds, Point, Size, intersect_border},
    identifier::Id,
};

use crate::{
    arrow::ArrowId,
    palette::{UpdateFn, ValueRange},
};

/// Stable index of a device, unique within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u32);

impl DeviceId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An entry of a device relation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowLink {
    arrow: ArrowId,
    peer: DeviceId,
}

impl ArrowLink {
    pub fn new(arrow: ArrowId, peer: DeviceId) -> Self {
        Self { arrow, peer }
    }

    pub fn arrow(self) -> ArrowId {
        self.arrow
    }

    /// The device at the other end of the arrow.
    pub fn peer(self) -> DeviceId {
        self.peer
    }
}

/// Which relation list an arrow was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Incoming,
    Outgoing,
}

/// Relation-list capability of a diagram node.
pub trait Connectable {
    /// Appends an arrow ending at this node.
    fn add_arrow_in(&mut self, link: ArrowLink);

    /// Appends an arrow starting at this node.
    fn add_arrow_out(&mut self, link: ArrowLink);

    /// Returns true if a direct arrow in either direction joins this node
    /// and `other`.
    fn is_connected_to(&self, other: DeviceId) -> bool;

    /// Removes `arrow` from whichever relation list holds it.
    ///
    /// Returns the list it was removed from, or `None` if this node does not
    /// reference the arrow.
    fn delete_arrow(&mut self, arrow: ArrowId) -> Option<LinkDirection>;
}

/// A node of the diagram.
#[derive(Clone)]
pub struct Device {
    id: DeviceId,
    device_type: Id,
    title: String,
    /// Top-left corner, relative to the diagram area.
    position: Point,
    size: Size,
    anchor_scale: f32,
    range: ValueRange,
    value: Option<f64>,
    active: bool,
    arrows_in: Vec<ArrowLink>,
    arrows_out: Vec<ArrowLink>,
    update_fn: Option<UpdateFn>,
}

impl Device {
    /// Default factor between a device's size and its anchor half extents.
    pub const DEFAULT_ANCHOR_SCALE: f32 = 0.58;

    pub fn new(
        id: DeviceId,
        device_type: Id,
        title: impl Into<String>,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            id,
            device_type,
            title: title.into(),
            position,
            size,
            anchor_scale: Self::DEFAULT_ANCHOR_SCALE,
            range: ValueRange::default(),
            value: None,
            active: false,
            arrows_in: Vec::new(),
            arrows_out: Vec::new(),
            update_fn: None,
        }
    }

    pub fn with_anchor_scale(mut self, anchor_scale: f32) -> Self {
        self.anchor_scale = anchor_scale;
        self
    }

    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_update_fn(mut self, update_fn: Option<UpdateFn>) -> Self {
        self.update_fn = update_fn;
        self
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn device_type(&self) -> Id {
        self.device_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn arrows_in(&self) -> &[ArrowLink] {
        &self.arrows_in
    }

    pub fn arrows_out(&self) -> &[ArrowLink] {
        &self.arrows_out
    }

    /// Number of arrows attached on either side.
    pub fn degree(&self) -> usize {
        self.arrows_in.len() + self.arrows_out.len()
    }

    /// Returns the device box in diagram coordinates.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    /// Returns the center of the device box.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Returns the point on the (scaled) device border on the way to `target`.
    ///
    /// The half extents are the device size multiplied by the anchor scale.
    pub fn intersection(&self, target: Point) -> Point {
        let anchor = self.size.scale(self.anchor_scale);
        intersect_border(self.center(), anchor.width(), anchor.height(), target)
    }

    /// Moves the device's top-left corner.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Records a new rendered size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Sets the presentation "selected" flag. Returns true if it changed.
    pub fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }

    /// Stores `value` and hands it to the update callback, if any.
    pub fn update_device(&mut self, value: f64) {
        self.value = Some(value);
        match &self.update_fn {
            Some(update) => update(self.id, self.range, value),
            None => trace!(device_id:% = self.id; "No update function registered"),
        }
    }

    /// Detaches every arrow from this device.
    ///
    /// Returns the removed links, incoming first. The caller is responsible
    /// for detaching the arrows from their peers.
    pub fn delete_device(&mut self) -> Vec<ArrowLink> {
        let mut removed = std::mem::take(&mut self.arrows_in);
        removed.append(&mut self.arrows_out);
        removed
    }
}

impl Connectable for Device {
    fn add_arrow_in(&mut self, link: ArrowLink) {
        self.arrows_in.push(link);
    }

    fn add_arrow_out(&mut self, link: ArrowLink) {
        self.arrows_out.push(link);
    }

    fn is_connected_to(&self, other: DeviceId) -> bool {
        self.arrows_out.iter().any(|link| link.peer == other)
            || self.arrows_in.iter().any(|link| link.peer == other)
    }

    fn delete_arrow(&mut self, arrow: ArrowId) -> Option<LinkDirection> {
        if let Some(index) = self.arrows_in.iter().position(|link| link.arrow == arrow) {
            self.arrows_in.remove(index);
            return Some(LinkDirection::Incoming);
        }
        if let Some(index) = self.arrows_out.iter().position(|link| link.arrow == arrow) {
            self.arrows_out.remove(index);
            return Some(LinkDirection::Outgoing);
        }
        None
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("device_type", &self.device_type)
            .field("title", &self.title)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("active", &self.active)
            .field("arrows_in", &self.arrows_in)
            .field("arrows_out", &self.arrows_out)
            .field("has_update_fn", &self.update_fn.is_some())
            .finish()
    }
}
