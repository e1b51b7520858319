//! Arrows: directed edges between two devices.
//!
//! An arrow starts out *temporary*: it leaves its start device and its free
//! end follows the cursor. Fixing an end device and calling [`Arrow::add`]
//! *commits* it, after which it is registered in both devices' relation
//! lists. Temporary arrows never appear in any relation list.

use std::fmt;

use log::debug;

use devgraph_core::geometry::Point;

use crate::{
    device::{ArrowLink, Device, DeviceId},
    error::DiagramError,
};

/// Identifier of an arrow, unique within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrowId(u32);

impl ArrowId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ArrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the arrow's end is attached to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowEnd {
    /// Live pointer position while the arrow is being drawn.
    Cursor(Point),
    /// Fixed end device.
    Device(DeviceId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    id: ArrowId,
    start: DeviceId,
    end: ArrowEnd,
    start_point: Point,
    end_point: Point,
    committed: bool,
    active: bool,
}

impl Arrow {
    /// Creates a temporary arrow leaving `start`, with both endpoints at the
    /// start device's center until the cursor moves.
    pub fn new(id: ArrowId, start: &Device) -> Self {
        let center = start.center();
        Self {
            id,
            start: start.id(),
            end: ArrowEnd::Cursor(center),
            start_point: center,
            end_point: center,
            committed: false,
            active: false,
        }
    }

    pub fn id(&self) -> ArrowId {
        self.id
    }

    pub fn start(&self) -> DeviceId {
        self.start
    }

    pub fn end(&self) -> ArrowEnd {
        self.end
    }

    /// Returns the end device once one has been fixed.
    pub fn end_device(&self) -> Option<DeviceId> {
        match self.end {
            ArrowEnd::Device(device) => Some(device),
            ArrowEnd::Cursor(_) => None,
        }
    }

    pub fn start_point(&self) -> Point {
        self.start_point
    }

    pub fn end_point(&self) -> Point {
        self.end_point
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn is_temporary(&self) -> bool {
        !self.committed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Moves the free end to `point` and re-anchors the start on the start
    /// device's border. The free end is not clamped to anything.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::IllegalTransition`] once an end device is fixed.
    pub fn update_end_position(&mut self, start: &Device, point: Point) -> Result<(), DiagramError> {
        debug_assert_eq!(start.id(), self.start);

        if let ArrowEnd::Device(end) = self.end {
            return Err(DiagramError::illegal(format!(
                "arrow {} already ends at device {end}",
                self.id
            )));
        }

        self.end = ArrowEnd::Cursor(point);
        self.start_point = start.intersection(point);
        self.end_point = point;
        Ok(())
    }

    /// Fixes the end device and anchors both endpoints on the device borders.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::IllegalTransition`] if the arrow is already
    /// committed or if `end` is the start device.
    pub fn set_end_device(&mut self, start: &Device, end: &Device) -> Result<(), DiagramError> {
        debug_assert_eq!(start.id(), self.start);

        if self.committed {
            return Err(DiagramError::illegal(format!(
                "arrow {} is already committed",
                self.id
            )));
        }
        if end.id() == self.start {
            return Err(DiagramError::illegal(format!(
                "arrow {} cannot end at its start device {}",
                self.id, self.start
            )));
        }

        self.end = ArrowEnd::Device(end.id());
        self.update_arrow(start, end);
        Ok(())
    }

    /// Commits the arrow.
    ///
    /// Returns the link to append to the start device's outgoing list and
    /// the link to append to the end device's incoming list, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::IllegalTransition`] if no end device is set,
    /// the end equals the start, or the arrow is already committed.
    pub fn add(&mut self) -> Result<(ArrowLink, ArrowLink), DiagramError> {
        let ArrowEnd::Device(end) = self.end else {
            return Err(DiagramError::illegal(format!(
                "arrow {} has no end device",
                self.id
            )));
        };
        if end == self.start {
            return Err(DiagramError::illegal(format!(
                "arrow {} would connect device {end} to itself",
                self.id
            )));
        }
        if self.committed {
            return Err(DiagramError::illegal(format!(
                "arrow {} is already committed",
                self.id
            )));
        }

        self.committed = true;
        debug!(arrow_id:% = self.id, start:% = self.start, end:% = end; "Arrow committed");

        Ok((
            ArrowLink::new(self.id, end),
            ArrowLink::new(self.id, self.start),
        ))
    }

    /// Recomputes both endpoints from the current device geometry.
    pub fn update_arrow(&mut self, start: &Device, end: &Device) {
        debug_assert_eq!(start.id(), self.start);
        debug_assert_eq!(Some(end.id()), self.end_device());

        self.start_point = start.intersection(end.center());
        self.end_point = end.intersection(start.center());
    }

    /// Sets the presentation "selected" flag. Returns true if it changed.
    pub fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }

    /// Consumes the arrow.
    ///
    /// Returns the `(start, end)` devices it must be detached from, or
    /// `None` for an arrow that was never committed.
    pub fn delete_arrow(self) -> Option<(DeviceId, DeviceId)> {
        match (self.committed, self.end) {
            (true, ArrowEnd::Device(end)) => Some((self.start, end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use devgraph_core::{geometry::Size, identifier::Id};

    use super::*;

    fn device(index: u32, x: f32, y: f32) -> Device {
        Device::new(
            DeviceId::new(index),
            Id::new("sensor"),
            format!("Sensor {index}"),
            Point::new(x, y),
            Size::new(100.0, 100.0),
        )
    }

    #[test]
    fn test_new_arrow_is_temporary_at_start_center() {
        let a = device(0, 0.0, 0.0);
        let arrow = Arrow::new(ArrowId::new(0), &a);

        assert!(arrow.is_temporary());
        assert_eq!(arrow.end_device(), None);
        assert_eq!(arrow.start_point(), Point::new(50.0, 50.0));
        assert_eq!(arrow.end_point(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_update_end_position_follows_cursor() {
        let a = device(0, 0.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(0), &a);

        arrow
            .update_end_position(&a, Point::new(400.0, 50.0))
            .expect("temporary arrow");

        assert_eq!(arrow.end_point(), Point::new(400.0, 50.0));
        assert_eq!(arrow.end(), ArrowEnd::Cursor(Point::new(400.0, 50.0)));
        // center 50 + 100 * 0.58
        assert_approx_eq!(f32, arrow.start_point().x(), 108.0, epsilon = 0.001);
        assert_approx_eq!(f32, arrow.start_point().y(), 50.0, epsilon = 0.001);
    }

    #[test]
    fn test_set_end_device_anchors_both_ends() {
        let a = device(0, 0.0, 0.0);
        let b = device(1, 300.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(0), &a);

        arrow.set_end_device(&a, &b).expect("distinct devices");

        assert_eq!(arrow.end_device(), Some(b.id()));
        assert_approx_eq!(f32, arrow.start_point().x(), 108.0, epsilon = 0.001);
        assert_approx_eq!(f32, arrow.end_point().x(), 292.0, epsilon = 0.001);
        assert!(arrow.is_temporary());
    }

    #[test]
    fn test_update_end_position_rejected_after_end_fixed() {
        let a = device(0, 0.0, 0.0);
        let b = device(1, 300.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(0), &a);
        arrow.set_end_device(&a, &b).expect("distinct devices");

        let result = arrow.update_end_position(&a, Point::new(1.0, 1.0));
        assert!(matches!(result, Err(DiagramError::IllegalTransition(_))));
    }

    #[test]
    fn test_self_loop_rejected() {
        let a = device(0, 0.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(0), &a);

        assert!(matches!(
            arrow.set_end_device(&a, &a),
            Err(DiagramError::IllegalTransition(_))
        ));
        assert!(matches!(arrow.add(), Err(DiagramError::IllegalTransition(_))));
        assert!(arrow.is_temporary());
    }

    #[test]
    fn test_add_requires_end_device() {
        let a = device(0, 0.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(0), &a);

        assert!(matches!(arrow.add(), Err(DiagramError::IllegalTransition(_))));
        assert!(!arrow.is_committed());
    }

    #[test]
    fn test_add_returns_links_and_commits_once() {
        let a = device(0, 0.0, 0.0);
        let b = device(1, 300.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(7), &a);
        arrow.set_end_device(&a, &b).expect("distinct devices");

        let (out_link, in_link) = arrow.add().expect("commit");

        assert_eq!(out_link, ArrowLink::new(ArrowId::new(7), b.id()));
        assert_eq!(in_link, ArrowLink::new(ArrowId::new(7), a.id()));
        assert!(arrow.is_committed());
        assert!(matches!(arrow.add(), Err(DiagramError::IllegalTransition(_))));
    }

    #[test]
    fn test_update_arrow_tracks_moved_device() {
        let a = device(0, 0.0, 0.0);
        let mut b = device(1, 300.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(0), &a);
        arrow.set_end_device(&a, &b).expect("distinct devices");

        b.set_position(Point::new(0.0, 300.0));
        arrow.update_arrow(&a, &b);

        assert_approx_eq!(f32, arrow.start_point().x(), 50.0, epsilon = 0.001);
        assert_approx_eq!(f32, arrow.start_point().y(), 108.0, epsilon = 0.001);
        assert_approx_eq!(f32, arrow.end_point().y(), 292.0, epsilon = 0.001);
    }

    #[test]
    fn test_delete_arrow_only_detaches_committed() {
        let a = device(0, 0.0, 0.0);
        let b = device(1, 300.0, 0.0);

        let temporary = Arrow::new(ArrowId::new(0), &a);
        assert_eq!(temporary.delete_arrow(), None);

        let mut pending = Arrow::new(ArrowId::new(1), &a);
        pending.set_end_device(&a, &b).expect("distinct devices");
        assert_eq!(pending.clone().delete_arrow(), None);

        pending.add().expect("commit");
        assert_eq!(pending.delete_arrow(), Some((a.id(), b.id())));
    }

    #[test]
    fn test_set_active() {
        let a = device(0, 0.0, 0.0);
        let mut arrow = Arrow::new(ArrowId::new(0), &a);
        assert!(arrow.set_active(true));
        assert!(arrow.is_active());
        assert!(!arrow.set_active(true));
    }
}
