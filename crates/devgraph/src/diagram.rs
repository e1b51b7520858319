//! The diagram controller.
//!
//! [`Diagram`] owns every device and committed arrow, the arrow-drawing
//! state machine, the selection and hover state, and the two counters. It
//! is the only place where both ends of an arrow are touched, which keeps
//! the device relation lists and the arrow registry consistent.
//!
//! Gestures go through [`Diagram::handle`]; the operations it is built from
//! are public as well, for front ends that drive the model directly.

mod dispatch;

use indexmap::IndexMap;
use log::{debug, info, trace};

use devgraph_core::geometry::{Bounds, Point, Size};

use crate::{
    arrow::{Arrow, ArrowId},
    config::AppConfig,
    counter::Counter,
    device::{ArrowLink, Connectable, Device, DeviceId},
    error::DiagramError,
    gesture::InteractionMode,
    palette::{DeviceRegistry, PaletteEntry},
    view::{Affordance, DiagramView, NullView, RelationSummary},
};

/// Arrow-drawing state. The temporary arrow only exists while drawing.
#[derive(Debug)]
enum State {
    Idle,
    ArmedForArrow,
    DrawingArrow(Arrow),
}

/// An interactive device diagram reporting its changes to a [`DiagramView`].
///
/// # Examples
///
/// ```
/// use devgraph::{Diagram, config::AppConfig, geometry::Point};
///
/// let mut diagram = Diagram::new(AppConfig::default());
/// let sensor = diagram.config().palette().get("sensor").cloned().unwrap();
///
/// let id = diagram.add_device(&sensor, Point::new(50.0, 50.0)).unwrap();
/// assert_eq!(diagram.device(id).unwrap().title(), "Sensor 1");
/// assert_eq!(diagram.device_count(), 1);
/// ```
#[derive(Debug)]
pub struct Diagram<V: DiagramView = NullView> {
    config: AppConfig,
    registry: DeviceRegistry,
    devices: IndexMap<DeviceId, Device>,
    arrows: IndexMap<ArrowId, Arrow>,
    state: State,
    selected_device: Option<DeviceId>,
    selected_arrow: Option<ArrowId>,
    hovered_device: Option<DeviceId>,
    affordance: Option<Affordance>,
    devices_counter: Counter,
    arrows_counter: Counter,
    next_device: u32,
    next_arrow: u32,
    /// Number appended to the next device title. Starts at 1.
    next_title: u32,
    view: V,
}

impl Diagram<NullView> {
    /// Creates an empty diagram that renders nothing.
    pub fn new(config: AppConfig) -> Self {
        Self::with_view(config, NullView)
    }
}

impl<V: DiagramView> Diagram<V> {
    /// Creates an empty diagram reporting to `view`.
    ///
    /// Device images are taken from the configured palette; update
    /// functions can be added through [`Diagram::registry_mut`].
    pub fn with_view(config: AppConfig, view: V) -> Self {
        let registry = DeviceRegistry::from_palette(config.palette());
        Self {
            config,
            registry,
            devices: IndexMap::new(),
            arrows: IndexMap::new(),
            state: State::Idle,
            selected_device: None,
            selected_arrow: None,
            hovered_device: None,
            affordance: None,
            devices_counter: Counter::new("devices"),
            arrows_counter: Counter::new("arrows"),
            next_device: 0,
            next_arrow: 0,
            next_title: 1,
            view,
        }
    }

    /// Replaces the image and update-function registry.
    pub fn with_registry(mut self, registry: DeviceRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Registries consulted when devices are created. Changes only affect
    /// devices created afterwards.
    pub fn registry_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.registry
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn mode(&self) -> InteractionMode {
        match self.state {
            State::Idle => InteractionMode::Idle,
            State::ArmedForArrow => InteractionMode::ArmedForArrow,
            State::DrawingArrow(_) => InteractionMode::DrawingArrow,
        }
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    /// Devices in creation order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Returns a committed arrow.
    pub fn arrow(&self, id: ArrowId) -> Option<&Arrow> {
        self.arrows.get(&id)
    }

    /// Committed arrows in creation order.
    pub fn arrows(&self) -> impl Iterator<Item = &Arrow> {
        self.arrows.values()
    }

    /// The arrow being drawn, if any.
    pub fn temporary_arrow(&self) -> Option<&Arrow> {
        match &self.state {
            State::DrawingArrow(arrow) => Some(arrow),
            _ => None,
        }
    }

    pub fn selected_device(&self) -> Option<DeviceId> {
        self.selected_device
    }

    pub fn selected_arrow(&self) -> Option<ArrowId> {
        self.selected_arrow
    }

    pub fn hovered_device(&self) -> Option<DeviceId> {
        self.hovered_device
    }

    /// The visible quick-add affordance, if any.
    pub fn affordance(&self) -> Option<Affordance> {
        self.affordance
    }

    /// Value of the device counter.
    pub fn device_count(&self) -> i64 {
        self.devices_counter.count()
    }

    /// Value of the arrow counter. Temporary arrows are not counted.
    pub fn arrow_count(&self) -> i64 {
        self.arrows_counter.count()
    }

    pub fn devices_counter(&self) -> &Counter {
        &self.devices_counter
    }

    pub fn arrows_counter(&self) -> &Counter {
        &self.arrows_counter
    }

    /// Converts a page position into diagram-relative coordinates.
    pub fn relative_coordinates(&self, page: Point) -> Point {
        page.sub_point(self.config.area().origin())
    }

    /// Titles of a device's predecessors and successors.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] if `id` is not in the diagram.
    pub fn relation_summary(&self, id: DeviceId) -> Result<RelationSummary, DiagramError> {
        let device = self.device_ref(id)?;
        let titles = |links: &[ArrowLink]| -> Vec<String> {
            links
                .iter()
                .filter_map(|link| self.devices.get(&link.peer()))
                .map(|peer| peer.title().to_string())
                .collect()
        };
        Ok(RelationSummary::new(
            titles(device.arrows_in()),
            titles(device.arrows_out()),
        ))
    }

    /// Creates a device from `template` with its top-left corner at
    /// `position`.
    ///
    /// Returns `None`, leaving the diagram untouched, if the device box would
    /// not lie entirely inside the diagram area.
    pub fn add_device(&mut self, template: &PaletteEntry, position: Point) -> Option<DeviceId> {
        let size = self.config.geometry().device_size();
        let bounds = Bounds::new_from_top_left(position, size);
        if !self.config.area().bounds().contains_bounds(bounds) {
            debug!(
                device_type = template.device_type(),
                x = position.x(),
                y = position.y();
                "Drop outside diagram area ignored"
            );
            return None;
        }

        let id = DeviceId::new(self.next_device);
        self.next_device += 1;
        let title = format!("{} {}", template.title(), self.next_title);
        self.next_title += 1;

        let device_type = template.type_id();
        let device = Device::new(id, device_type, title, position, size)
            .with_anchor_scale(self.config.geometry().anchor_scale())
            .with_range(template.range())
            .with_update_fn(self.registry.update(device_type));

        self.view
            .device_added(&device, self.registry.image(device_type));
        info!(device_id:% = id, title = device.title(); "Device added");
        self.devices.insert(id, device);

        self.devices_counter.alter_count(1);
        self.view.counter_changed(&self.devices_counter);

        Some(id)
    }

    /// Moves a device, keeping it inside the diagram area, and re-anchors its
    /// arrows and the affordance.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] if `id` is not in the diagram.
    pub fn move_device(&mut self, id: DeviceId, position: Point) -> Result<(), DiagramError> {
        let area = self.config.area().bounds();
        let device = self
            .devices
            .get_mut(&id)
            .ok_or(DiagramError::UnknownDevice(id))?;

        let clamped = area.clamp_top_left(position, device.size());
        device.set_position(clamped);
        self.view.device_moved(device);
        trace!(device_id:% = id, x = clamped.x(), y = clamped.y(); "Device moved");

        self.reanchor_arrows(id)?;
        self.refresh_affordance(id);
        Ok(())
    }

    /// Records a new rendered size and re-anchors the device's arrows.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] if `id` is not in the diagram,
    /// and [`DiagramError::IllegalTransition`] for a size that is not
    /// strictly positive.
    pub fn resize_device(&mut self, id: DeviceId, size: Size) -> Result<(), DiagramError> {
        if !size.is_positive() {
            return Err(DiagramError::illegal(format!(
                "device {id} cannot be resized to {}x{}",
                size.width(),
                size.height()
            )));
        }
        let device = self
            .devices
            .get_mut(&id)
            .ok_or(DiagramError::UnknownDevice(id))?;

        device.set_size(size);
        self.view.device_moved(device);

        self.reanchor_arrows(id)?;
        self.refresh_affordance(id);
        Ok(())
    }

    /// Hands a new value to a device and its update function.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] if `id` is not in the diagram.
    pub fn update_device(&mut self, id: DeviceId, value: f64) -> Result<(), DiagramError> {
        let device = self
            .devices
            .get_mut(&id)
            .ok_or(DiagramError::UnknownDevice(id))?;
        device.update_device(value);
        debug!(device_id:% = id, value = value; "Device value updated");
        Ok(())
    }

    /// Deletes a device together with every arrow attached to it.
    ///
    /// Each removed arrow is also detached from the device at its other end.
    /// Returns the number of arrows removed.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] if `id` is not in the diagram.
    pub fn delete_device(&mut self, id: DeviceId) -> Result<usize, DiagramError> {
        let mut device = self
            .devices
            .shift_remove(&id)
            .ok_or(DiagramError::UnknownDevice(id))?;

        if matches!(&self.state, State::DrawingArrow(arrow) if arrow.start() == id) {
            self.deactivate_arrow_drawing();
        }

        let links = device.delete_device();
        let removed = links.len();
        let mut peers: Vec<DeviceId> = Vec::new();
        for link in links {
            if self.arrows.shift_remove(&link.arrow()).is_none() {
                continue;
            }
            if self.selected_arrow == Some(link.arrow()) {
                self.selected_arrow = None;
            }
            if let Some(peer) = self.devices.get_mut(&link.peer()) {
                peer.delete_arrow(link.arrow());
            }
            self.view.arrow_removed(link.arrow());
            if !peers.contains(&link.peer()) {
                peers.push(link.peer());
            }
        }
        for peer in peers {
            self.publish_relations(peer)?;
        }

        if removed > 0 {
            self.arrows_counter.alter_count(-(removed as i64));
            self.view.counter_changed(&self.arrows_counter);
        }
        self.devices_counter.alter_count(-1);
        self.view.counter_changed(&self.devices_counter);

        if self.selected_device == Some(id) {
            self.selected_device = None;
        }
        if self.hovered_device == Some(id) {
            self.hovered_device = None;
        }
        if self.affordance.is_some_and(|affordance| affordance.device() == id) {
            self.hide_affordance();
        }

        self.view.device_removed(id);
        info!(device_id:% = id, arrows_removed = removed; "Device deleted");

        Ok(removed)
    }

    /// Deletes a committed arrow and detaches it from both devices.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownArrow`] if `id` is not a committed
    /// arrow of the diagram.
    pub fn delete_arrow(&mut self, id: ArrowId) -> Result<(), DiagramError> {
        let arrow = self
            .arrows
            .shift_remove(&id)
            .ok_or(DiagramError::UnknownArrow(id))?;

        if self.selected_arrow == Some(id) {
            self.selected_arrow = None;
        }

        if let Some((start, end)) = arrow.delete_arrow() {
            for device_id in [start, end] {
                if let Some(device) = self.devices.get_mut(&device_id) {
                    device.delete_arrow(id);
                    self.publish_relations(device_id)?;
                }
            }
        }
        self.view.arrow_removed(id);

        self.arrows_counter.alter_count(-1);
        self.view.counter_changed(&self.arrows_counter);
        info!(arrow_id:% = id; "Arrow deleted");

        Ok(())
    }

    /// Selects a device, or clears the device selection with `None`.
    ///
    /// The previously selected device is deactivated and the new one
    /// activated.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] if the device is not in the
    /// diagram; the selection is unchanged in that case.
    pub fn select_device(&mut self, device: Option<DeviceId>) -> Result<(), DiagramError> {
        if let Some(id) = device {
            self.device_ref(id)?;
        }

        if let Some(previous) = self.selected_device.take() {
            if let Some(previous_device) = self.devices.get_mut(&previous) {
                if previous_device.set_active(false) {
                    self.view.device_activated(previous, false);
                }
            }
        }
        if let Some(id) = device {
            if let Some(selected) = self.devices.get_mut(&id) {
                if selected.set_active(true) {
                    self.view.device_activated(id, true);
                }
            }
        }

        self.selected_device = device;
        debug!(device:? = device; "Device selection changed");
        Ok(())
    }

    /// Selects a committed arrow, or clears the arrow selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownArrow`] if the arrow is not a committed
    /// arrow of the diagram.
    pub fn select_arrow(&mut self, arrow: Option<ArrowId>) -> Result<(), DiagramError> {
        if let Some(id) = arrow {
            if !self.arrows.contains_key(&id) {
                return Err(DiagramError::UnknownArrow(id));
            }
        }

        if let Some(previous) = self.selected_arrow.take() {
            if let Some(previous_arrow) = self.arrows.get_mut(&previous) {
                if previous_arrow.set_active(false) {
                    self.view.arrow_activated(previous, false);
                }
            }
        }
        if let Some(id) = arrow {
            if let Some(selected) = self.arrows.get_mut(&id) {
                if selected.set_active(true) {
                    self.view.arrow_activated(id, true);
                }
            }
        }

        self.selected_arrow = arrow;
        debug!(arrow:? = arrow; "Arrow selection changed");
        Ok(())
    }

    /// Turns arrow drawing on: clears both selections and arms the diagram
    /// for picking a start device. Does nothing if already in arrow mode.
    pub fn activate_arrow_drawing(&mut self) {
        if self.mode().is_arrow_mode() {
            return;
        }
        self.clear_selection();
        self.state = State::ArmedForArrow;
        self.view.arrow_mode_changed(true);
        debug!(mode:% = self.mode(); "Arrow drawing activated");
    }

    /// Turns arrow drawing off. A temporary arrow is discarded, and the
    /// device selection that started it is cleared.
    pub fn deactivate_arrow_drawing(&mut self) {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => return,
            State::ArmedForArrow => {}
            State::DrawingArrow(arrow) => {
                self.view.arrow_removed(arrow.id());
                debug!(arrow_id:% = arrow.id(); "Temporary arrow discarded");
                self.clear_device_selection();
            }
        }
        self.view.arrow_mode_changed(false);
        debug!(mode:% = self.mode(); "Arrow drawing deactivated");
    }

    /// Starts a temporary arrow at `device`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::IllegalTransition`] unless the diagram is
    /// armed for a new arrow, and [`DiagramError::UnknownDevice`] if the
    /// device is not in the diagram.
    pub fn start_arrow(&mut self, device: DeviceId) -> Result<ArrowId, DiagramError> {
        if !matches!(self.state, State::ArmedForArrow) {
            return Err(DiagramError::illegal(format!(
                "cannot start an arrow while {}",
                self.mode()
            )));
        }
        self.select_device(Some(device))?;

        let id = ArrowId::new(self.next_arrow);
        self.next_arrow += 1;
        let arrow = Arrow::new(id, self.device_ref(device)?);
        self.view.arrow_drawn(&arrow);
        self.state = State::DrawingArrow(arrow);
        self.hide_affordance();

        debug!(arrow_id:% = id, start:% = device; "Temporary arrow started");
        Ok(id)
    }

    /// Moves the free end of the temporary arrow.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::IllegalTransition`] when no arrow is being
    /// drawn.
    pub fn move_temporary_arrow(&mut self, point: Point) -> Result<ArrowId, DiagramError> {
        let State::DrawingArrow(arrow) = &mut self.state else {
            return Err(DiagramError::illegal("no arrow is being drawn"));
        };
        let start = self
            .devices
            .get(&arrow.start())
            .ok_or(DiagramError::UnknownDevice(arrow.start()))?;

        arrow.update_end_position(start, point)?;
        self.view.arrow_drawn(arrow);
        Ok(arrow.id())
    }

    /// Ends the temporary arrow at `end` and commits it.
    ///
    /// The arrow is appended to the start device's outgoing list and the end
    /// device's incoming list, the arrow counter is incremented, arrow
    /// drawing is turned off and the device selection cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::IllegalTransition`] when no arrow is being
    /// drawn or `end` is the start device, and
    /// [`DiagramError::UnknownDevice`] for an unknown end device. The
    /// temporary arrow is kept in either case.
    pub fn finish_arrow(&mut self, end: DeviceId) -> Result<ArrowId, DiagramError> {
        let state = std::mem::replace(&mut self.state, State::Idle);
        let State::DrawingArrow(mut arrow) = state else {
            self.state = state;
            return Err(DiagramError::illegal("no arrow is being drawn"));
        };

        let (out_link, in_link) = match self.attach(&mut arrow, end) {
            Ok(links) => links,
            Err(err) => {
                self.state = State::DrawingArrow(arrow);
                return Err(err);
            }
        };

        let id = arrow.id();
        let start = arrow.start();
        if let Some(device) = self.devices.get_mut(&start) {
            device.add_arrow_out(out_link);
        }
        if let Some(device) = self.devices.get_mut(&end) {
            device.add_arrow_in(in_link);
        }
        self.view.arrow_drawn(&arrow);
        self.arrows.insert(id, arrow);

        self.arrows_counter.alter_count(1);
        self.view.counter_changed(&self.arrows_counter);
        self.publish_relations(start)?;
        self.publish_relations(end)?;
        info!(arrow_id:% = id, start:% = start, end:% = end; "Arrow added");

        self.view.arrow_mode_changed(false);
        self.clear_device_selection();
        Ok(id)
    }

    /// Shows the quick-add affordance for `device`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] if the device is not in the
    /// diagram.
    pub fn show_affordance(&mut self, device: DeviceId) -> Result<(), DiagramError> {
        let affordance =
            Affordance::for_device(self.device_ref(device)?, self.config.geometry().affordance_size());
        self.affordance = Some(affordance);
        self.view.affordance_changed(Some(affordance));
        Ok(())
    }

    /// Hides the quick-add affordance if it is visible.
    pub fn hide_affordance(&mut self) {
        if self.affordance.take().is_some() {
            self.view.affordance_changed(None);
        }
    }

    fn device_ref(&self, id: DeviceId) -> Result<&Device, DiagramError> {
        self.devices.get(&id).ok_or(DiagramError::UnknownDevice(id))
    }

    /// Fixes the end device of `arrow` and commits it, without touching the
    /// relation lists.
    fn attach(
        &self,
        arrow: &mut Arrow,
        end: DeviceId,
    ) -> Result<(ArrowLink, ArrowLink), DiagramError> {
        let start_device = self.device_ref(arrow.start())?;
        let end_device = self.device_ref(end)?;
        arrow.set_end_device(start_device, end_device)?;
        arrow.add()
    }

    fn clear_selection(&mut self) {
        self.clear_device_selection();
        if let Some(arrow) = self.selected_arrow.take() {
            if let Some(selected) = self.arrows.get_mut(&arrow) {
                if selected.set_active(false) {
                    self.view.arrow_activated(arrow, false);
                }
            }
        }
    }

    fn clear_device_selection(&mut self) {
        if let Some(device) = self.selected_device.take() {
            if let Some(selected) = self.devices.get_mut(&device) {
                if selected.set_active(false) {
                    self.view.device_activated(device, false);
                }
            }
        }
    }

    /// Recomputes the endpoints of every arrow attached to `id`, including a
    /// temporary arrow leaving it.
    fn reanchor_arrows(&mut self, id: DeviceId) -> Result<(), DiagramError> {
        let device = self.device_ref(id)?;
        let attached: Vec<ArrowId> = device
            .arrows_in()
            .iter()
            .chain(device.arrows_out())
            .map(|link| link.arrow())
            .collect();

        for arrow_id in attached {
            let arrow = self
                .arrows
                .get_mut(&arrow_id)
                .ok_or(DiagramError::UnknownArrow(arrow_id))?;
            let end_id = arrow
                .end_device()
                .ok_or_else(|| DiagramError::illegal(format!("arrow {arrow_id} has no end device")))?;
            let start = self
                .devices
                .get(&arrow.start())
                .ok_or(DiagramError::UnknownDevice(arrow.start()))?;
            let end = self
                .devices
                .get(&end_id)
                .ok_or(DiagramError::UnknownDevice(end_id))?;
            arrow.update_arrow(start, end);
            self.view.arrow_drawn(arrow);
        }

        if let State::DrawingArrow(arrow) = &mut self.state {
            if arrow.start() == id {
                let start = self
                    .devices
                    .get(&id)
                    .ok_or(DiagramError::UnknownDevice(id))?;
                arrow.update_end_position(start, arrow.end_point())?;
                self.view.arrow_drawn(arrow);
            }
        }

        Ok(())
    }

    /// Moves the affordance along with the device it belongs to.
    fn refresh_affordance(&mut self, id: DeviceId) {
        let Some(affordance) = self.affordance else {
            return;
        };
        if affordance.device() != id {
            return;
        }
        if let Some(device) = self.devices.get(&id) {
            let moved = Affordance::for_device(device, affordance.size());
            self.affordance = Some(moved);
            self.view.affordance_changed(Some(moved));
        }
    }

    fn publish_relations(&mut self, id: DeviceId) -> Result<(), DiagramError> {
        let summary = self.relation_summary(id)?;
        trace!(device_id:% = id, summary:% = summary; "Relations changed");
        self.view.relations_changed(id, &summary);
        Ok(())
    }
}
