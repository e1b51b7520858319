//! Gesture interpretation.
//!
//! Maps each [`Gesture`] onto the diagram operations for the current
//! interaction mode.

use log::{debug, trace, warn};

use devgraph_core::geometry::{Point, Size};

use crate::{
    arrow::ArrowId,
    device::DeviceId,
    error::DiagramError,
    gesture::{Gesture, InteractionMode, Key, MouseButton, Outcome},
    palette::PaletteEntry,
    view::DiagramView,
};

use super::{Diagram, State};

impl<V: DiagramView> Diagram<V> {
    /// Interprets a gesture in the current interaction mode.
    ///
    /// Gestures that are not allowed in the current state are logged and
    /// reported as [`Outcome::Rejected`], leaving the diagram unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::UnknownDevice`] or
    /// [`DiagramError::UnknownArrow`] when the gesture refers to something
    /// that is not part of the diagram.
    ///
    /// # Examples
    ///
    /// ```
    /// use devgraph::{Diagram, config::AppConfig, gesture::{Gesture, InteractionMode, Outcome}};
    ///
    /// let mut diagram = Diagram::new(AppConfig::default());
    /// let outcome = diagram.handle(Gesture::ToggleArrowMode).unwrap();
    ///
    /// assert_eq!(outcome, Outcome::ModeChanged(InteractionMode::ArmedForArrow));
    /// ```
    pub fn handle(&mut self, gesture: Gesture) -> Result<Outcome, DiagramError> {
        debug!(gesture:? = gesture, mode:% = self.mode(); "Handling gesture");

        let outcome = match self.dispatch(gesture) {
            Err(DiagramError::IllegalTransition(reason)) => {
                warn!(reason = reason.as_str(), mode:% = self.mode(); "Gesture rejected");
                Outcome::Rejected(reason)
            }
            other => other?,
        };

        trace!(outcome:? = outcome; "Gesture handled");
        Ok(outcome)
    }

    fn dispatch(&mut self, gesture: Gesture) -> Result<Outcome, DiagramError> {
        match gesture {
            Gesture::ToggleArrowMode => Ok(self.toggle_arrow_mode()),
            Gesture::KeyPress(key) => self.on_key(key),
            Gesture::MouseDown { device, button } => self.on_mouse_down(device, button),
            Gesture::MouseUp { device } => {
                self.device_ref(device)?;
                Ok(Outcome::Ignored("mouse up has no effect"))
            }
            Gesture::MouseMove(point) => self.on_mouse_move(point),
            Gesture::HoverDevice(device) => self.on_hover(device),
            Gesture::LeaveDevice(device) => self.on_leave(device),
            Gesture::QuickAddArrow => self.on_quick_add(),
            Gesture::ArrowClick(arrow) => self.on_arrow_click(arrow),
            Gesture::Drop { template, position } => Ok(self.on_drop(&template, position)),
            Gesture::DragStart(device) => self.on_drag_start(device),
            Gesture::Drag { device, position } => {
                self.move_device(device, position)?;
                Ok(Outcome::DeviceMoved(device))
            }
            Gesture::DragStop(device) => self.on_drag_stop(device),
            Gesture::Resize { device, size } => self.on_resize(device, size),
            Gesture::ContextMenu { device, position } => self.on_context_menu(device, position),
            Gesture::DeleteSelected => self.delete_selected(),
        }
    }

    fn toggle_arrow_mode(&mut self) -> Outcome {
        if self.mode().is_arrow_mode() {
            self.deactivate_arrow_drawing();
        } else {
            self.activate_arrow_drawing();
        }
        Outcome::ModeChanged(self.mode())
    }

    fn on_key(&mut self, key: Key) -> Result<Outcome, DiagramError> {
        match key {
            Key::Char('a' | 'A') => Ok(self.toggle_arrow_mode()),
            Key::Delete => self.delete_selected(),
            Key::Char(_) => Ok(Outcome::Ignored("key is not bound")),
        }
    }

    fn on_mouse_down(
        &mut self,
        device: DeviceId,
        button: MouseButton,
    ) -> Result<Outcome, DiagramError> {
        if button != MouseButton::Left {
            return Ok(Outcome::Ignored("only the left button selects"));
        }
        self.device_ref(device)?;

        if matches!(self.state, State::ArmedForArrow) {
            let arrow = self.start_arrow(device)?;
            return Ok(Outcome::ArrowStarted(arrow));
        }
        let drawing_from = self
            .temporary_arrow()
            .map(|arrow| (arrow.id(), arrow.start()));

        match drawing_from {
            None if self.selected_device == Some(device) => {
                self.select_device(None)?;
                Ok(Outcome::DeviceSelected(None))
            }
            None => {
                self.select_device(Some(device))?;
                Ok(Outcome::DeviceSelected(Some(device)))
            }
            Some((arrow, start)) if start == device => {
                self.deactivate_arrow_drawing();
                Ok(Outcome::ArrowCancelled(arrow))
            }
            Some(_) => {
                let arrow = self.finish_arrow(device)?;
                Ok(Outcome::ArrowCommitted(arrow))
            }
        }
    }

    fn on_mouse_move(&mut self, point: Point) -> Result<Outcome, DiagramError> {
        if self.mode() != InteractionMode::DrawingArrow {
            return Ok(Outcome::Ignored("no arrow is being drawn"));
        }
        let arrow = self.move_temporary_arrow(point)?;
        Ok(Outcome::ArrowMoved(arrow))
    }

    fn on_hover(&mut self, device: DeviceId) -> Result<Outcome, DiagramError> {
        self.device_ref(device)?;
        self.hovered_device = Some(device);
        if self.mode() != InteractionMode::DrawingArrow {
            self.show_affordance(device)?;
        }
        Ok(Outcome::HoverChanged(Some(device)))
    }

    /// Hides the affordance. The hovered device is kept so the affordance,
    /// which the pointer moves onto when leaving the device, still knows
    /// which device it belongs to.
    fn on_leave(&mut self, device: DeviceId) -> Result<Outcome, DiagramError> {
        self.device_ref(device)?;
        if self.affordance.is_some_and(|affordance| affordance.device() == device) {
            self.hide_affordance();
        }
        Ok(Outcome::HoverChanged(None))
    }

    fn on_quick_add(&mut self) -> Result<Outcome, DiagramError> {
        let Some(device) = self.hovered_device else {
            return Ok(Outcome::Ignored("no device is hovered"));
        };
        match self.mode() {
            InteractionMode::DrawingArrow => Ok(Outcome::Ignored("an arrow is already being drawn")),
            InteractionMode::Idle | InteractionMode::ArmedForArrow => {
                self.activate_arrow_drawing();
                let arrow = self.start_arrow(device)?;
                Ok(Outcome::ArrowStarted(arrow))
            }
        }
    }

    fn on_arrow_click(&mut self, arrow: ArrowId) -> Result<Outcome, DiagramError> {
        if !self.arrows.contains_key(&arrow) {
            return Err(DiagramError::UnknownArrow(arrow));
        }
        let selection = (self.selected_arrow != Some(arrow)).then_some(arrow);
        self.select_arrow(selection)?;
        Ok(Outcome::ArrowSelected(selection))
    }

    fn on_drop(&mut self, template: &PaletteEntry, position: Point) -> Outcome {
        match self.add_device(template, position) {
            Some(device) => Outcome::DeviceAdded(device),
            None => Outcome::Ignored("drop outside the diagram area"),
        }
    }

    fn on_drag_start(&mut self, device: DeviceId) -> Result<Outcome, DiagramError> {
        let dragged = self
            .devices
            .get_mut(&device)
            .ok_or(DiagramError::UnknownDevice(device))?;
        if dragged.set_active(true) {
            self.view.device_activated(device, true);
        }
        self.refresh_affordance(device);
        Ok(Outcome::DragStarted(device))
    }

    /// Ends a drag. A device that is still selected stays active.
    fn on_drag_stop(&mut self, device: DeviceId) -> Result<Outcome, DiagramError> {
        let keep_active = self.selected_device == Some(device);
        let dragged = self
            .devices
            .get_mut(&device)
            .ok_or(DiagramError::UnknownDevice(device))?;
        if dragged.set_active(keep_active) {
            self.view.device_activated(device, keep_active);
        }
        Ok(Outcome::DragStopped(device))
    }

    fn on_resize(&mut self, device: DeviceId, size: Size) -> Result<Outcome, DiagramError> {
        self.resize_device(device, size)?;
        Ok(Outcome::DeviceMoved(device))
    }

    fn on_context_menu(&mut self, device: DeviceId, position: Point) -> Result<Outcome, DiagramError> {
        self.device_ref(device)?;
        self.deactivate_arrow_drawing();
        self.select_device(Some(device))?;
        self.view.context_menu_requested(device, position);
        Ok(Outcome::ContextMenuOpened(device))
    }

    /// Deletes the selected arrow, or the selected device when no arrow is
    /// selected.
    fn delete_selected(&mut self) -> Result<Outcome, DiagramError> {
        if let Some(arrow) = self.selected_arrow {
            self.delete_arrow(arrow)?;
            return Ok(Outcome::ArrowDeleted(arrow));
        }
        if let Some(device) = self.selected_device {
            let arrows_removed = self.delete_device(device)?;
            return Ok(Outcome::DeviceDeleted {
                device,
                arrows_removed,
            });
        }
        Ok(Outcome::Ignored("nothing is selected"))
    }
}
