//! Gesture sessions.
//!
//! A session is a TOML file with one `[[gesture]]` table per user gesture,
//! replayed in order against a fresh diagram:
//!
//! ```toml
//! [[gesture]]
//! kind = "drop"
//! device_type = "sensor"
//! x = 50.0
//! y = 50.0
//!
//! [[gesture]]
//! kind = "mouse_down"
//! device = "Sensor 1"
//! ```
//!
//! Devices are referred to by title and arrows by the titles of their start
//! and end devices. Positions are page coordinates.

use std::ops::Range;

use log::{debug, info};
use serde::Deserialize;
use toml::Spanned;

use devgraph::{
    DevgraphError, Diagram,
    arrow::ArrowId,
    device::DeviceId,
    geometry::{Point, Size},
    gesture::{Gesture, Key, MouseButton, Outcome},
    view::DiagramView,
};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Button {
    #[default]
    Left,
    Middle,
    Right,
}

impl From<Button> for MouseButton {
    fn from(button: Button) -> Self {
        match button {
            Button::Left => MouseButton::Left,
            Button::Middle => MouseButton::Middle,
            Button::Right => MouseButton::Right,
        }
    }
}

/// One `[[gesture]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Step {
    Drop {
        device_type: String,
        x: f32,
        y: f32,
    },
    MouseDown {
        device: String,
        #[serde(default)]
        button: Button,
    },
    MouseUp {
        device: String,
    },
    MouseMove {
        x: f32,
        y: f32,
    },
    ToggleArrowMode,
    Key {
        key: String,
    },
    Hover {
        device: String,
    },
    Leave {
        device: String,
    },
    QuickAdd,
    ArrowClick {
        from: String,
        to: String,
    },
    DragStart {
        device: String,
    },
    Drag {
        device: String,
        x: f32,
        y: f32,
    },
    DragStop {
        device: String,
    },
    Resize {
        device: String,
        width: f32,
        height: f32,
    },
    ContextMenu {
        device: String,
        x: f32,
        y: f32,
    },
    DeleteSelected,
    SetValue {
        device: String,
        value: f64,
    },
}

#[derive(Debug, Deserialize)]
struct SessionFile {
    #[serde(default, rename = "gesture")]
    gestures: Vec<Spanned<Step>>,
}

/// Tally of how the replayed gestures were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub ignored: usize,
    pub rejected: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Ignored(_) => self.ignored += 1,
            Outcome::Rejected(_) => self.rejected += 1,
            _ => self.applied += 1,
        }
    }
}

/// A parsed gesture session.
#[derive(Debug)]
pub struct Session {
    source: String,
    gestures: Vec<Spanned<Step>>,
}

impl Session {
    /// Parses a session file.
    ///
    /// # Errors
    ///
    /// Returns [`DevgraphError::Session`] pointing at the offending input when
    /// the TOML is malformed or a gesture table is invalid.
    pub fn parse(source: &str) -> Result<Self, DevgraphError> {
        let file: SessionFile = toml::from_str(source).map_err(|err| {
            DevgraphError::new_session_error(err.message(), source, err.span())
        })?;
        debug!(gestures = file.gestures.len(); "Session parsed");

        Ok(Self {
            source: source.to_string(),
            gestures: file.gestures,
        })
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    /// Replays every gesture against `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`DevgraphError::Session`] when a gesture names a device,
    /// arrow, device type or key that does not exist at that point of the
    /// session.
    pub fn replay<V: DiagramView>(
        &self,
        diagram: &mut Diagram<V>,
    ) -> Result<ReplaySummary, DevgraphError> {
        let mut summary = ReplaySummary::default();

        for (index, step) in self.gestures.iter().enumerate() {
            let span = step.span();
            let step = step.get_ref();

            let outcome = match step {
                Step::SetValue { device, value } => {
                    let id = self.device(diagram, device, &span)?;
                    diagram.update_device(id, *value)?;
                    summary.applied += 1;
                    continue;
                }
                _ => {
                    let gesture = self.to_gesture(diagram, step, &span)?;
                    diagram.handle(gesture)?
                }
            };

            debug!(index = index, outcome:? = outcome; "Gesture replayed");
            summary.record(&outcome);
        }

        info!(
            applied = summary.applied,
            ignored = summary.ignored,
            rejected = summary.rejected;
            "Session replayed"
        );
        Ok(summary)
    }

    fn to_gesture<V: DiagramView>(
        &self,
        diagram: &Diagram<V>,
        step: &Step,
        span: &Range<usize>,
    ) -> Result<Gesture, DevgraphError> {
        let page = |x: f32, y: f32| diagram.relative_coordinates(Point::new(x, y));

        let gesture = match step {
            Step::Drop { device_type, x, y } => {
                let template = diagram.config().palette().get(device_type).ok_or_else(|| {
                    self.error(format!("unknown device type `{device_type}`"), span)
                })?;
                Gesture::Drop {
                    template: template.clone(),
                    position: page(*x, *y),
                }
            }
            Step::MouseDown { device, button } => Gesture::MouseDown {
                device: self.device(diagram, device, span)?,
                button: (*button).into(),
            },
            Step::MouseUp { device } => Gesture::MouseUp {
                device: self.device(diagram, device, span)?,
            },
            Step::MouseMove { x, y } => Gesture::MouseMove(page(*x, *y)),
            Step::ToggleArrowMode => Gesture::ToggleArrowMode,
            Step::Key { key } => Gesture::KeyPress(
                Key::from_name(key).ok_or_else(|| self.error(format!("unknown key `{key}`"), span))?,
            ),
            Step::Hover { device } => Gesture::HoverDevice(self.device(diagram, device, span)?),
            Step::Leave { device } => Gesture::LeaveDevice(self.device(diagram, device, span)?),
            Step::QuickAdd => Gesture::QuickAddArrow,
            Step::ArrowClick { from, to } => {
                Gesture::ArrowClick(self.arrow(diagram, from, to, span)?)
            }
            Step::DragStart { device } => Gesture::DragStart(self.device(diagram, device, span)?),
            Step::Drag { device, x, y } => Gesture::Drag {
                device: self.device(diagram, device, span)?,
                position: page(*x, *y),
            },
            Step::DragStop { device } => Gesture::DragStop(self.device(diagram, device, span)?),
            Step::Resize {
                device,
                width,
                height,
            } => Gesture::Resize {
                device: self.device(diagram, device, span)?,
                size: Size::new(*width, *height),
            },
            Step::ContextMenu { device, x, y } => Gesture::ContextMenu {
                device: self.device(diagram, device, span)?,
                position: page(*x, *y),
            },
            Step::DeleteSelected => Gesture::DeleteSelected,
            Step::SetValue { .. } => {
                return Err(self.error("set_value is not a gesture", span));
            }
        };
        Ok(gesture)
    }

    fn device<V: DiagramView>(
        &self,
        diagram: &Diagram<V>,
        title: &str,
        span: &Range<usize>,
    ) -> Result<DeviceId, DevgraphError> {
        diagram
            .devices()
            .find(|device| device.title() == title)
            .map(|device| device.id())
            .ok_or_else(|| self.error(format!("no device titled `{title}`"), span))
    }

    fn arrow<V: DiagramView>(
        &self,
        diagram: &Diagram<V>,
        from: &str,
        to: &str,
        span: &Range<usize>,
    ) -> Result<ArrowId, DevgraphError> {
        let start = self.device(diagram, from, span)?;
        let end = self.device(diagram, to, span)?;
        diagram
            .arrows()
            .find(|arrow| arrow.start() == start && arrow.end_device() == Some(end))
            .map(|arrow| arrow.id())
            .ok_or_else(|| self.error(format!("no arrow from `{from}` to `{to}`"), span))
    }

    fn error(&self, message: impl Into<String>, span: &Range<usize>) -> DevgraphError {
        DevgraphError::new_session_error(message, self.source.as_str(), Some(span.clone()))
    }
}
