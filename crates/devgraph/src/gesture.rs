//! User gestures and their outcomes.
//!
//! Front ends translate raw input (mouse, keyboard, drag and drop) into a
//! [`Gesture`] and hand it to [`Diagram::handle`](crate::Diagram::handle),
//! which interprets it according to the current [`InteractionMode`] and
//! reports what happened as an [`Outcome`].

use std::fmt;

use devgraph_core::geometry::{Point, Size};

use crate::{arrow::ArrowId, device::DeviceId, palette::PaletteEntry};

/// Arrow-drawing state of the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Device clicks select devices.
    #[default]
    Idle,
    /// Arrow drawing is on; the next device click picks the start device.
    ArmedForArrow,
    /// A temporary arrow leaves the start device and follows the cursor.
    DrawingArrow,
}

impl InteractionMode {
    /// Returns true if device clicks are interpreted as arrow endpoints.
    pub fn is_arrow_mode(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ArmedForArrow => "armed for arrow",
            Self::DrawingArrow => "drawing arrow",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// Keys the diagram reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Delete,
}

impl Key {
    /// Parses a key name: a single character, or `Delete` (also `Del`,
    /// `Entf`), case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Self::Char(c)),
            _ if ["delete", "del", "entf"]
                .iter()
                .any(|alias| name.eq_ignore_ascii_case(alias)) =>
            {
                Some(Self::Delete)
            }
            _ => None,
        }
    }
}

/// A user gesture delivered to the diagram.
///
/// All positions are relative to the diagram area's top-left corner; use
/// [`Diagram::relative_coordinates`](crate::Diagram::relative_coordinates)
/// to convert page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Click on the arrow button.
    ToggleArrowMode,
    KeyPress(Key),
    MouseDown {
        device: DeviceId,
        button: MouseButton,
    },
    MouseUp {
        device: DeviceId,
    },
    MouseMove(Point),
    HoverDevice(DeviceId),
    LeaveDevice(DeviceId),
    /// Click on the quick-add arrow button of the hovered device.
    QuickAddArrow,
    ArrowClick(ArrowId),
    /// A palette template released over the diagram; `position` is the
    /// top-left corner of the dragged helper.
    Drop {
        template: PaletteEntry,
        position: Point,
    },
    DragStart(DeviceId),
    Drag {
        device: DeviceId,
        position: Point,
    },
    DragStop(DeviceId),
    /// The rendered size of a device changed.
    Resize {
        device: DeviceId,
        size: Size,
    },
    ContextMenu {
        device: DeviceId,
        position: Point,
    },
    /// Delete key or the context menu's delete entry.
    DeleteSelected,
}

/// What a handled gesture did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    ModeChanged(InteractionMode),
    DeviceSelected(Option<DeviceId>),
    ArrowSelected(Option<ArrowId>),
    ArrowStarted(ArrowId),
    ArrowMoved(ArrowId),
    ArrowCommitted(ArrowId),
    ArrowCancelled(ArrowId),
    DeviceAdded(DeviceId),
    DeviceMoved(DeviceId),
    DragStarted(DeviceId),
    DragStopped(DeviceId),
    DeviceDeleted {
        device: DeviceId,
        arrows_removed: usize,
    },
    ArrowDeleted(ArrowId),
    HoverChanged(Option<DeviceId>),
    ContextMenuOpened(DeviceId),
    /// The gesture has no effect in the current state.
    Ignored(&'static str),
    /// The gesture asked for a transition that is not allowed; the diagram
    /// is unchanged.
    Rejected(String),
}
