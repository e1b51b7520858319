//! Device templates and per-type registries.
//!
//! The palette lists the device templates a user can drag onto the diagram.
//! The [`DeviceRegistry`] maps device types to the image markup shown when a
//! device is created and to the callback that redraws a device for a new
//! value.

use std::{collections::HashMap, fmt, rc::Rc};

use serde::Deserialize;

use devgraph_core::identifier::Id;

use crate::device::DeviceId;

/// Callback redrawing a device for a new value.
///
/// Receives the device, its value range and the new value. What it draws is
/// entirely up to the callback.
pub type UpdateFn = Rc<dyn Fn(DeviceId, ValueRange, f64)>;

/// Optional lower and upper bound of a device value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ValueRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl ValueRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn min(self) -> Option<f64> {
        self.min
    }

    pub fn max(self) -> Option<f64> {
        self.max
    }
}

/// A draggable device template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaletteEntry {
    device_type: String,
    title: String,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    /// Image markup registered for this type.
    #[serde(default)]
    image: Option<String>,
}

impl PaletteEntry {
    pub fn new(device_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            title: title.into(),
            min: None,
            max: None,
            image: None,
        }
    }

    /// Sets the value range of devices created from this template.
    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.min = range.min;
        self.max = range.max;
        self
    }

    /// Sets the image markup of this template.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Returns the interned device type tag.
    pub fn type_id(&self) -> Id {
        Id::new(&self.device_type)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn range(&self) -> ValueRange {
        ValueRange::new(self.min, self.max)
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// The ordered list of device templates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(vec![
            PaletteEntry::new("sensor", "Sensor")
                .with_range(ValueRange::new(Some(0.0), Some(100.0)))
                .with_image(r#"<svg class="device-sensor" viewBox="0 0 40 40"><circle cx="20" cy="20" r="16"/></svg>"#),
            PaletteEntry::new("machine", "Machine")
                .with_image(r#"<svg class="device-machine" viewBox="0 0 40 40"><rect x="4" y="8" width="32" height="24"/></svg>"#),
            PaletteEntry::new("conveyor", "Conveyor")
                .with_range(ValueRange::new(Some(0.0), Some(5.0)))
                .with_image(r#"<svg class="device-conveyor" viewBox="0 0 40 40"><path d="M4 26 H36"/></svg>"#),
            PaletteEntry::new("valve", "Valve")
                .with_range(ValueRange::new(Some(0.0), Some(1.0)))
                .with_image(r#"<svg class="device-valve" viewBox="0 0 40 40"><path d="M4 10 L36 30 V10 L4 30 Z"/></svg>"#),
        ])
    }
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Looks up a template by device type.
    pub fn get(&self, device_type: &str) -> Option<&PaletteEntry> {
        self.entries
            .iter()
            .find(|entry| entry.device_type == device_type)
    }
}

/// Image and update-function registries keyed by device type.
#[derive(Clone, Default)]
pub struct DeviceRegistry {
    images: HashMap<Id, String>,
    updates: HashMap<Id, UpdateFn>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the images declared by palette entries.
    pub fn from_palette(palette: &Palette) -> Self {
        let images = palette
            .entries()
            .iter()
            .filter_map(|entry| Some((entry.type_id(), entry.image()?.to_string())))
            .collect();
        Self {
            images,
            updates: HashMap::new(),
        }
    }

    /// Registers (or replaces) the image markup for a device type.
    pub fn register_image(&mut self, device_type: &str, markup: impl Into<String>) {
        self.images.insert(Id::new(device_type), markup.into());
    }

    /// Registers (or replaces) the update function for a device type.
    pub fn register_update<F>(&mut self, device_type: &str, update: F)
    where
        F: Fn(DeviceId, ValueRange, f64) + 'static,
    {
        self.updates.insert(Id::new(device_type), Rc::new(update));
    }

    pub fn image(&self, device_type: Id) -> Option<&str> {
        self.images.get(&device_type).map(String::as_str)
    }

    pub fn update(&self, device_type: Id) -> Option<UpdateFn> {
        self.updates.get(&device_type).cloned()
    }
}

impl fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("images", &self.images.keys().collect::<Vec<_>>())
            .field("updates", &self.updates.keys().collect::<Vec<_>>())
            .finish()
    }
}
