//! Configuration types for devgraph diagrams.
//!
//! This module provides configuration structures that control device
//! geometry, the diagram area and the palette of draggable device
//! templates. All types implement [`serde::Deserialize`] for loading from
//! external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`GeometryConfig`] - Device box size, arrow anchor scale and quick-add affordance size.
//! - [`AreaConfig`] - Size and page offset of the diagram area.
//! - [`Palette`] - The device templates that can be dropped onto the diagram.
//!
//! # Example
//!
//! ```
//! # use devgraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert!(config.palette().get("sensor").is_some());
//! ```

use std::collections::HashSet;

use serde::Deserialize;

use devgraph_core::geometry::{Bounds, Point, Size};

use crate::{error::DevgraphError, palette::Palette};

/// Top-level configuration combining geometry, area and palette settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Device and anchor geometry section.
    #[serde(default)]
    geometry: GeometryConfig,

    /// Diagram area section.
    #[serde(default)]
    area: AreaConfig,

    /// Palette entries (`[[palette]]` tables).
    #[serde(default)]
    palette: Palette,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(geometry: GeometryConfig, area: AreaConfig, palette: Palette) -> Self {
        Self {
            geometry,
            area,
            palette,
        }
    }

    /// Returns the geometry configuration.
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Returns the diagram area configuration.
    pub fn area(&self) -> &AreaConfig {
        &self.area
    }

    /// Returns the palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Checks the configuration for values the diagram cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`DevgraphError::Config`] when a scale or size is not
    /// strictly positive, or when two palette entries share a device type.
    pub fn validate(&self) -> Result<(), DevgraphError> {
        if self.geometry.anchor_scale.is_nan() || self.geometry.anchor_scale <= 0.0 {
            return Err(DevgraphError::Config(format!(
                "anchor_scale must be positive, got {}",
                self.geometry.anchor_scale
            )));
        }
        if !self.geometry.device_size().is_positive() {
            return Err(DevgraphError::Config(
                "device_width and device_height must be positive".to_string(),
            ));
        }
        if !self.geometry.affordance_size().is_positive() {
            return Err(DevgraphError::Config(
                "affordance_width and affordance_height must be positive".to_string(),
            ));
        }
        if !self.area.size().is_positive() {
            return Err(DevgraphError::Config(
                "area width and height must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in self.palette.entries() {
            if !seen.insert(entry.device_type()) {
                return Err(DevgraphError::Config(format!(
                    "palette declares device type `{}` more than once",
                    entry.device_type()
                )));
            }
        }

        Ok(())
    }
}

/// Geometry of devices, arrow anchors and the quick-add affordance.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Factor applied to a device's rendered width and height to obtain the
    /// half extents of the box arrows are anchored on.
    anchor_scale: f32,

    /// Width of a freshly dropped device box.
    device_width: f32,

    /// Height of a freshly dropped device box.
    device_height: f32,

    /// Width of the quick-add arrow button shown on hover.
    affordance_width: f32,

    /// Height of the quick-add arrow button shown on hover.
    affordance_height: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            anchor_scale: 0.58,
            device_width: 120.0,
            device_height: 100.0,
            affordance_width: 24.0,
            affordance_height: 24.0,
        }
    }
}

impl GeometryConfig {
    /// Returns the arrow anchor scale factor.
    pub fn anchor_scale(&self) -> f32 {
        self.anchor_scale
    }

    /// Returns the size given to newly dropped devices.
    pub fn device_size(&self) -> Size {
        Size::new(self.device_width, self.device_height)
    }

    /// Returns the size of the quick-add affordance.
    pub fn affordance_size(&self) -> Size {
        Size::new(self.affordance_width, self.affordance_height)
    }

    /// Returns a copy with a different anchor scale.
    pub fn with_anchor_scale(mut self, anchor_scale: f32) -> Self {
        self.anchor_scale = anchor_scale;
        self
    }

    /// Returns a copy with a different default device size.
    pub fn with_device_size(mut self, size: Size) -> Self {
        self.device_width = size.width();
        self.device_height = size.height();
        self
    }
}

/// The diagram area devices are dropped into and dragged within.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    width: f32,
    height: f32,

    /// Page x coordinate of the area's top-left inner corner.
    origin_x: f32,

    /// Page y coordinate of the area's top-left inner corner.
    origin_y: f32,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl AreaConfig {
    /// Creates an area of the given size with its origin at the page origin.
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width(),
            height: size.height(),
            ..Self::default()
        }
    }

    /// Returns a copy with a different page origin.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin_x = origin.x();
        self.origin_y = origin.y();
        self
    }

    /// Returns the area size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the page position of the area's top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Returns the area bounds in diagram-relative coordinates.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(Point::default(), self.size())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_approx_eq!(f32, config.geometry().anchor_scale(), 0.58);
        assert!(!config.palette().entries().is_empty());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [geometry]
            anchor_scale = 0.5

            [area]
            width = 400.0
            "#,
        )
        .expect("valid config");

        assert_approx_eq!(f32, config.geometry().anchor_scale(), 0.5);
        assert_eq!(config.geometry().device_size(), Size::new(120.0, 100.0));
        assert_eq!(config.area().size(), Size::new(400.0, 700.0));
        assert!(config.palette().get("machine").is_some());
    }

    #[test]
    fn test_palette_from_toml_replaces_builtin() {
        let config: AppConfig = toml::from_str(
            r#"
            [[palette]]
            device_type = "pump"
            title = "Pump"
            min = 0.0
            max = 10.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.palette().entries().len(), 1);
        let pump = config.palette().get("pump").expect("pump entry");
        assert_eq!(pump.title(), "Pump");
        assert_eq!(pump.range().max(), Some(10.0));
        assert!(config.palette().get("sensor").is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AppConfig::new(
            GeometryConfig::default().with_anchor_scale(0.0),
            AreaConfig::default(),
            Palette::default(),
        );
        assert!(matches!(config.validate(), Err(DevgraphError::Config(_))));

        let config = AppConfig::new(
            GeometryConfig::default(),
            AreaConfig::new(Size::new(0.0, 10.0)),
            Palette::default(),
        );
        assert!(matches!(config.validate(), Err(DevgraphError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_palette_types() {
        let config: AppConfig = toml::from_str(
            r#"
            [[palette]]
            device_type = "pump"
            title = "Pump"

            [[palette]]
            device_type = "pump"
            title = "Other pump"
            "#,
        )
        .expect("valid toml");

        let err = config.validate().expect_err("duplicate types");
        assert!(err.to_string().contains("pump"));
    }
}
