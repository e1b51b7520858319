//! Devgraph - An interaction model for wiring devices together with arrows.
//!
//! Users drop typed devices from a palette onto a diagram area, drag them
//! around, and connect them with directed arrows. This crate holds the state
//! of such a diagram and interprets user gestures; rendering is left to a
//! [`DiagramView`](view::DiagramView) implementation supplied by the front
//! end.
//!
//! # Examples
//!
//! ```
//! use devgraph::{
//!     Diagram,
//!     config::AppConfig,
//!     geometry::Point,
//!     gesture::{Gesture, MouseButton, Outcome},
//! };
//!
//! let mut diagram = Diagram::new(AppConfig::default());
//! let sensor = diagram.config().palette().get("sensor").cloned().unwrap();
//! let valve = diagram.config().palette().get("valve").cloned().unwrap();
//!
//! let a = diagram.add_device(&sensor, Point::new(10.0, 10.0)).unwrap();
//! let b = diagram.add_device(&valve, Point::new(400.0, 10.0)).unwrap();
//!
//! diagram.handle(Gesture::ToggleArrowMode).unwrap();
//! for device in [a, b] {
//!     diagram
//!         .handle(Gesture::MouseDown { device, button: MouseButton::Left })
//!         .unwrap();
//! }
//!
//! assert_eq!(diagram.arrow_count(), 1);
//! assert!(diagram.relation_summary(b).unwrap().predecessors().contains(&"Sensor 1".to_string()));
//! ```

pub mod arrow;
pub mod config;
pub mod counter;
pub mod device;
pub mod gesture;
pub mod palette;
pub mod view;

mod diagram;
mod error;

pub use devgraph_core::{geometry, identifier};

pub use diagram::Diagram;
pub use error::{DevgraphError, DiagramError};
