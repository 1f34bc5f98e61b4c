//! Brushes: reusable mesh templates and the tool that places them.
//!
//! A [`Brush`] owns a unit-scale geometry and lazily derives everything an
//! instance needs at any uniform scale. [`Brushes`] aligns a brush polygon with
//! a hovered polygon and commits the result as an undoable scene insert.

pub mod config;
pub mod data;
pub mod library;
pub mod placement;
pub mod reference_frame;
pub mod template;

pub use config::BrushesConfig;
pub use data::{BrushCreateInfo, BrushData, GeometryGenerator, GeometrySource};
pub use library::BrushLibrary;
pub use placement::{BrushPlacement, Brushes, PlacementState};
pub use reference_frame::ReferenceFrame;
pub use template::{key_scale, scale_key, Brush, InstanceCreateInfo, Scaled, MAX_SCALE, SCALE_KEY_FACTOR};
