//! rkedit - brush placement for a 3D scene editor

pub mod core;
pub mod math;
pub mod geometry;
pub mod render;
pub mod physics;
pub mod scene;
pub mod brush;
