//! Collision shapes and rigid body mass properties
//!
//! Only what brushes need from a physics backend: shapes that can answer a
//! convexity query and turn a mass into a local inertia tensor.

pub mod convex_hull;
pub mod mass;
pub mod shape;

pub use convex_hull::ConvexHullShape;
pub use mass::MassProperties;
pub use shape::{
    BoxShape, CollisionShape, PhysicsAttachment, ShapeGenerator, SphereShape,
    UniformScaledShape, VolumeCalculator,
};
