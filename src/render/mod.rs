//! Renderable and ray-traceable mesh data built from geometry

pub mod material;
pub mod primitive;
pub mod raytrace;

pub use material::{Material, MaterialId};
pub use primitive::{NormalStyle, Primitive, PrimitiveBuildInfo, Vertex};
pub use raytrace::{RayHit, RaytracePrimitive};
