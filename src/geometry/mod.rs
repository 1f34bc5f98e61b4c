//! Polygon mesh geometry
//!
//! The geometry provider used by brushes: points, polygons and corners, optional
//! cached per-polygon attributes, and procedural shape generators.

pub mod mesh;
pub mod shapes;

pub use mesh::{
    edge_midpoint, polygon_centroid, polygon_normal, Geometry, Polygon, PolygonAttributes,
    Triangulation,
};
