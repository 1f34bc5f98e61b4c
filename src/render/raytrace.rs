//! Ray-traceable triangle primitives.
//!
//! Triangles keep a link back to the polygon they came from so that a ray hit can
//! be turned into a hover record on the source geometry.

use crate::core::types::Vec3;
use crate::geometry::Geometry;
use crate::math::{Aabb, Ray};

/// Closest hit against a ray-trace primitive, in the primitive's local space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub t: f32,
    pub triangle: u32,
    pub polygon: u32,
    pub position: Vec3,
    /// Geometric normal of the hit triangle
    pub normal: Vec3,
}

/// Vertex and triangle buffers ready for ray queries
#[derive(Clone, Debug)]
pub struct RaytracePrimitive {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub triangle_polygons: Vec<u32>,
    pub bounds: Aabb,
}

impl RaytracePrimitive {
    /// Triangulate geometry into ray-trace buffers
    pub fn build(geometry: &Geometry) -> Self {
        let triangulation = geometry.triangulate();
        Self {
            name: geometry.name.clone(),
            vertices: geometry.points().to_vec(),
            triangles: triangulation.triangles,
            triangle_polygons: triangulation.polygons,
            bounds: geometry.bounding_box(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Nearest triangle hit along the ray
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        if self.bounds.is_empty() {
            return None;
        }
        // Flat primitives have zero-thickness bounds; pad so the slab test still passes
        let padded = Aabb::new(self.bounds.min - Vec3::splat(1e-4), self.bounds.max + Vec3::splat(1e-4));
        ray.intersects_aabb(&padded)?;

        let mut best: Option<RayHit> = None;
        for (index, &[a, b, c]) in self.triangles.iter().enumerate() {
            let v0 = self.vertices[a as usize];
            let v1 = self.vertices[b as usize];
            let v2 = self.vertices[c as usize];
            let Some(hit) = ray.intersects_triangle(v0, v1, v2) else {
                continue;
            };
            if best.is_some_and(|b| b.t <= hit.t) {
                continue;
            }
            best = Some(RayHit {
                t: hit.t,
                triangle: index as u32,
                polygon: self.triangle_polygons[index],
                position: ray.at(hit.t),
                normal: (v1 - v0).cross(v2 - v0).normalize_or_zero(),
            });
        }
        best
    }
}
