//! Convex hull collision shape synthesized from a point cloud.

use parry3d::math::Point;

use crate::core::types::{Mat3, Vec3};
use crate::math::Aabb;
use super::mass::MassProperties;
use super::shape::CollisionShape;

/// Convex hull of a point cloud
#[derive(Clone, Debug)]
pub struct ConvexHullShape {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    mass_properties: MassProperties,
}

impl ConvexHullShape {
    /// Build the hull of `points`.
    ///
    /// Returns `None` when the points do not span a volume (fewer than four
    /// non-coplanar points).
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        if !spans_volume(points) {
            log::warn!(
                "Convex hull needs 4 non-coplanar points, got {} degenerate points",
                points.len()
            );
            return None;
        }

        let input: Vec<Point<f32>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
        let (hull_points, triangles) = parry3d::transformation::convex_hull(&input);
        if triangles.is_empty() {
            log::warn!("Convex hull of {} points produced no faces", points.len());
            return None;
        }

        let vertices: Vec<Vec3> = hull_points.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect();
        let mass_properties = MassProperties::convex_polyhedron(&vertices, &triangles);
        if mass_properties.volume <= 0.0 {
            log::warn!("Convex hull of {} points has no volume", points.len());
            return None;
        }

        log::debug!(
            "Convex hull: {} input points, {} hull vertices, volume {}",
            points.len(),
            vertices.len(),
            mass_properties.volume
        );

        Some(Self {
            vertices,
            triangles,
            mass_properties,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn center_of_mass(&self) -> Vec3 {
        self.mass_properties.center_of_mass
    }
}

impl CollisionShape for ConvexHullShape {
    fn is_convex(&self) -> bool {
        true
    }

    fn volume(&self) -> f32 {
        self.mass_properties.volume
    }

    fn local_inertia(&self, mass: f32) -> Mat3 {
        self.mass_properties.inertia_for_mass(mass)
    }

    fn describe(&self) -> String {
        format!("convex hull ({} vertices)", self.vertices.len())
    }
}

/// True if the points contain four that are not coplanar
fn spans_volume(points: &[Vec3]) -> bool {
    let Some(&p0) = points.first() else {
        return false;
    };
    let extent = Aabb::from_points(points.iter().copied()).size().max_element();
    if extent <= 0.0 {
        return false;
    }
    let epsilon = extent * 1e-4;

    let Some(&p1) = points.iter().find(|p| p.distance(p0) > epsilon) else {
        return false;
    };
    let direction = (p1 - p0).normalize();
    let Some(normal) = points
        .iter()
        .map(|p| direction.cross(*p - p0))
        .find(|c| c.length() > epsilon)
    else {
        return false;
    };
    let normal = normal.normalize();
    points.iter().any(|p| normal.dot(*p - p0).abs() > epsilon)
}
