//! Polygon-anchored coordinate frames used to align two meshes face to face.

use glam::{Mat4, Vec3};

use crate::geometry::Geometry;

/// Oriented basis anchored at one polygon of a geometry.
///
/// `n` is the polygon normal, `t` points from the centroid towards the midpoint of
/// the edge that starts at the anchor corner, and `b = n × t`. The three vectors
/// are kept orthonormal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceFrame {
    pub centroid: Vec3,
    /// Anchor corner position
    pub position: Vec3,
    pub b: Vec3,
    pub t: Vec3,
    pub n: Vec3,
    pub polygon: u32,
    pub corner_count: u32,
    pub face_offset: u32,
    pub corner_offset: u32,
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self {
            centroid: Vec3::ZERO,
            position: Vec3::ZERO,
            b: Vec3::NEG_Z,
            t: Vec3::X,
            n: Vec3::Y,
            polygon: 0,
            corner_count: 0,
            face_offset: 0,
            corner_offset: 0,
        }
    }
}

impl ReferenceFrame {
    /// Build the frame of `polygon`, anchored at corner `corner_offset` (wrapping).
    ///
    /// Out of range polygon ids are clamped. Empty geometry or a polygon without
    /// corners yields a default frame and a warning.
    pub fn new(geometry: &Geometry, polygon: u32, face_offset: u32, corner_offset: u32) -> Self {
        let polygon_count = geometry.polygon_count();
        if polygon_count == 0 {
            log::warn!("Reference frame requested on {} which has no polygons", geometry.name);
            return Self {
                face_offset,
                corner_offset,
                ..Default::default()
            };
        }
        if polygon >= polygon_count {
            log::warn!(
                "Polygon {} out of range for {} ({} polygons), clamping",
                polygon,
                geometry.name,
                polygon_count
            );
        }
        let polygon = polygon.min(polygon_count - 1);

        let corner_count = geometry.corner_count(polygon);
        if corner_count == 0 {
            log::warn!("Polygon {} of {} has no corners", polygon, geometry.name);
            return Self {
                polygon,
                face_offset,
                corner_offset,
                ..Default::default()
            };
        }
        let corner_offset = corner_offset % corner_count;

        let (centroid, normal) = match geometry.polygon_attributes() {
            Some(attributes) if (polygon as usize) < attributes.centroids.len() => (
                attributes.centroids[polygon as usize],
                attributes.normals[polygon as usize],
            ),
            _ => (
                geometry.compute_polygon_centroid(polygon),
                geometry.compute_polygon_normal(polygon),
            ),
        };

        let corners = geometry.polygon_corners(polygon);
        let position = geometry.point_position(corners[corner_offset as usize]);
        let midpoint = geometry.polygon_edge_midpoint(polygon, corner_offset);

        let mut frame = Self {
            centroid,
            position,
            b: Vec3::ZERO,
            t: (midpoint - centroid).normalize_or_zero(),
            n: normal,
            polygon,
            corner_count,
            face_offset,
            corner_offset,
        };
        frame.orthonormalize();
        frame
    }

    /// Distance from the centroid to the anchor corner
    pub fn scale(&self) -> f32 {
        self.centroid.distance(self.position)
    }

    /// Apply an affine transform and restore orthonormality.
    pub fn transform_by(&mut self, matrix: &Mat4) {
        self.centroid = matrix.transform_point3(self.centroid);
        self.position = matrix.transform_point3(self.position);
        self.b = matrix.transform_vector3(self.b);
        self.t = matrix.transform_vector3(self.t);
        self.n = matrix.transform_vector3(self.n);
        self.orthonormalize();
    }

    /// Frame to parent matrix with columns `{B, T, N, centroid}`.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols(
            self.b.extend(0.0),
            self.t.extend(0.0),
            self.n.extend(0.0),
            self.centroid.extend(1.0),
        )
    }

    // B = N×T, N = T×B, T = B×N, in that order.
    // Degenerate inputs fall back to an arbitrary perpendicular so nothing goes NaN.
    fn orthonormalize(&mut self) {
        let n = self.n.try_normalize().unwrap_or(Vec3::Y);
        let mut t = self.t;
        if n.cross(t).length_squared() < 1e-12 {
            t = n.any_orthonormal_vector();
        }
        let b = n.cross(t).normalize();
        let n = t.cross(b).normalize();
        let t = b.cross(n).normalize();
        self.b = b;
        self.n = n;
        self.t = t;
    }
}
