//! Polygon mesh with optional per-polygon attribute cache.

use crate::core::types::{Mat4, Vec3};
use crate::math::Aabb;

/// A polygon: a contiguous run of corners in the geometry's corner list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Polygon {
    pub first_corner: u32,
    pub corner_count: u32,
}

/// Borrowed view of cached per-polygon attributes.
#[derive(Clone, Copy, Debug)]
pub struct PolygonAttributes<'a> {
    pub centroids: &'a [Vec3],
    pub normals: &'a [Vec3],
}

/// Fan triangulation of all polygons.
#[derive(Clone, Debug, Default)]
pub struct Triangulation {
    /// Point indices of each triangle
    pub triangles: Vec<[u32; 3]>,
    /// Source polygon of each triangle
    pub polygons: Vec<u32>,
}

/// Polygon mesh.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub name: String,
    points: Vec<Vec3>,
    polygons: Vec<Polygon>,
    /// Point referenced by each corner
    corner_points: Vec<u32>,
    attributes: Option<CachedAttributes>,
}

#[derive(Clone, Debug)]
struct CachedAttributes {
    centroids: Vec<Vec3>,
    normals: Vec<Vec3>,
}

/// Average of the corner positions. Zero for an empty corner list.
pub fn polygon_centroid(points: &[Vec3], corners: &[u32]) -> Vec3 {
    if corners.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = corners.iter().map(|&p| points[p as usize]).sum();
    sum / corners.len() as f32
}

/// Unit polygon normal by Newell's method, counter-clockwise winding.
/// Zero for degenerate polygons.
pub fn polygon_normal(points: &[Vec3], corners: &[u32]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, &a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        let pa = points[a as usize];
        let pb = points[b as usize];
        normal.x += (pa.y - pb.y) * (pa.z + pb.z);
        normal.y += (pa.z - pb.z) * (pa.x + pb.x);
        normal.z += (pa.x - pb.x) * (pa.y + pb.y);
    }
    normal.normalize_or_zero()
}

/// Midpoint of the edge from corner `corner_offset` to the next corner (wrapping).
pub fn edge_midpoint(points: &[Vec3], corners: &[u32], corner_offset: u32) -> Vec3 {
    if corners.is_empty() {
        return Vec3::ZERO;
    }
    let count = corners.len();
    let i = corner_offset as usize % count;
    let a = points[corners[i] as usize];
    let b = points[corners[(i + 1) % count] as usize];
    (a + b) * 0.5
}

impl Geometry {
    /// Create an empty geometry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a point, returning its id
    pub fn make_point(&mut self, position: Vec3) -> u32 {
        let id = self.points.len() as u32;
        self.points.push(position);
        id
    }

    /// Add a polygon over existing points, returning its id.
    /// Invalidates cached polygon attributes.
    ///
    /// # Panics
    /// If any point id is not a point of this geometry.
    pub fn make_polygon(&mut self, points: &[u32]) -> u32 {
        if let Some(bad) = points.iter().find(|&&p| p as usize >= self.points.len()) {
            panic!(
                "polygon on {} uses point {} but there are only {} points",
                self.name,
                bad,
                self.points.len()
            );
        }
        let id = self.polygons.len() as u32;
        self.polygons.push(Polygon {
            first_corner: self.corner_points.len() as u32,
            corner_count: points.len() as u32,
        });
        self.corner_points.extend_from_slice(points);
        self.attributes = None;
        id
    }

    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    pub fn polygon_count(&self) -> u32 {
        self.polygons.len() as u32
    }

    pub fn corner_total(&self) -> u32 {
        self.corner_points.len() as u32
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Corner count of a polygon, 0 if out of range
    pub fn corner_count(&self, polygon: u32) -> u32 {
        self.polygons
            .get(polygon as usize)
            .map(|p| p.corner_count)
            .unwrap_or(0)
    }

    /// Point ids of a polygon's corners, empty if out of range
    pub fn polygon_corners(&self, polygon: u32) -> &[u32] {
        match self.polygons.get(polygon as usize) {
            Some(p) => {
                let start = p.first_corner as usize;
                &self.corner_points[start..start + p.corner_count as usize]
            }
            None => &[],
        }
    }

    pub fn point_position(&self, point: u32) -> Vec3 {
        self.points[point as usize]
    }

    /// Cached centroids and normals, if computed
    pub fn polygon_attributes(&self) -> Option<PolygonAttributes<'_>> {
        self.attributes.as_ref().map(|a| PolygonAttributes {
            centroids: &a.centroids,
            normals: &a.normals,
        })
    }

    /// Fill the per-polygon centroid and normal cache
    pub fn compute_polygon_attributes(&mut self) {
        let (centroids, normals) = (0..self.polygon_count())
            .map(|p| (self.compute_polygon_centroid(p), self.compute_polygon_normal(p)))
            .unzip();
        self.attributes = Some(CachedAttributes { centroids, normals });
    }

    pub fn compute_polygon_centroid(&self, polygon: u32) -> Vec3 {
        polygon_centroid(&self.points, self.polygon_corners(polygon))
    }

    pub fn compute_polygon_normal(&self, polygon: u32) -> Vec3 {
        polygon_normal(&self.points, self.polygon_corners(polygon))
    }

    pub fn polygon_edge_midpoint(&self, polygon: u32, corner_offset: u32) -> Vec3 {
        edge_midpoint(&self.points, self.polygon_corners(polygon), corner_offset)
    }

    /// Copy with all points transformed. Cached attributes are recomputed on the
    /// copy when this geometry had them.
    pub fn transformed(&self, transform: &Mat4, name: impl Into<String>) -> Geometry {
        let mut geometry = Geometry {
            name: name.into(),
            points: self.points.iter().map(|p| transform.transform_point3(*p)).collect(),
            polygons: self.polygons.clone(),
            corner_points: self.corner_points.clone(),
            attributes: None,
        };
        if self.attributes.is_some() {
            geometry.compute_polygon_attributes();
        }
        geometry
    }

    /// Uniformly scaled copy, named after the scale factor
    pub fn scaled(&self, scale: f32) -> Geometry {
        self.transformed(
            &Mat4::from_scale(Vec3::splat(scale)),
            format!("{} scaled by {}", self.name, scale),
        )
    }

    /// Fan triangulation of every polygon with at least 3 corners
    pub fn triangulate(&self) -> Triangulation {
        let mut out = Triangulation::default();
        for polygon in 0..self.polygon_count() {
            let corners = self.polygon_corners(polygon);
            for i in 1..corners.len().saturating_sub(1) {
                out.triangles.push([corners[0], corners[i], corners[i + 1]]);
                out.polygons.push(polygon);
            }
        }
        out
    }

    /// Enclosed volume by the divergence theorem.
    /// Only meaningful for closed, outward-wound meshes.
    pub fn volume(&self) -> f32 {
        let mut six_volume = 0.0;
        for [a, b, c] in self.triangulate().triangles {
            let pa = self.points[a as usize];
            let pb = self.points[b as usize];
            let pc = self.points[c as usize];
            six_volume += pa.dot(pb.cross(pc));
        }
        six_volume / 6.0
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.points.iter().copied())
    }
}
