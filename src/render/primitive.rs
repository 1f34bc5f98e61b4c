//! Renderable triangle primitives.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::geometry::Geometry;
use crate::math::Aabb;

/// How vertex normals are generated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalStyle {
    /// Smoothed per corner across polygons within the crease angle
    CornerNormals,
    /// Flat, one normal per polygon
    #[default]
    PolygonNormals,
    /// Smoothed per point across all polygons using the point
    PointNormals,
}

/// Parameters for building a primitive
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveBuildInfo {
    pub normal_style: NormalStyle,
    /// Corner normals only smooth across polygons closer than this angle
    pub crease_angle_degrees: f32,
}

impl Default for PrimitiveBuildInfo {
    fn default() -> Self {
        Self {
            normal_style: NormalStyle::PolygonNormals,
            crease_angle_degrees: 45.0,
        }
    }
}

impl PrimitiveBuildInfo {
    pub fn with_normal_style(normal_style: NormalStyle) -> Self {
        Self {
            normal_style,
            ..Default::default()
        }
    }
}

/// GPU vertex layout
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle list with one vertex per polygon corner.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Source polygon of each triangle
    pub triangle_polygons: Vec<u32>,
    pub bounding_box: Aabb,
    pub normal_style: NormalStyle,
}

impl Primitive {
    /// Build a primitive from geometry
    pub fn build(geometry: &Geometry, build_info: &PrimitiveBuildInfo) -> Self {
        let polygon_normals: Vec<Vec3> = match geometry.polygon_attributes() {
            Some(attributes) => attributes.normals.to_vec(),
            None => (0..geometry.polygon_count())
                .map(|p| geometry.compute_polygon_normal(p))
                .collect(),
        };

        let point_polygons = point_polygons(geometry);
        let point_normals: Vec<Vec3> = if build_info.normal_style == NormalStyle::PointNormals {
            point_polygons
                .iter()
                .map(|polys| {
                    polys
                        .iter()
                        .map(|&p| polygon_normals[p as usize])
                        .sum::<Vec3>()
                        .normalize_or_zero()
                })
                .collect()
        } else {
            Vec::new()
        };
        let crease_cos = build_info.crease_angle_degrees.to_radians().cos();

        let mut vertices = Vec::with_capacity(geometry.corner_total() as usize);
        let mut indices = Vec::new();
        let mut triangle_polygons = Vec::new();

        for polygon in 0..geometry.polygon_count() {
            let corners = geometry.polygon_corners(polygon);
            let polygon_normal = polygon_normals[polygon as usize];
            let base = vertices.len() as u32;

            for &point in corners {
                let normal = match build_info.normal_style {
                    NormalStyle::PolygonNormals => polygon_normal,
                    NormalStyle::PointNormals => point_normals[point as usize],
                    NormalStyle::CornerNormals => point_polygons[point as usize]
                        .iter()
                        .map(|&p| polygon_normals[p as usize])
                        .filter(|n| n.dot(polygon_normal) >= crease_cos)
                        .sum::<Vec3>()
                        .normalize_or_zero(),
                };
                vertices.push(Vertex {
                    position: geometry.point_position(point).to_array(),
                    normal: normal.to_array(),
                });
            }

            for i in 1..corners.len().saturating_sub(1) as u32 {
                indices.extend_from_slice(&[base, base + i, base + i + 1]);
                triangle_polygons.push(polygon);
            }
        }

        Self {
            name: geometry.name.clone(),
            vertices,
            indices,
            triangle_polygons,
            bounding_box: geometry.bounding_box(),
            normal_style: build_info.normal_style,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Polygons using each point
fn point_polygons(geometry: &Geometry) -> Vec<Vec<u32>> {
    let mut out = vec![Vec::new(); geometry.point_count() as usize];
    for polygon in 0..geometry.polygon_count() {
        for &point in geometry.polygon_corners(polygon) {
            out[point as usize].push(polygon);
        }
    }
    out
}
