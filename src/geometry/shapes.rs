//! Procedural shape generators.
//!
//! All shapes are closed, centered on the origin, with counter-clockwise
//! outward-facing polygons.

use std::f32::consts::{PI, TAU};

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::core::types::Vec3;
use super::mesh::{polygon_centroid, polygon_normal, Geometry};

/// Add a polygon of a convex shape centered on the origin, flipping the
/// corner order if it would face inwards.
fn make_outward_polygon(geometry: &mut Geometry, corners: &[u32]) -> u32 {
    let points = geometry.points();
    let normal = polygon_normal(points, corners);
    let centroid = polygon_centroid(points, corners);
    if normal.dot(centroid) < 0.0 {
        let reversed: Vec<u32> = corners.iter().rev().copied().collect();
        geometry.make_polygon(&reversed)
    } else {
        geometry.make_polygon(corners)
    }
}

/// Axis-aligned box with the given full extents
pub fn make_box(x: f32, y: f32, z: f32) -> Geometry {
    let mut g = Geometry::new("box");
    let half = Vec3::new(x, y, z) * 0.5;
    for i in 0..8u32 {
        g.make_point(Vec3::new(
            if i & 1 != 0 { half.x } else { -half.x },
            if i & 2 != 0 { half.y } else { -half.y },
            if i & 4 != 0 { half.z } else { -half.z },
        ));
    }
    g.make_polygon(&[0, 4, 6, 2]); // -X
    g.make_polygon(&[1, 3, 7, 5]); // +X
    g.make_polygon(&[0, 1, 5, 4]); // -Y
    g.make_polygon(&[2, 6, 7, 3]); // +Y
    g.make_polygon(&[0, 2, 3, 1]); // -Z
    g.make_polygon(&[4, 5, 7, 6]); // +Z
    g
}

/// Cube with the given edge length
pub fn make_cube(size: f32) -> Geometry {
    let mut g = make_box(size, size, size);
    g.name = "cube".to_string();
    g
}

/// Regular tetrahedron with the given circumradius
pub fn make_tetrahedron(radius: f32) -> Geometry {
    let mut g = Geometry::new("tetrahedron");
    let s = radius / 3.0_f32.sqrt();
    for p in [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ] {
        g.make_point(p * s);
    }
    for face in [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]] {
        make_outward_polygon(&mut g, &face);
    }
    g
}

/// Regular octahedron with the given circumradius
pub fn make_octahedron(radius: f32) -> Geometry {
    let mut g = Geometry::new("octahedron");
    let px = g.make_point(Vec3::X * radius);
    let nx = g.make_point(-Vec3::X * radius);
    let py = g.make_point(Vec3::Y * radius);
    let ny = g.make_point(-Vec3::Y * radius);
    let pz = g.make_point(Vec3::Z * radius);
    let nz = g.make_point(-Vec3::Z * radius);
    for x in [px, nx] {
        for y in [py, ny] {
            for z in [pz, nz] {
                make_outward_polygon(&mut g, &[x, y, z]);
            }
        }
    }
    g
}

/// Upright prism with regular `sides`-gon caps
pub fn make_prism(sides: u32, radius: f32, height: f32) -> Geometry {
    let sides = sides.max(3);
    let mut g = Geometry::new(format!("prism {}", sides));
    let half = height * 0.5;

    let ring = |y: f32, g: &mut Geometry| -> Vec<u32> {
        (0..sides)
            .map(|i| {
                let phi = TAU * i as f32 / sides as f32;
                g.make_point(Vec3::new(radius * phi.cos(), y, radius * phi.sin()))
            })
            .collect()
    };
    let bottom = ring(-half, &mut g);
    let top = ring(half, &mut g);

    make_outward_polygon(&mut g, &bottom);
    make_outward_polygon(&mut g, &top);
    for i in 0..sides as usize {
        let j = (i + 1) % sides as usize;
        make_outward_polygon(&mut g, &[bottom[i], bottom[j], top[j], top[i]]);
    }
    g
}

/// Lumpy rock: a latitude/longitude sphere displaced by fractal noise.
/// `detail` is the ring count (at least 3).
pub fn make_rock(seed: u32, radius: f32, detail: u32) -> Geometry {
    let rings = detail.max(3);
    let segments = rings * 2;
    let mut g = Geometry::new(format!("rock {}", seed));

    let shape_noise = Fbm::<Perlin>::new(seed)
        .set_octaves(4)
        .set_persistence(0.5)
        .set_lacunarity(2.0);

    let displaced = |direction: Vec3| -> Vec3 {
        let p = direction * 1.5;
        let n = shape_noise.get([p.x as f64, p.y as f64, p.z as f64]) as f32;
        direction * radius * (1.0 + 0.3 * n.clamp(-1.0, 1.0))
    };

    let top = g.make_point(displaced(Vec3::Y));
    let mut ring_points: Vec<Vec<u32>> = Vec::with_capacity(rings as usize - 1);
    for k in 1..rings {
        let theta = PI * k as f32 / rings as f32;
        let ring: Vec<u32> = (0..segments)
            .map(|j| {
                let phi = TAU * j as f32 / segments as f32;
                let direction = Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    theta.sin() * phi.sin(),
                );
                g.make_point(displaced(direction))
            })
            .collect();
        ring_points.push(ring);
    }
    let bottom = g.make_point(displaced(-Vec3::Y));

    let seg = segments as usize;
    let first = &ring_points[0];
    for j in 0..seg {
        g.make_polygon(&[top, first[(j + 1) % seg], first[j]]);
    }
    for pair in ring_points.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..seg {
            let n = (j + 1) % seg;
            g.make_polygon(&[upper[j], upper[n], lower[n], lower[j]]);
        }
    }
    let last = &ring_points[ring_points.len() - 1];
    for j in 0..seg {
        g.make_polygon(&[bottom, last[j], last[(j + 1) % seg]]);
    }
    g
}

/// Flat quad-tiled floor in the XZ plane facing +Y
pub fn make_grid_plane(size: f32, cells: u32) -> Geometry {
    let cells = cells.max(1);
    let mut g = Geometry::new("floor");
    let step = size / cells as f32;
    let origin = -size * 0.5;
    let row = cells + 1;
    for i in 0..=cells {
        for j in 0..=cells {
            g.make_point(Vec3::new(origin + i as f32 * step, 0.0, origin + j as f32 * step));
        }
    }
    for i in 0..cells {
        for j in 0..cells {
            let a = i * row + j;
            let b = i * row + j + 1;
            let c = (i + 1) * row + j + 1;
            let d = (i + 1) * row + j;
            g.make_polygon(&[a, b, c, d]);
        }
    }
    g
}
