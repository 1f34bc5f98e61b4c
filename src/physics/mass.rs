//! Unit-density mass properties backed by parry.

use parry3d::mass_properties::MassProperties as ParryMassProperties;
use parry3d::math::Point;

use crate::core::types::{Mat3, Vec3};

/// Volume, center of mass and unit-density inertia tensor about the center of mass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassProperties {
    pub volume: f32,
    pub center_of_mass: Vec3,
    /// Inertia tensor for density 1, about `center_of_mass`
    pub inertia: Mat3,
}

impl MassProperties {
    pub const ZERO: Self = Self {
        volume: 0.0,
        center_of_mass: Vec3::ZERO,
        inertia: Mat3::ZERO,
    };

    /// Mass properties of a closed convex mesh with outward winding
    pub fn convex_polyhedron(vertices: &[Vec3], triangles: &[[u32; 3]]) -> Self {
        if vertices.is_empty() || triangles.is_empty() {
            return Self::ZERO;
        }
        let points: Vec<Point<f32>> = vertices.iter().map(|v| Point::new(v.x, v.y, v.z)).collect();
        Self::from(ParryMassProperties::from_convex_polyhedron(1.0, &points, triangles))
    }

    /// Inertia tensor for a body of the given total mass
    pub fn inertia_for_mass(&self, mass: f32) -> Mat3 {
        if self.volume <= 0.0 {
            return Mat3::ZERO;
        }
        self.inertia * (mass / self.volume)
    }
}

// At density 1 the mass is the volume
impl From<ParryMassProperties> for MassProperties {
    fn from(props: ParryMassProperties) -> Self {
        let volume = props.mass();
        if !volume.is_finite() || volume <= 0.0 {
            return Self::ZERO;
        }
        let inertia = props.reconstruct_inertia_matrix();
        Self {
            volume,
            center_of_mass: Vec3::new(props.local_com.x, props.local_com.y, props.local_com.z),
            inertia: Mat3::from_cols_slice(inertia.as_slice()),
        }
    }
}
