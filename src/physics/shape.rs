//! Collision shape trait and the analytic shapes.

use std::fmt;
use std::sync::Arc;

use parry3d::math::Vector;
use parry3d::shape::{Ball, Cuboid, Shape};

use super::mass::MassProperties;
use crate::core::types::{Mat3, Vec3};

/// A collision shape as seen by brushes.
pub trait CollisionShape: Send + Sync + fmt::Debug {
    fn is_convex(&self) -> bool;

    /// Enclosed volume in local units
    fn volume(&self) -> f32;

    /// Inertia tensor about the center of mass for a body of the given mass
    fn local_inertia(&self, mass: f32) -> Mat3;

    /// Short human readable description for logs
    fn describe(&self) -> String;
}

/// Produces a collision shape already sized for the given scale
pub type ShapeGenerator = Arc<dyn Fn(f32) -> Arc<dyn CollisionShape> + Send + Sync>;

/// Computes the physical volume of a brush at the given scale
pub type VolumeCalculator = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// Solid box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    cuboid: Cuboid,
}

impl BoxShape {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            cuboid: Cuboid::new(Vector::new(half_extents.x, half_extents.y, half_extents.z)),
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        let h = self.cuboid.half_extents;
        Vec3::new(h.x, h.y, h.z)
    }
}

impl CollisionShape for BoxShape {
    fn is_convex(&self) -> bool {
        true
    }

    fn volume(&self) -> f32 {
        MassProperties::from(self.cuboid.mass_properties(1.0)).volume
    }

    fn local_inertia(&self, mass: f32) -> Mat3 {
        MassProperties::from(self.cuboid.mass_properties(1.0)).inertia_for_mass(mass)
    }

    fn describe(&self) -> String {
        format!("box {:?}", self.half_extents())
    }
}

/// Solid sphere
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereShape {
    ball: Ball,
}

impl SphereShape {
    pub fn new(radius: f32) -> Self {
        Self { ball: Ball::new(radius) }
    }

    pub fn radius(&self) -> f32 {
        self.ball.radius
    }
}

impl CollisionShape for SphereShape {
    fn is_convex(&self) -> bool {
        true
    }

    fn volume(&self) -> f32 {
        MassProperties::from(self.ball.mass_properties(1.0)).volume
    }

    fn local_inertia(&self, mass: f32) -> Mat3 {
        MassProperties::from(self.ball.mass_properties(1.0)).inertia_for_mass(mass)
    }

    fn describe(&self) -> String {
        format!("sphere r={}", self.radius())
    }
}

/// Convex shape uniformly scaled without re-tessellation.
#[derive(Debug)]
pub struct UniformScaledShape {
    inner: Arc<dyn CollisionShape>,
    scale: f32,
}

impl UniformScaledShape {
    /// Wrap a convex shape.
    ///
    /// # Panics
    /// If `inner` is not convex.
    pub fn new(inner: Arc<dyn CollisionShape>, scale: f32) -> Self {
        assert!(
            inner.is_convex(),
            "uniform scaling requires a convex shape, got {}",
            inner.describe()
        );
        Self { inner, scale }
    }
}

impl CollisionShape for UniformScaledShape {
    fn is_convex(&self) -> bool {
        true
    }

    fn volume(&self) -> f32 {
        self.inner.volume() * self.scale.powi(3)
    }

    // For a fixed mass, every inertia component grows with the square of length
    fn local_inertia(&self, mass: f32) -> Mat3 {
        self.inner.local_inertia(mass) * (self.scale * self.scale)
    }

    fn describe(&self) -> String {
        format!("{} scaled by {}", self.inner.describe(), self.scale)
    }
}

/// Rigid body data attached to a scene mesh
#[derive(Clone, Debug)]
pub struct PhysicsAttachment {
    pub shape: Arc<dyn CollisionShape>,
    pub mass: f32,
    /// Overrides the inertia the backend would derive from the shape
    pub local_inertia: Mat3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_shape() {
        let shape = BoxShape::new(Vec3::splat(0.5));
        assert!(shape.is_convex());
        assert!((shape.volume() - 1.0).abs() < 1e-5);
        assert_eq!(shape.half_extents(), Vec3::splat(0.5));
        let inertia = shape.local_inertia(6.0);
        assert!((inertia.x_axis.x - 1.0).abs() < 1e-5);
        assert!((inertia.y_axis.y - 1.0).abs() < 1e-5);
        assert!(inertia.x_axis.y.abs() < 1e-6);
    }

    #[test]
    fn test_sphere_shape() {
        let shape = SphereShape::new(2.0);
        assert!((shape.volume() - 32.0 / 3.0 * std::f32::consts::PI).abs() < 1e-3);
        assert!((shape.local_inertia(5.0).z_axis.z - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_scaled_matches_bigger_box() {
        let unit: Arc<dyn CollisionShape> = Arc::new(BoxShape::new(Vec3::splat(0.5)));
        let scaled = UniformScaledShape::new(unit, 2.0);
        let big = BoxShape::new(Vec3::splat(1.0));

        assert!((scaled.volume() - big.volume()).abs() < 1e-5);
        let a = scaled.local_inertia(8.0);
        let b = big.local_inertia(8.0);
        assert!((a.x_axis.x - b.x_axis.x).abs() < 1e-5);
        assert!(scaled.describe().contains("scaled by 2"));
    }

    #[derive(Debug)]
    struct Concave;

    impl CollisionShape for Concave {
        fn is_convex(&self) -> bool {
            false
        }
        fn volume(&self) -> f32 {
            1.0
        }
        fn local_inertia(&self, _mass: f32) -> Mat3 {
            Mat3::ZERO
        }
        fn describe(&self) -> String {
            "concave".to_string()
        }
    }

    #[test]
    #[should_panic(expected = "requires a convex shape")]
    fn test_uniform_scaled_rejects_concave() {
        let _ = UniformScaledShape::new(Arc::new(Concave), 2.0);
    }
}
