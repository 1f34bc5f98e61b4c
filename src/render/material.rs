//! Materials referenced by index from the content library

use serde::{Deserialize, Serialize};

use crate::core::types::Vec4;

/// Index of a material in the content library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub usize);

/// Surface material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Linear RGBA
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl Material {
    /// Create a dielectric material with the given color
    pub fn new(name: impl Into<String>, base_color: Vec4) -> Self {
        Self {
            name: name.into(),
            base_color: base_color.to_array(),
            metallic: 0.0,
            roughness: 0.5,
        }
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_builder_clamps() {
        let m = Material::new("gold", Vec4::new(1.0, 0.8, 0.3, 1.0))
            .with_metallic(2.0)
            .with_roughness(-1.0);
        assert_eq!(m.metallic, 1.0);
        assert_eq!(m.roughness, 0.0);
        assert_eq!(m.base_color, [1.0, 0.8, 0.3, 1.0]);
    }
}
