//! Content library: registered brushes and materials.

use std::sync::{Arc, Mutex};

use glam::Vec3;
use rayon::prelude::*;

use super::template::Brush;
use super::data::BrushCreateInfo;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::geometry::shapes::{make_box, make_cube, make_octahedron, make_prism, make_rock, make_tetrahedron};
use crate::physics::BoxShape;
use crate::render::{Material, MaterialId, NormalStyle};
use crate::scene::{SceneGraph, SceneNodeId};

/// Brushes and materials available to the placement tool.
///
/// Registration takes a lock so startup tasks can register concurrently.
#[derive(Debug, Default)]
pub struct BrushLibrary {
    brushes: Mutex<Vec<Arc<Brush>>>,
    materials: Vec<Material>,
}

impl BrushLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, brush: Brush) -> Arc<Brush> {
        let brush = Arc::new(brush);
        self.brushes.lock().unwrap().push(brush.clone());
        log::debug!("Registered brush {}", brush.name());
        brush
    }

    /// Snapshot of the registered brushes, in registration order
    pub fn brushes(&self) -> Vec<Arc<Brush>> {
        self.brushes.lock().unwrap().clone()
    }

    pub fn brush_count(&self) -> usize {
        self.brushes.lock().unwrap().len()
    }

    pub fn find_brush(&self, name: &str) -> Option<Arc<Brush>> {
        self.brushes
            .lock()
            .unwrap()
            .iter()
            .find(|brush| brush.name() == name)
            .cloned()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Result<&Material> {
        self.materials
            .get(id.0)
            .ok_or_else(|| Error::Library(format!("unknown material {}", id.0)))
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Build and register the procedural brush set in parallel.
    ///
    /// Returned brushes are late-initialized and in a fixed order.
    pub fn register_default_brushes(&self, density: f32) -> Vec<Arc<Brush>> {
        let start = std::time::Instant::now();
        let brushes: Vec<_> = default_brush_infos(density)
            .into_par_iter()
            .map(|info| {
                let brush = Brush::new(info);
                brush.late_initialize();
                self.register(brush)
            })
            .collect();

        log::info!(
            "Registered {} default brushes in {:.1}ms",
            brushes.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        brushes
    }

    /// Register a brush built from the geometry of an existing mesh node.
    ///
    /// The node's collision shape is reused when it has one.
    pub fn brush_from_mesh(&self, scene: &SceneGraph, node: SceneNodeId, density: f32) -> Result<Arc<Brush>> {
        let scene_node = scene
            .get(node)
            .ok_or_else(|| Error::Scene(format!("unknown node {:?}", node)))?;
        let mesh = scene_node
            .content
            .as_mesh()
            .ok_or_else(|| Error::Brush(format!("node {} is not a mesh", scene_node.name)))?;

        let mut info = BrushCreateInfo::new(scene_node.name.clone(), mesh.geometry.clone())
            .with_density(density)
            .with_normal_style(mesh.primitive.normal_style);
        if let Some(physics) = &mesh.physics {
            info = info.with_collision_shape(physics.shape.clone());
        }
        Ok(self.register(Brush::new(info)))
    }
}

fn default_brush_infos(density: f32) -> Vec<BrushCreateInfo> {
    vec![
        BrushCreateInfo::from_generator("cube", || make_cube(1.0))
            .with_volume(1.0)
            .with_collision_shape(Arc::new(BoxShape::new(Vec3::splat(0.5)))),
        BrushCreateInfo::from_generator("slab", || make_box(2.0, 0.25, 2.0))
            .with_collision_shape_generator(|scale| Arc::new(BoxShape::new(Vec3::new(1.0, 0.125, 1.0) * scale)))
            .with_collision_volume_calculator(|scale| scale * scale * scale),
        BrushCreateInfo::from_generator("tetrahedron", || make_tetrahedron(0.75)),
        BrushCreateInfo::from_generator("octahedron", || make_octahedron(0.75)),
        BrushCreateInfo::from_generator("triangular prism", || make_prism(3, 0.5, 1.0)),
        BrushCreateInfo::from_generator("pentagonal prism", || make_prism(5, 0.5, 1.0)),
        BrushCreateInfo::from_generator("hexagonal prism", || make_prism(6, 0.5, 1.0)),
        BrushCreateInfo::from_generator("rock", || make_rock(7, 0.5, 8))
            .with_normal_style(NormalStyle::PointNormals),
    ]
    .into_iter()
    .map(|info| info.with_density(density))
    .collect()
}
