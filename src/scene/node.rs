//! Scene graph node types
//!
//! Node IDs, transforms, content variants, and nodes.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::geometry::Geometry;
use crate::physics::PhysicsAttachment;
use crate::render::{MaterialId, Primitive, RaytracePrimitive};

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneNodeId(pub u64);

/// Local transform relative to the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Decompose a similarity transform. Non-uniform scale collapses to its x component.
    pub fn from_mat4(matrix: &Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation: rotation.normalize(),
            scale: scale.x,
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }
}

/// Which layer a node is drawn and picked in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SceneLayer {
    /// User content, pickable
    #[default]
    Content,
    /// Editor helpers such as placement previews, never picked
    Tool,
}

/// Mesh with its derived render, ray-trace and physics data.
#[derive(Clone, Debug)]
pub struct MeshContent {
    pub geometry: Arc<Geometry>,
    pub primitive: Arc<Primitive>,
    pub material: Option<MaterialId>,
    pub raytrace: Option<Arc<RaytracePrimitive>>,
    pub physics: Option<PhysicsAttachment>,
}

impl MeshContent {
    /// Mesh content built straight from a geometry, with ray tracing and no physics
    pub fn from_geometry(geometry: Arc<Geometry>, material: Option<MaterialId>) -> Self {
        let primitive = Primitive::build(&geometry, &Default::default());
        let raytrace = RaytracePrimitive::build(&geometry);
        Self {
            geometry,
            primitive: Arc::new(primitive),
            material,
            raytrace: Some(Arc::new(raytrace)),
            physics: None,
        }
    }
}

/// What a scene node contains.
#[derive(Clone, Debug)]
pub enum NodeContent {
    /// A grouping node with no geometry of its own.
    Group,

    /// A mesh instance (e.g. a placed brush).
    Mesh(MeshContent),
}

impl NodeContent {
    pub fn as_mesh(&self) -> Option<&MeshContent> {
        match self {
            NodeContent::Mesh(mesh) => Some(mesh),
            NodeContent::Group => None,
        }
    }
}

/// A fully built node that has not been inserted into a scene yet.
#[derive(Clone, Debug)]
pub struct NewNode {
    pub name: String,
    pub layer: SceneLayer,
    pub local_transform: LocalTransform,
    pub content: NodeContent,
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    pub layer: SceneLayer,
    pub visible: bool,
    pub content: NodeContent,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(
        id: SceneNodeId,
        name: impl Into<String>,
        layer: SceneLayer,
        content: NodeContent,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: LocalTransform::identity(),
            layer,
            visible: true,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::make_cube;

    #[test]
    fn test_scene_node_id_equality() {
        let a = SceneNodeId(1);
        let b = SceneNodeId(1);
        let c = SceneNodeId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_local_transform_identity() {
        let t = LocalTransform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_local_transform_from_mat4_round_trip() {
        let t = LocalTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.7),
            scale: 2.0,
        };
        let back = LocalTransform::from_mat4(&t.to_mat4());
        assert!((back.position - t.position).length() < 1e-5);
        assert!(back.rotation.angle_between(t.rotation) < 1e-4);
        assert!((back.scale - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_scene_node_new() {
        let node = SceneNode::new(SceneNodeId(0), "root", SceneLayer::Content, NodeContent::Group);
        assert_eq!(node.id, SceneNodeId(0));
        assert_eq!(node.name, "root");
        assert!(node.parent.is_none());
        assert!(node.children.is_empty());
        assert!(node.visible);
        assert!(node.content.as_mesh().is_none());
    }

    #[test]
    fn test_mesh_content_from_geometry() {
        let mesh = MeshContent::from_geometry(Arc::new(make_cube(1.0)), Some(MaterialId(2)));
        assert_eq!(mesh.primitive.triangle_count(), 12);
        assert!(mesh.raytrace.is_some());
        assert!(mesh.physics.is_none());
        assert_eq!(mesh.material, Some(MaterialId(2)));
    }
}
