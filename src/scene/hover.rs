//! What the pointer is over in a 3D view.

use std::sync::Arc;

use glam::Vec3;

use crate::geometry::Geometry;
use super::node::SceneNodeId;

/// Hover record supplied per pointer motion, in world space.
#[derive(Clone, Debug, Default)]
pub struct HoverRecord {
    pub mesh: Option<SceneNodeId>,
    /// Polygon index within `geometry`
    pub polygon: Option<u32>,
    pub geometry: Option<Arc<Geometry>>,
    pub position: Option<Vec3>,
    pub normal: Option<Vec3>,
}

impl HoverRecord {
    /// A record with nothing hovered
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.mesh.is_some() && self.position.is_some()
    }
}
