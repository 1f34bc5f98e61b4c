//! Scene graph: CPU-side hierarchy of nodes.
//!
//! The scene graph organizes meshes into a hierarchy with parent/child
//! relationships. World transforms are composed on demand from the parent chain.

use std::collections::HashMap;

use glam::{Mat3, Mat4};

use crate::core::{Error, Result};
use crate::math::Ray;

use super::hover::HoverRecord;
use super::node::{LocalTransform, MeshContent, NewNode, NodeContent, SceneLayer, SceneNode, SceneNodeId};

/// CPU-side scene graph.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, "root", SceneLayer::Content, NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Allocate a fresh node ID without inserting anything.
    pub fn allocate_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        layer: SceneLayer,
        content: NodeContent,
    ) -> Result<SceneNodeId> {
        self.add_node(
            parent,
            NewNode {
                name: name.into(),
                layer,
                local_transform: LocalTransform::identity(),
                content,
            },
        )
    }

    /// Insert a prepared node under `parent` with a fresh ID.
    pub fn add_node(&mut self, parent: SceneNodeId, node: NewNode) -> Result<SceneNodeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(Error::Scene(format!("parent {:?} does not exist", parent)));
        }
        let id = self.allocate_id();
        self.insert_node(id, parent, node)?;
        Ok(id)
    }

    /// Insert a prepared node under `parent` with a previously allocated ID.
    pub fn insert_node(&mut self, id: SceneNodeId, parent: SceneNodeId, node: NewNode) -> Result<()> {
        if self.nodes.contains_key(&id) {
            return Err(Error::Scene(format!("node {:?} already exists", id)));
        }
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return Err(Error::Scene(format!("parent {:?} does not exist", parent)));
        };
        parent_node.children.push(id);

        let mut scene_node = SceneNode::new(id, node.name, node.layer, node.content);
        scene_node.parent = Some(parent);
        scene_node.local_transform = node.local_transform;
        self.nodes.insert(id, scene_node);

        self.next_id = self.next_id.max(id.0 + 1);
        Ok(())
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    /// Returns the removed node.
    pub fn remove(&mut self, id: SceneNodeId) -> Option<SceneNode> {
        if id == self.root {
            return None;
        }

        // Collect subtree IDs (BFS)
        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            let current = to_remove[i];
            if let Some(node) = self.nodes.get(&current) {
                to_remove.extend_from_slice(&node.children);
            }
            i += 1;
        }

        // Detach from parent
        if let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        let removed = self.nodes.remove(&id);
        for nid in &to_remove[1..] {
            self.nodes.remove(nid);
        }
        removed
    }

    /// Move a node to a new parent. Cannot reparent the root or create a cycle.
    pub fn reparent(&mut self, id: SceneNodeId, new_parent: SceneNodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::Scene("cannot reparent the root".to_string()));
        }
        if !self.nodes.contains_key(&id) || !self.nodes.contains_key(&new_parent) {
            return Err(Error::Scene(format!("cannot reparent {:?} to {:?}", id, new_parent)));
        }
        if self.is_ancestor_or_self(id, new_parent) {
            return Err(Error::Scene(format!("{:?} is inside the subtree of {:?}", new_parent, id)));
        }

        // Detach from old parent
        if let Some(old_parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(old_parent) = self.nodes.get_mut(&old_parent_id) {
                old_parent.children.retain(|c| *c != id);
            }
        }

        // Attach to new parent
        if let Some(new_parent_node) = self.nodes.get_mut(&new_parent) {
            new_parent_node.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: SceneNodeId, mut node: SceneNodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(&node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Set the visibility of a node.
    pub fn set_visible(&mut self, id: SceneNodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: SceneNodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// World transform composed from the root down to `id`.
    pub fn world_transform(&self, id: SceneNodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut world = node.local_transform.to_mat4();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(&p)) {
            world = parent.local_transform.to_mat4() * world;
            node = parent;
        }
        Some(world)
    }

    /// True if the node and all its ancestors are visible.
    pub fn is_visible(&self, id: SceneNodeId) -> bool {
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            if !node.visible {
                return false;
            }
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        true
    }

    /// All mesh nodes.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (SceneNodeId, &MeshContent)> + '_ {
        self.nodes
            .values()
            .filter_map(|n| n.content.as_mesh().map(|mesh| (n.id, mesh)))
    }

    /// Pick the nearest visible content mesh along a world-space ray.
    pub fn raycast(&self, ray: &Ray) -> Option<HoverRecord> {
        let mut best: Option<(f32, HoverRecord)> = None;

        for (id, mesh) in self.mesh_nodes() {
            let Some(raytrace) = &mesh.raytrace else {
                continue;
            };
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.layer != SceneLayer::Content || !self.is_visible(id) {
                continue;
            }
            let Some(world) = self.world_transform(id) else {
                continue;
            };
            let local_from_world = world.inverse();

            // Direction left unnormalized so t stays in world units
            let local_ray = Ray::new(
                local_from_world.transform_point3(ray.origin),
                local_from_world.transform_vector3(ray.direction),
            );
            let Some(hit) = raytrace.intersect(&local_ray) else {
                continue;
            };
            if best.as_ref().is_some_and(|(t, _)| *t <= hit.t) {
                continue;
            }

            let normal_matrix = Mat3::from_mat4(local_from_world).transpose();
            best = Some((
                hit.t,
                HoverRecord {
                    mesh: Some(id),
                    polygon: Some(hit.polygon),
                    geometry: Some(mesh.geometry.clone()),
                    position: Some(world.transform_point3(hit.position)),
                    normal: Some((normal_matrix * hit.normal).normalize_or_zero()),
                },
            ));
        }

        best.map(|(_, record)| record)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
