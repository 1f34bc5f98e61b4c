//! Undoable scene operations.

use std::fmt;

use crate::core::{Error, Result};

use super::graph::SceneGraph;
use super::node::{NewNode, SceneNodeId};

/// A scene mutation that can be undone.
pub trait Operation: Send + fmt::Debug {
    fn execute(&mut self, scene: &mut SceneGraph) -> Result<()>;

    fn undo(&mut self, scene: &mut SceneGraph) -> Result<()>;

    fn describe(&self) -> String;
}

/// Insert a node under a parent. Undo removes it; redo reinserts it with the same ID.
#[derive(Debug)]
pub struct InsertOperation {
    id: SceneNodeId,
    parent: SceneNodeId,
    node: NewNode,
    inserted: bool,
}

impl InsertOperation {
    /// `id` must come from `SceneGraph::allocate_id` on the target scene.
    pub fn new(id: SceneNodeId, parent: SceneNodeId, node: NewNode) -> Self {
        Self {
            id,
            parent,
            node,
            inserted: false,
        }
    }
}

impl Operation for InsertOperation {
    fn execute(&mut self, scene: &mut SceneGraph) -> Result<()> {
        if self.inserted {
            return Err(Error::Scene(format!("{:?} is already inserted", self.id)));
        }
        scene.insert_node(self.id, self.parent, self.node.clone())?;
        self.inserted = true;
        Ok(())
    }

    fn undo(&mut self, scene: &mut SceneGraph) -> Result<()> {
        if !self.inserted {
            return Err(Error::Scene(format!("{:?} is not inserted", self.id)));
        }
        // Keep whatever was edited on the node since insertion for redo
        let removed = scene
            .remove(self.id)
            .ok_or_else(|| Error::Scene(format!("{:?} vanished from the scene", self.id)))?;
        self.node = NewNode {
            name: removed.name,
            layer: removed.layer,
            local_transform: removed.local_transform,
            content: removed.content,
        };
        self.inserted = false;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("insert {} under {:?}", self.node.name, self.parent)
    }
}

/// Executed operations with undo and redo lists
#[derive(Debug, Default)]
pub struct OperationStack {
    executed: Vec<Box<dyn Operation>>,
    undone: Vec<Box<dyn Operation>>,
}

impl OperationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute an operation and record it. Clears the redo list.
    pub fn execute(&mut self, mut operation: Box<dyn Operation>, scene: &mut SceneGraph) -> Result<()> {
        operation.execute(scene)?;
        log::debug!("Executed: {}", operation.describe());
        self.executed.push(operation);
        self.undone.clear();
        Ok(())
    }

    /// Undo the latest operation. Returns false if there was nothing to undo.
    pub fn undo(&mut self, scene: &mut SceneGraph) -> Result<bool> {
        let Some(mut operation) = self.executed.pop() else {
            return Ok(false);
        };
        if let Err(e) = operation.undo(scene) {
            self.executed.push(operation);
            return Err(e);
        }
        log::debug!("Undone: {}", operation.describe());
        self.undone.push(operation);
        Ok(true)
    }

    /// Redo the latest undone operation. Returns false if there was nothing to redo.
    pub fn redo(&mut self, scene: &mut SceneGraph) -> Result<bool> {
        let Some(mut operation) = self.undone.pop() else {
            return Ok(false);
        };
        if let Err(e) = operation.execute(scene) {
            self.undone.push(operation);
            return Err(e);
        }
        log::debug!("Redone: {}", operation.describe());
        self.executed.push(operation);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.executed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn len(&self) -> usize {
        self.executed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }
}
