//! Scene host for brush instances: graph, picking, grid snapping and undo

pub mod graph;
pub mod grid;
pub mod hover;
pub mod node;
pub mod operation;

pub use graph::SceneGraph;
pub use grid::{Grid, GridSnap};
pub use hover::HoverRecord;
pub use node::{LocalTransform, MeshContent, NewNode, NodeContent, SceneLayer, SceneNode, SceneNodeId};
pub use operation::{InsertOperation, Operation, OperationStack};
