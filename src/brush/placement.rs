//! Interactive brush placement: preview while hovering, commit as an undoable insert.
//!
//! The controller receives one [`HoverRecord`] per pointer motion. While a brush
//! is selected and the pointer is over a mesh polygon, a preview instance lives
//! in the tool layer as a child of the hovered mesh. [`Brushes::try_insert`]
//! turns the current placement into a permanent node through the operation
//! stack and drops the preview.

use std::sync::{Arc, Weak};

use glam::{Mat4, Vec3};

use super::template::{key_scale, scale_key, Brush, InstanceCreateInfo};
use super::config::BrushesConfig;
use super::reference_frame::ReferenceFrame;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::geometry::Geometry;
use crate::render::MaterialId;
use crate::scene::{Grid, GridSnap, HoverRecord, InsertOperation, OperationStack, SceneGraph, SceneLayer, SceneNodeId};

/// Where to put the selected brush relative to the hovered mesh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushPlacement {
    /// Parent-relative transform of the instance
    pub transform: Mat4,
    /// Uniform scale of the instance
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementState {
    /// No preview
    Idle,
    /// Preview follows the hovered polygon
    Hovering,
}

#[derive(Clone, Debug)]
struct Hover {
    mesh: Option<SceneNodeId>,
    polygon: Option<u32>,
    geometry: Option<Arc<Geometry>>,
    /// Hit position in the mesh's local space
    position: Option<Vec3>,
    world_position: Option<Vec3>,
    normal: Option<Vec3>,
    world_from_mesh: Mat4,
}

impl Default for Hover {
    fn default() -> Self {
        Self {
            mesh: None,
            polygon: None,
            geometry: None,
            position: None,
            world_position: None,
            normal: None,
            world_from_mesh: Mat4::IDENTITY,
        }
    }
}

/// Brush placement controller for one view.
#[derive(Debug)]
pub struct Brushes {
    config: BrushesConfig,
    grid: Grid,
    hover: Hover,
    brush: Option<Weak<Brush>>,
    preview: Option<SceneNodeId>,
    material: Option<MaterialId>,
    face_offset: u32,
    corner_offset: u32,
}

impl Default for Brushes {
    fn default() -> Self {
        Self::new(BrushesConfig::default())
    }
}

impl Brushes {
    pub fn new(config: BrushesConfig) -> Self {
        let grid = Grid::new(Vec3::ZERO, config.grid_cell_size);
        Self {
            config,
            grid,
            hover: Hover::default(),
            brush: None,
            preview: None,
            material: None,
            face_offset: 0,
            corner_offset: 0,
        }
    }

    pub fn config(&self) -> &BrushesConfig {
        &self.config
    }

    pub fn state(&self) -> PlacementState {
        if self.preview.is_some() && self.selected_brush().is_some() {
            PlacementState::Hovering
        } else {
            PlacementState::Idle
        }
    }

    pub fn preview(&self) -> Option<SceneNodeId> {
        self.preview
    }

    pub fn hover_mesh(&self) -> Option<SceneNodeId> {
        self.hover.mesh
    }

    pub fn hover_polygon(&self) -> Option<u32> {
        self.hover.polygon
    }

    /// Hit position in the hovered mesh's local space
    pub fn hover_position(&self) -> Option<Vec3> {
        self.hover.position
    }

    pub fn hover_normal(&self) -> Option<Vec3> {
        self.hover.normal
    }

    /// Selected brush, if it is still alive
    pub fn selected_brush(&self) -> Option<Arc<Brush>> {
        self.brush.as_ref().and_then(Weak::upgrade)
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    pub fn face_offset(&self) -> u32 {
        self.face_offset
    }

    pub fn corner_offset(&self) -> u32 {
        self.corner_offset
    }

    /// Select a brush and rebuild the preview; `None` removes it.
    pub fn select_brush(&mut self, brush: Option<&Arc<Brush>>, scene: &mut SceneGraph) {
        self.brush = brush.map(Arc::downgrade);
        self.face_offset = 0;
        self.corner_offset = 0;
        self.refresh(scene);
    }

    // Other setters take effect on the next `on_motion` or `refresh`.

    pub fn set_material(&mut self, material: Option<MaterialId>) {
        self.material = material;
    }

    pub fn set_face_offset(&mut self, face_offset: u32) {
        self.face_offset = face_offset;
    }

    /// Step to the next brush polygon that matches the hovered polygon's corner count
    pub fn cycle_face_offset(&mut self) {
        let count = match self.selected_brush() {
            Some(brush) => brush.polygon_candidates(self.hover_corner_count()),
            None => 0,
        };
        self.face_offset = (self.face_offset + 1) % count.max(1);
    }

    pub fn set_corner_offset(&mut self, corner_offset: u32) {
        self.corner_offset = corner_offset;
    }

    /// Rotate the brush to the next corner of the matched polygon
    pub fn cycle_corner_offset(&mut self) {
        self.corner_offset = (self.corner_offset + 1) % self.hover_corner_count().max(1);
    }

    pub fn set_snap_to_hover_polygon(&mut self, snap: bool) {
        self.config.snap_to_hover_polygon = snap;
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.config.snap_to_grid = snap;
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    /// Fixed uniform scale; disables scale matching
    pub fn set_scale(&mut self, scale: f32) {
        self.config.default_scale = scale;
        self.config.scale_to_match = false;
    }

    pub fn set_scale_to_match(&mut self, scale_to_match: bool) {
        self.config.scale_to_match = scale_to_match;
    }

    fn hover_corner_count(&self) -> u32 {
        match (&self.hover.geometry, self.hover.polygon) {
            (Some(geometry), Some(polygon)) => geometry.corner_count(polygon),
            _ => 0,
        }
    }

    /// Take a new hover record and bring the preview up to date.
    pub fn on_motion(&mut self, hover: HoverRecord, scene: &mut SceneGraph) {
        let HoverRecord {
            mesh,
            mut polygon,
            mut geometry,
            position,
            normal,
        } = hover;

        let out_of_range = match (polygon, &geometry) {
            (Some(index), Some(hit_geometry)) => index >= hit_geometry.polygon_count(),
            _ => false,
        };
        if out_of_range {
            log::debug!("Hover polygon {:?} out of range, dropping it", polygon);
            polygon = None;
            geometry = None;
        }

        let world_from_mesh = mesh.and_then(|id| scene.world_transform(id));
        let mesh = world_from_mesh.and(mesh);
        let world_from_mesh = world_from_mesh.unwrap_or(Mat4::IDENTITY);
        let local_position = match (mesh, position) {
            (Some(_), Some(world)) => Some(world_from_mesh.inverse().transform_point3(world)),
            _ => None,
        };

        self.hover = Hover {
            mesh,
            polygon,
            geometry,
            position: local_position,
            world_position: position,
            normal,
            world_from_mesh,
        };
        self.refresh(scene);
    }

    /// Recreate or remove the preview for the current hover and settings.
    pub fn refresh(&mut self, scene: &mut SceneGraph) {
        self.remove_preview(scene);

        let (Some(mesh), Some(_)) = (self.hover.mesh, self.hover.position) else {
            return;
        };
        let Some(brush) = self.selected_brush() else {
            return;
        };
        let Some(placement) = self.get_brush_transform() else {
            return;
        };

        let node = brush.make_instance(&InstanceCreateInfo {
            name: Some(self.config.preview_name.clone()),
            transform: placement.transform,
            material: self.material,
            scale: placement.scale,
            physics: false,
            layer: SceneLayer::Tool,
        });
        match scene.add_node(mesh, node) {
            Ok(id) => self.preview = Some(id),
            Err(e) => log::warn!("Failed to add brush preview: {}", e),
        }
    }

    fn remove_preview(&mut self, scene: &mut SceneGraph) {
        if let Some(preview) = self.preview.take() {
            scene.remove(preview);
        }
    }

    /// Transform that puts the selected brush face-down on the hovered polygon.
    ///
    /// None without a selected brush or hovered polygon, or when either anchor
    /// polygon has zero size.
    pub fn get_brush_transform(&self) -> Option<BrushPlacement> {
        let brush = self.selected_brush()?;
        let geometry = self.hover.geometry.as_ref()?;
        let polygon = self.hover.polygon?;

        let mut hover_frame = ReferenceFrame::new(geometry, polygon, 0, 0);
        hover_frame.n = -hover_frame.n;
        hover_frame.b = -hover_frame.b;

        let mut brush_frame =
            brush.get_reference_frame(hover_frame.corner_count, self.face_offset, self.corner_offset);
        let brush_scale = brush_frame.scale();
        if brush_scale <= f32::EPSILON {
            log::warn!("Brush {} has a zero sized anchor polygon", brush.name());
            return None;
        }

        let scale = if self.config.scale_to_match {
            let hover_scale = hover_frame.scale();
            if hover_scale <= f32::EPSILON {
                log::warn!("Hovered polygon {} of {} has zero size", polygon, geometry.name);
                return None;
            }
            hover_scale / brush_scale
        } else {
            self.config.default_scale
        };
        // Match the scale the instance geometry will be built at
        let scale = key_scale(scale_key(scale));
        if scale <= 0.0 {
            return None;
        }
        if scale != 1.0 {
            brush_frame.transform_by(&Mat4::from_scale(Vec3::splat(scale)));
        }

        if !self.config.snap_to_hover_polygon {
            if let Some(world) = self.hover.world_position {
                let world = if self.config.snap_to_grid {
                    self.grid.snap(world)
                } else {
                    world
                };
                hover_frame.centroid = self.hover.world_from_mesh.inverse().transform_point3(world);
            }
        }

        Some(BrushPlacement {
            transform: hover_frame.transform() * brush_frame.transform().inverse(),
            scale,
        })
    }

    /// Commit the previewed placement as an undoable insert under the hovered mesh.
    ///
    /// Fails without touching the scene when there is no preview, no hover
    /// position or the selected brush is gone.
    pub fn try_insert(&mut self, scene: &mut SceneGraph, operations: &mut OperationStack) -> Result<SceneNodeId> {
        if self.preview.is_none() {
            return Err(Error::Placement("no brush preview".to_string()));
        }
        let (Some(parent), Some(_)) = (self.hover.mesh, self.hover.position) else {
            return Err(Error::Placement("no hover position".to_string()));
        };
        let brush = self
            .selected_brush()
            .ok_or_else(|| Error::Placement("selected brush is gone".to_string()))?;
        let placement = self
            .get_brush_transform()
            .ok_or_else(|| Error::Placement("no placement for the hovered polygon".to_string()))?;

        let node = brush.make_instance(&InstanceCreateInfo {
            name: None,
            transform: placement.transform,
            material: self.material,
            scale: placement.scale,
            physics: true,
            layer: SceneLayer::Content,
        });
        let id = scene.allocate_id();
        operations.execute(Box::new(InsertOperation::new(id, parent, node)), scene)?;
        self.remove_preview(scene);

        log::info!(
            "Inserted brush {} as {:?} under {:?} at scale {}",
            brush.name(),
            id,
            parent,
            placement.scale
        );
        Ok(id)
    }
}
