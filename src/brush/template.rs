//! Brush: a reusable, scalable mesh template with lazy derived data.
//!
//! Derived data is built on first use and cached for the lifetime of the brush:
//! the unit-scale geometry, renderable and ray-trace primitives, one reference
//! frame per `(corner_count, face_offset, corner_offset)` request and one
//! [`Scaled`] entry per quantized scale.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use glam::{Mat3, Mat4};

use super::data::{BrushCreateInfo, BrushData, GeometrySource};
use super::reference_frame::ReferenceFrame;
use crate::geometry::Geometry;
use crate::math::Aabb;
use crate::physics::{CollisionShape, ConvexHullShape, PhysicsAttachment, UniformScaledShape};
use crate::render::{MaterialId, Primitive, RaytracePrimitive};
use crate::scene::{LocalTransform, MeshContent, NewNode, NodeContent, SceneLayer};

/// Fixed-point factor used to quantize scales into cache keys
pub const SCALE_KEY_FACTOR: f32 = 65536.0;

/// Largest scale a brush can be built at; larger requests are clamped
pub const MAX_SCALE: f32 = 1.0e9;

/// Quantize a scale into its cache key.
///
/// Negative and NaN scales map to 0, scales above [`MAX_SCALE`] to its key.
pub fn scale_key(scale: f32) -> u64 {
    let scale = if scale.is_nan() {
        log::warn!("NaN brush scale, using 0");
        0.0
    } else if scale > MAX_SCALE {
        log::warn!("Brush scale {} clamped to {}", scale, MAX_SCALE);
        MAX_SCALE
    } else {
        scale.max(0.0)
    };
    (f64::from(scale) * f64::from(SCALE_KEY_FACTOR)).round() as u64
}

/// Scale a key stands for
pub fn key_scale(scale_key: u64) -> f32 {
    (scale_key as f64 / f64::from(SCALE_KEY_FACTOR)) as f32
}

const UNIT_SCALE_KEY: u64 = SCALE_KEY_FACTOR as u64;

/// Brush data at one quantized scale.
#[derive(Debug)]
pub struct Scaled {
    pub scale_key: u64,
    pub scale: f32,
    pub geometry: Arc<Geometry>,
    pub primitive: Arc<Primitive>,
    pub raytrace: Arc<RaytracePrimitive>,
    pub collision_shape: Option<Arc<dyn CollisionShape>>,
    pub volume: f32,
    pub mass: f32,
    pub local_inertia: Mat3,
}

/// Parameters for [`Brush::make_instance`]
#[derive(Clone, Debug)]
pub struct InstanceCreateInfo {
    /// Node name; defaults to the brush name
    pub name: Option<String>,
    /// Parent-relative transform
    pub transform: Mat4,
    pub material: Option<MaterialId>,
    pub scale: f32,
    /// Attach a rigid body when the brush has a collision shape
    pub physics: bool,
    pub layer: SceneLayer,
}

impl Default for InstanceCreateInfo {
    fn default() -> Self {
        Self {
            name: None,
            transform: Mat4::IDENTITY,
            material: None,
            scale: 1.0,
            physics: true,
            layer: SceneLayer::Content,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrameKey {
    corner_count: u32,
    face_offset: u32,
    corner_offset: u32,
}

pub struct Brush {
    name: String,
    geometry: Mutex<GeometrySource>,
    data: Mutex<BrushData>,
    primitive: OnceLock<Arc<Primitive>>,
    raytrace: OnceLock<Arc<RaytracePrimitive>>,
    physics_initialized: OnceLock<()>,
    reference_frames: Mutex<Vec<(FrameKey, ReferenceFrame)>>,
    // Locked for the whole of a miss so each key is built once.
    // Lock order: scaled_entries, then geometry/data.
    scaled_entries: Mutex<Vec<Arc<Scaled>>>,
}

impl fmt::Debug for Brush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Brush")
            .field("name", &self.name)
            .field("geometry", &*self.geometry.lock().unwrap())
            .field("scaled_entries", &self.scaled_count())
            .finish()
    }
}

impl Brush {
    pub fn new(create_info: BrushCreateInfo) -> Self {
        let BrushCreateInfo { geometry, data } = create_info;
        log::debug!("Creating brush {} ({:?})", data.name, geometry);
        Self {
            name: data.name.clone(),
            geometry: Mutex::new(geometry),
            data: Mutex::new(data),
            primitive: OnceLock::new(),
            raytrace: OnceLock::new(),
            physics_initialized: OnceLock::new(),
            reference_frames: Mutex::new(Vec::new()),
            scaled_entries: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the creation data, including anything `late_initialize` filled in
    pub fn data(&self) -> BrushData {
        self.data.lock().unwrap().clone()
    }

    pub fn density(&self) -> f32 {
        self.data.lock().unwrap().density
    }

    /// Unit-scale volume
    pub fn volume(&self) -> f32 {
        self.data.lock().unwrap().volume
    }

    pub fn collision_shape(&self) -> Option<Arc<dyn CollisionShape>> {
        self.data.lock().unwrap().collision_shape.clone()
    }

    pub fn is_geometry_realized(&self) -> bool {
        self.geometry.lock().unwrap().is_realized()
    }

    /// Unit-scale geometry. A pending generator runs on the first call and is dropped.
    pub fn get_geometry(&self) -> Arc<Geometry> {
        let mut source = self.geometry.lock().unwrap();
        let geometry = match &*source {
            GeometrySource::Realized(geometry) => return geometry.clone(),
            GeometrySource::Pending(generator) => {
                let mut geometry = generator();
                if geometry.polygon_attributes().is_none() {
                    geometry.compute_polygon_attributes();
                }
                log::debug!(
                    "Brush {}: generated {} points, {} polygons",
                    self.name,
                    geometry.point_count(),
                    geometry.polygon_count()
                );
                Arc::new(geometry)
            }
        };
        *source = GeometrySource::Realized(geometry.clone());
        geometry
    }

    fn unit_primitive(&self) -> Arc<Primitive> {
        self.primitive
            .get_or_init(|| {
                let geometry = self.get_geometry();
                let build_info = self.data.lock().unwrap().build_info;
                Arc::new(Primitive::build(&geometry, &build_info))
            })
            .clone()
    }

    fn unit_raytrace(&self) -> Arc<RaytracePrimitive> {
        self.raytrace
            .get_or_init(|| Arc::new(RaytracePrimitive::build(&self.get_geometry())))
            .clone()
    }

    /// Build unit-scale primitives and fill in the collision shape and volume. Idempotent.
    pub fn late_initialize(&self) {
        self.unit_primitive();
        self.unit_raytrace();
        self.physics_initialized.get_or_init(|| self.initialize_physics());
    }

    fn initialize_physics(&self) {
        let geometry = self.get_geometry();
        let mut data = self.data();

        if data.collision_shape.is_none() && data.collision_shape_generator.is_none() {
            match ConvexHullShape::from_points(geometry.points()) {
                Some(hull) => {
                    log::debug!("Brush {}: synthesized {}", self.name, hull.describe());
                    data.collision_shape = Some(Arc::new(hull));
                }
                None => log::warn!(
                    "Brush {}: cannot build a convex hull from {} points, no collision shape",
                    self.name,
                    geometry.point_count()
                ),
            }
        }

        if data.volume == 0.0 {
            if let Some(calculator) = &data.collision_volume_calculator {
                data.volume = calculator(1.0);
            }
        }
        if data.volume == 0.0 {
            data.volume = match &data.collision_shape {
                Some(shape) => shape.volume(),
                None => geometry.volume().max(0.0),
            };
        }

        *self.data.lock().unwrap() = data;
    }

    /// Frame on the `face_offset`-th polygon with `corner_count` corners.
    ///
    /// A `corner_count` of 0 accepts any polygon. The last polygon is accepted
    /// when there are fewer candidates than `face_offset + 1`.
    pub fn get_reference_frame(&self, corner_count: u32, face_offset: u32, corner_offset: u32) -> ReferenceFrame {
        let key = FrameKey {
            corner_count,
            face_offset,
            corner_offset,
        };
        if let Some((_, frame)) = self.reference_frames.lock().unwrap().iter().find(|(k, _)| *k == key) {
            return *frame;
        }

        let geometry = self.get_geometry();
        let frame = match find_polygon(&geometry, corner_count, face_offset) {
            Some(polygon) => ReferenceFrame::new(&geometry, polygon, face_offset, corner_offset),
            None => {
                log::warn!("Brush {}: geometry has no polygons", self.name);
                ReferenceFrame {
                    face_offset,
                    corner_offset,
                    ..Default::default()
                }
            }
        };
        self.reference_frames.lock().unwrap().push((key, frame));
        frame
    }

    /// Number of polygons with `corner_count` corners, or all polygons for 0
    pub fn polygon_candidates(&self, corner_count: u32) -> u32 {
        let geometry = self.get_geometry();
        (0..geometry.polygon_count())
            .filter(|&polygon| corner_count == 0 || geometry.corner_count(polygon) == corner_count)
            .count() as u32
    }

    /// Cached data for `scale`, built on first request for its key.
    pub fn get_scaled(&self, scale: f32) -> Arc<Scaled> {
        self.late_initialize();
        let key = scale_key(scale);
        let mut entries = self.scaled_entries.lock().unwrap();
        if let Some(entry) = entries.iter().find(|entry| entry.scale_key == key) {
            return entry.clone();
        }
        let entry = Arc::new(self.create_scaled(key));
        entries.push(entry.clone());
        entry
    }

    /// Number of distinct scales built so far
    pub fn scaled_count(&self) -> usize {
        self.scaled_entries.lock().unwrap().len()
    }

    /// Build data for a quantized scale. Uncached; use [`get_scaled`](Self::get_scaled).
    ///
    /// # Panics
    /// If the brush has an explicit collision shape that is not convex and the scale is not 1.
    pub fn create_scaled(&self, scale_key: u64) -> Scaled {
        self.late_initialize();
        let scale = key_scale(scale_key);
        let data = self.data();
        let unit_geometry = self.get_geometry();

        if scale_key == UNIT_SCALE_KEY {
            let collision_shape = match (&data.collision_shape, &data.collision_shape_generator) {
                (Some(shape), _) => Some(shape.clone()),
                (None, Some(generator)) => Some(generator(1.0)),
                (None, None) => None,
            };
            let mass = data.density * data.volume;
            let local_inertia = collision_shape
                .as_ref()
                .map_or(Mat3::ZERO, |shape| shape.local_inertia(mass));
            return Scaled {
                scale_key,
                scale,
                geometry: unit_geometry,
                primitive: self.unit_primitive(),
                raytrace: self.unit_raytrace(),
                collision_shape,
                volume: data.volume,
                mass,
                local_inertia,
            };
        }

        let geometry = Arc::new(unit_geometry.scaled(scale));
        let primitive = Arc::new(Primitive::build(&geometry, &data.build_info));
        let raytrace = Arc::new(RaytracePrimitive::build(&geometry));

        let cubic_volume = data.volume * scale * scale * scale;
        let (collision_shape, volume) = match (&data.collision_shape, &data.collision_shape_generator) {
            (Some(shape), _) => {
                let scaled: Arc<dyn CollisionShape> = Arc::new(UniformScaledShape::new(shape.clone(), scale));
                (Some(scaled), cubic_volume)
            }
            (None, Some(generator)) => {
                let volume = data
                    .collision_volume_calculator
                    .as_ref()
                    .map_or(cubic_volume, |calculator| calculator(scale));
                (Some(generator(scale)), volume)
            }
            (None, None) => (None, cubic_volume),
        };
        let mass = data.density * volume;
        let local_inertia = collision_shape
            .as_ref()
            .map_or(Mat3::ZERO, |shape| shape.local_inertia(mass));

        log::debug!(
            "Brush {}: built scale {} (volume {}, mass {})",
            self.name,
            scale,
            volume,
            mass
        );

        Scaled {
            scale_key,
            scale,
            geometry,
            primitive,
            raytrace,
            collision_shape,
            volume,
            mass,
            local_inertia,
        }
    }

    /// Scene node for one instance of this brush.
    ///
    /// A physics attachment is added only when the brush has a collision shape,
    /// physics is enabled on the brush and requested by `info`.
    pub fn make_instance(&self, info: &InstanceCreateInfo) -> NewNode {
        let scaled = self.get_scaled(info.scale);
        let (density, physics_enabled) = {
            let data = self.data.lock().unwrap();
            (data.density, data.physics_enabled)
        };

        let physics = match &scaled.collision_shape {
            Some(shape) if physics_enabled && info.physics => Some(PhysicsAttachment {
                shape: shape.clone(),
                mass: density * scaled.volume,
                local_inertia: scaled.local_inertia,
            }),
            _ => None,
        };

        NewNode {
            name: info.name.clone().unwrap_or_else(|| self.name.clone()),
            layer: info.layer,
            local_transform: LocalTransform::from_mat4(&info.transform),
            content: NodeContent::Mesh(MeshContent {
                geometry: scaled.geometry.clone(),
                primitive: scaled.primitive.clone(),
                material: info.material,
                raytrace: Some(scaled.raytrace.clone()),
                physics,
            }),
        }
    }

    /// Unit-scale bounds
    pub fn get_bounding_box(&self) -> Aabb {
        self.unit_primitive().bounding_box
    }
}

fn find_polygon(geometry: &Geometry, corner_count: u32, face_offset: u32) -> Option<u32> {
    let last = geometry.polygon_count().checked_sub(1)?;
    let mut matches = 0;
    for polygon in 0..=last {
        let is_last = polygon == last;
        if corner_count == 0 || geometry.corner_count(polygon) == corner_count || is_last {
            if matches == face_offset || is_last {
                return Some(polygon);
            }
            matches += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::{make_box, make_cube, make_prism, make_tetrahedron};
    use crate::physics::BoxShape;
    use crate::render::NormalStyle;
    use glam::Vec3;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EPS: f32 = 1e-4;

    fn cube_brush() -> Brush {
        Brush::new(
            BrushCreateInfo::new("cube", make_cube(1.0))
                .with_volume(1.0)
                .with_density(1.0)
                .with_collision_shape(Arc::new(BoxShape::new(Vec3::splat(0.5)))),
        )
    }

    /// Records every mass it is asked about
    #[derive(Debug, Default)]
    struct RecordingShape {
        masses: Mutex<Vec<f32>>,
        volume: f32,
    }

    impl CollisionShape for RecordingShape {
        fn is_convex(&self) -> bool {
            true
        }

        fn volume(&self) -> f32 {
            self.volume
        }

        fn local_inertia(&self, mass: f32) -> Mat3 {
            self.masses.lock().unwrap().push(mass);
            Mat3::from_diagonal(Vec3::splat(mass))
        }

        fn describe(&self) -> String {
            "recording".to_string()
        }
    }

    #[derive(Debug)]
    struct ConcaveShape;

    impl CollisionShape for ConcaveShape {
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
    fn test_scale_key() {
        assert_eq!(scale_key(1.0), 65536);
        assert_eq!(scale_key(0.5), 32768);
        assert_eq!(scale_key(1.0 + 1e-7), scale_key(1.0));
        assert_ne!(scale_key(1.001), scale_key(1.0));
        assert_eq!(scale_key(-2.0), 0);
        assert_eq!(scale_key(f32::NAN), 0);
        assert_eq!(scale_key(f32::INFINITY), scale_key(MAX_SCALE));
        assert!((key_scale(scale_key(2.5)) - 2.5).abs() < EPS);
    }

    #[test]
    fn test_large_scales_get_distinct_entries() {
        let brush = cube_brush();
        let a = brush.get_scaled(70000.0);
        let b = brush.get_scaled(100000.0);
        assert_ne!(a.scale_key, b.scale_key);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.scale, 70000.0);
        assert_eq!(b.scale, 100000.0);
        assert_eq!(brush.scaled_count(), 2);
        let bounds = b.geometry.bounding_box();
        assert!((bounds.max.x - bounds.min.x - 100000.0).abs() < 1.0);
    }

    #[test]
    fn test_cube_end_to_end() {
        let brush = cube_brush();

        let unit = brush.get_scaled(1.0);
        assert!((unit.volume - 1.0).abs() < EPS);
        assert!((unit.mass - 1.0).abs() < EPS);

        let doubled = brush.get_scaled(2.0);
        assert!((doubled.volume - 8.0).abs() < EPS);
        assert!((doubled.mass - 8.0).abs() < EPS);
        assert!(!Arc::ptr_eq(&unit.geometry, &doubled.geometry));
        assert!(doubled.geometry.name.contains("scaled by 2"));
        assert_eq!(doubled.geometry.point_count(), 8);
        assert!((doubled.raytrace.bounds.size() - Vec3::splat(2.0)).length() < EPS);

        let again = brush.get_scaled(1.0);
        assert!(Arc::ptr_eq(&unit, &again));
        assert!(Arc::ptr_eq(&unit.geometry, &brush.get_geometry()));
        assert_eq!(brush.scaled_count(), 2);
    }

    #[test]
    fn test_half_scale_cube() {
        let brush = cube_brush();
        let half = brush.get_scaled(0.5);
        assert!((half.volume - 0.125).abs() < EPS);
        assert!((half.mass - 0.125).abs() < EPS);
        let shape = half.collision_shape.as_ref().unwrap();
        assert!((shape.volume() - 0.125).abs() < EPS);
        // Box of edge 0.5 and mass 1/8: I = m (a² + a²) / 12
        let expected = 0.125 * (0.25 + 0.25) / 12.0;
        assert!((half.local_inertia.x_axis.x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_cache_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let brush = Brush::new(
            BrushCreateInfo::new("slab", make_box(2.0, 0.5, 2.0)).with_collision_shape_generator(move |scale| {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new(BoxShape::new(Vec3::new(1.0, 0.25, 1.0) * scale))
            }),
        );
        let a = brush.get_scaled(3.0);
        let b = brush.get_scaled(3.0);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(brush.scaled_count(), 1);
    }

    #[test]
    fn test_cubic_volume_without_shape_or_calculator() {
        let brush = Brush::new(BrushCreateInfo::from_generator("tetra", || make_tetrahedron(1.0)));
        let unit = brush.get_scaled(1.0).volume;
        assert!(unit > 0.0);
        for s in [0.25, 0.5, 1.5, 3.0] {
            let scaled = brush.get_scaled(s).volume;
            assert!((scaled - unit * s * s * s).abs() < 1e-4 * scaled.max(1.0), "scale {}", s);
        }
    }

    #[test]
    fn test_mass_reaches_shape_inertia() {
        let shape = Arc::new(RecordingShape {
            volume: 2.0,
            ..Default::default()
        });
        let brush = Brush::new(
            BrushCreateInfo::new("stub", make_cube(1.0))
                .with_density(3.0)
                .with_collision_shape(shape.clone()),
        );
        for s in [1.0, 2.0, 0.5] {
            let scaled = brush.get_scaled(s);
            let recorded = *shape.masses.lock().unwrap().last().unwrap();
            assert!((recorded - 3.0 * scaled.volume).abs() < EPS, "scale {}", s);
            assert!((scaled.mass - recorded).abs() < EPS);
        }
        // Unit volume falls back to the shape's volume
        assert!((brush.volume() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_generator_with_volume_calculator() {
        let brush = Brush::new(
            BrushCreateInfo::new("slab", make_box(2.0, 0.5, 2.0))
                .with_collision_shape_generator(|scale| Arc::new(BoxShape::new(Vec3::new(1.0, 0.25, 1.0) * scale)))
                .with_collision_volume_calculator(|scale| 2.0 * scale * scale * scale),
        );
        brush.late_initialize();
        assert!((brush.volume() - 2.0).abs() < EPS);
        assert!(brush.collision_shape().is_none());
        let scaled = brush.get_scaled(2.0);
        assert!((scaled.volume - 16.0).abs() < EPS);
        assert!((scaled.collision_shape.as_ref().unwrap().volume() - 16.0).abs() < EPS);
    }

    #[test]
    fn test_geometry_generator_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let brush = Brush::new(BrushCreateInfo::from_generator("cube", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            make_cube(1.0)
        }));
        assert!(!brush.is_geometry_realized());
        let a = brush.get_geometry();
        let b = brush.get_geometry();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(brush.is_geometry_realized());
        assert!(a.polygon_attributes().is_some());
    }

    #[test]
    fn test_late_initialize_synthesizes_hull() {
        let brush = Brush::new(BrushCreateInfo::new("prism", make_prism(6, 1.0, 1.0)));
        assert!(brush.collision_shape().is_none());
        brush.late_initialize();
        brush.late_initialize();
        let shape = brush.collision_shape().unwrap();
        assert!(shape.is_convex());
        assert!((brush.volume() - shape.volume()).abs() < EPS);
        assert!(brush.volume() > 0.0);
    }

    #[test]
    fn test_flat_geometry_has_no_shape() {
        let mut geometry = Geometry::new("quad");
        let a = geometry.make_point(Vec3::new(0.0, 0.0, 0.0));
        let b = geometry.make_point(Vec3::new(1.0, 0.0, 0.0));
        let c = geometry.make_point(Vec3::new(1.0, 0.0, 1.0));
        let d = geometry.make_point(Vec3::new(0.0, 0.0, 1.0));
        geometry.make_polygon(&[a, d, c, b]);
        let brush = Brush::new(BrushCreateInfo::new("quad", geometry));
        let scaled = brush.get_scaled(2.0);
        assert!(scaled.collision_shape.is_none());
        assert_eq!(scaled.volume, 0.0);
        assert_eq!(scaled.local_inertia, Mat3::ZERO);
        let node = brush.make_instance(&InstanceCreateInfo::default());
        assert!(node.content.as_mesh().unwrap().physics.is_none());
    }

    #[test]
    #[should_panic(expected = "convex")]
    fn test_concave_shape_cannot_be_scaled() {
        let brush = Brush::new(BrushCreateInfo::new("odd", make_cube(1.0)).with_collision_shape(Arc::new(ConcaveShape)));
        let _ = brush.get_scaled(2.0);
    }

    #[test]
    fn test_concave_shape_at_unit_scale() {
        let brush = Brush::new(BrushCreateInfo::new("odd", make_cube(1.0)).with_collision_shape(Arc::new(ConcaveShape)));
        assert!((brush.get_scaled(1.0).volume - 1.0).abs() < EPS);
    }

    #[test]
    fn test_reference_frame_selection() {
        // Prism: two pentagon caps then five quads
        let brush = Brush::new(BrushCreateInfo::new("prism", make_prism(5, 1.0, 1.0)));
        assert_eq!(brush.get_reference_frame(4, 0, 0).polygon, 2);
        assert_eq!(brush.get_reference_frame(4, 2, 0).polygon, 4);
        assert_eq!(brush.get_reference_frame(5, 1, 0).polygon, 1);
        assert_eq!(brush.get_reference_frame(0, 3, 0).polygon, 3);
        // No triangle: falls back to the last polygon
        assert_eq!(brush.get_reference_frame(3, 0, 0).polygon, 6);
        // Offset past the last candidate
        assert_eq!(brush.get_reference_frame(5, 9, 0).polygon, 6);
    }

    #[test]
    fn test_polygon_candidates() {
        let brush = Brush::new(BrushCreateInfo::new("prism", make_prism(5, 1.0, 1.0)));
        assert_eq!(brush.polygon_candidates(4), 5);
        assert_eq!(brush.polygon_candidates(5), 2);
        assert_eq!(brush.polygon_candidates(3), 0);
        assert_eq!(brush.polygon_candidates(0), 7);
    }

    #[test]
    fn test_reference_frame_cache() {
        let brush = cube_brush();
        let a = brush.get_reference_frame(4, 1, 2);
        let b = brush.get_reference_frame(4, 1, 2);
        assert_eq!(a, b);
        assert_eq!(brush.reference_frames.lock().unwrap().len(), 1);
        let c = brush.get_reference_frame(4, 1, 3);
        assert_ne!(a.position, c.position);
        assert_eq!(brush.reference_frames.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_reference_frame_on_empty_geometry() {
        let brush = Brush::new(BrushCreateInfo::new("empty", Geometry::new("empty")));
        let frame = brush.get_reference_frame(4, 0, 0);
        assert!(frame.n.is_finite());
        assert_eq!(frame.scale(), 0.0);
    }

    #[test]
    fn test_make_instance() {
        let brush = Brush::new(
            BrushCreateInfo::new("cube", make_cube(1.0))
                .with_density(2.0)
                .with_volume(1.0)
                .with_collision_shape(Arc::new(BoxShape::new(Vec3::splat(0.5)))),
        );
        let info = InstanceCreateInfo {
            transform: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            material: Some(MaterialId(4)),
            scale: 2.0,
            ..Default::default()
        };
        let node = brush.make_instance(&info);
        assert_eq!(node.name, "cube");
        assert_eq!(node.local_transform.position, Vec3::new(1.0, 2.0, 3.0));
        let mesh = node.content.as_mesh().unwrap();
        assert_eq!(mesh.material, Some(MaterialId(4)));
        let scaled = brush.get_scaled(2.0);
        assert!(Arc::ptr_eq(&mesh.geometry, &scaled.geometry));
        assert!(Arc::ptr_eq(mesh.raytrace.as_ref().unwrap(), &scaled.raytrace));
        let physics = mesh.physics.as_ref().unwrap();
        assert!((physics.mass - 16.0).abs() < EPS);
        assert_eq!(physics.local_inertia, scaled.local_inertia);
    }

    #[test]
    fn test_make_instance_without_physics() {
        let brush = Brush::new(BrushCreateInfo::new("cube", make_cube(1.0)).with_physics(false));
        let node = brush.make_instance(&InstanceCreateInfo::default());
        assert!(node.content.as_mesh().unwrap().physics.is_none());

        let brush = cube_brush();
        let node = brush.make_instance(&InstanceCreateInfo {
            physics: false,
            layer: SceneLayer::Tool,
            name: Some("preview".to_string()),
            ..Default::default()
        });
        assert_eq!(node.layer, SceneLayer::Tool);
        assert_eq!(node.name, "preview");
        assert!(node.content.as_mesh().unwrap().physics.is_none());
    }

    #[test]
    fn test_bounding_box_is_unit_scale() {
        let brush = cube_brush();
        let _ = brush.get_scaled(4.0);
        let bounds = brush.get_bounding_box();
        assert!((bounds.size() - Vec3::ONE).length() < EPS);
    }

    #[test]
    fn test_normal_style_reaches_primitive() {
        let brush = Brush::new(
            BrushCreateInfo::new("cube", make_cube(1.0)).with_normal_style(NormalStyle::PointNormals),
        );
        assert_eq!(brush.get_scaled(1.0).primitive.normal_style, NormalStyle::PointNormals);
        assert_eq!(brush.get_scaled(2.0).primitive.normal_style, NormalStyle::PointNormals);
    }

    #[test]
    fn test_brush_is_shareable_across_threads() {
        let brush = Arc::new(cube_brush());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let brush = brush.clone();
                std::thread::spawn(move || brush.get_scaled(2.0))
            })
            .collect();
        let entries: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for entry in &entries[1..] {
            assert!(Arc::ptr_eq(entry, &entries[0]));
        }
        assert_eq!(brush.scaled_count(), 1);
    }
}
