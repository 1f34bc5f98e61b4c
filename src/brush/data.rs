//! Brush creation parameters.

use std::fmt;
use std::sync::Arc;

use crate::geometry::Geometry;
use crate::physics::{CollisionShape, ShapeGenerator, VolumeCalculator};
use crate::render::{NormalStyle, PrimitiveBuildInfo};

/// Deferred geometry producer, called at most once
pub type GeometryGenerator = Box<dyn Fn() -> Geometry + Send + Sync>;

/// Unit-scale geometry of a brush: either already built or still pending.
pub enum GeometrySource {
    Pending(GeometryGenerator),
    Realized(Arc<Geometry>),
}

impl GeometrySource {
    pub fn from_generator(generator: impl Fn() -> Geometry + Send + Sync + 'static) -> Self {
        GeometrySource::Pending(Box::new(generator))
    }

    pub fn is_realized(&self) -> bool {
        matches!(self, GeometrySource::Realized(_))
    }
}

impl From<Geometry> for GeometrySource {
    fn from(geometry: Geometry) -> Self {
        GeometrySource::Realized(Arc::new(geometry))
    }
}

impl From<Arc<Geometry>> for GeometrySource {
    fn from(geometry: Arc<Geometry>) -> Self {
        GeometrySource::Realized(geometry)
    }
}

impl fmt::Debug for GeometrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometrySource::Pending(_) => f.write_str("Pending"),
            GeometrySource::Realized(geometry) => {
                f.debug_tuple("Realized").field(&geometry.name).finish()
            }
        }
    }
}

/// Per-brush settings that are not geometry.
#[derive(Clone)]
pub struct BrushData {
    pub name: String,
    pub build_info: PrimitiveBuildInfo,
    pub density: f32,
    /// Unit-scale volume; zero means "derive it"
    pub volume: f32,
    pub collision_shape: Option<Arc<dyn CollisionShape>>,
    /// Builds a shape for an arbitrary scale, used when no explicit shape is set
    pub collision_shape_generator: Option<ShapeGenerator>,
    pub collision_volume_calculator: Option<VolumeCalculator>,
    pub physics_enabled: bool,
}

impl Default for BrushData {
    fn default() -> Self {
        Self {
            name: String::new(),
            build_info: PrimitiveBuildInfo::default(),
            density: 1.0,
            volume: 0.0,
            collision_shape: None,
            collision_shape_generator: None,
            collision_volume_calculator: None,
            physics_enabled: true,
        }
    }
}

impl fmt::Debug for BrushData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrushData")
            .field("name", &self.name)
            .field("build_info", &self.build_info)
            .field("density", &self.density)
            .field("volume", &self.volume)
            .field("collision_shape", &self.collision_shape)
            .field("has_shape_generator", &self.collision_shape_generator.is_some())
            .field("has_volume_calculator", &self.collision_volume_calculator.is_some())
            .field("physics_enabled", &self.physics_enabled)
            .finish()
    }
}

/// Everything needed to construct a [`Brush`](super::Brush).
///
/// ```
/// use rkedit::brush::BrushCreateInfo;
/// use rkedit::geometry::shapes::make_cube;
///
/// let info = BrushCreateInfo::from_generator("cube", || make_cube(1.0))
///     .with_density(2.0)
///     .with_volume(1.0);
/// assert_eq!(info.data.density, 2.0);
/// ```
#[derive(Debug)]
pub struct BrushCreateInfo {
    pub geometry: GeometrySource,
    pub data: BrushData,
}

impl BrushCreateInfo {
    pub fn new(name: impl Into<String>, geometry: impl Into<GeometrySource>) -> Self {
        Self {
            geometry: geometry.into(),
            data: BrushData {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn from_generator(
        name: impl Into<String>,
        generator: impl Fn() -> Geometry + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, GeometrySource::from_generator(generator))
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.data.density = density;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.data.volume = volume;
        self
    }

    pub fn with_normal_style(mut self, normal_style: NormalStyle) -> Self {
        self.data.build_info.normal_style = normal_style;
        self
    }

    pub fn with_build_info(mut self, build_info: PrimitiveBuildInfo) -> Self {
        self.data.build_info = build_info;
        self
    }

    pub fn with_collision_shape(mut self, shape: Arc<dyn CollisionShape>) -> Self {
        self.data.collision_shape = Some(shape);
        self
    }

    pub fn with_collision_shape_generator(
        mut self,
        generator: impl Fn(f32) -> Arc<dyn CollisionShape> + Send + Sync + 'static,
    ) -> Self {
        self.data.collision_shape_generator = Some(Arc::new(generator));
        self
    }

    pub fn with_collision_volume_calculator(mut self, calculator: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        self.data.collision_volume_calculator = Some(Arc::new(calculator));
        self
    }

    pub fn with_physics(mut self, enabled: bool) -> Self {
        self.data.physics_enabled = enabled;
        self
    }
}
