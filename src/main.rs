//! Headless brush placement walkthrough.
//!
//! Usage: cargo run -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Brush settings JSON (default: built-in settings)
//!   --brush <NAME>    Brush to place (default: "cube")
//!   --scale <SCALE>   Fixed placement scale; disables scale matching

use std::process::ExitCode;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use rkedit::brush::{BrushLibrary, Brushes, BrushesConfig};
use rkedit::core::{logging, Error, Result};
use rkedit::geometry::shapes::make_grid_plane;
use rkedit::math::Ray;
use rkedit::render::Material;
use rkedit::scene::{LocalTransform, MeshContent, NewNode, NodeContent, OperationStack, SceneGraph, SceneLayer};

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = match parse_str_arg(&args, "--config") {
        Some(path) => BrushesConfig::load(path)?,
        None => BrushesConfig::default(),
    };
    let brush_name = parse_str_arg(&args, "--brush").unwrap_or_else(|| "cube".to_string());

    let mut library = BrushLibrary::new();
    let stone = library.add_material(Material::new("stone", Vec4::new(0.55, 0.53, 0.5, 1.0)).with_roughness(0.9));
    library.add_material(Material::new("brass", Vec4::new(0.78, 0.6, 0.25, 1.0)).with_metallic(1.0));
    library.register_default_brushes(config.default_density);

    let brush = library
        .find_brush(&brush_name)
        .ok_or_else(|| Error::Library(format!("unknown brush {}", brush_name)))?;

    let mut scene = SceneGraph::new();
    let root = scene.root();
    let floor = scene.add_node(
        root,
        NewNode {
            name: "floor".to_string(),
            layer: SceneLayer::Content,
            local_transform: LocalTransform::identity(),
            content: NodeContent::Mesh(MeshContent::from_geometry(Arc::new(make_grid_plane(8.0, 8)), Some(stone))),
        },
    )?;

    let mut brushes = Brushes::new(config);
    if let Some(scale) = parse_f32_arg(&args, "--scale") {
        brushes.set_scale(scale);
    }
    brushes.select_brush(Some(&brush), &mut scene);
    brushes.set_material(Some(stone));
    let mut operations = OperationStack::new();

    // First brush on the floor, second one stacked on top of it
    let mut placed = Vec::new();
    for origin in [Vec3::new(0.3, 10.0, 0.6), Vec3::new(0.35, 10.0, 0.55)] {
        let hover = scene
            .raycast(&Ray::new(origin, Vec3::NEG_Y))
            .ok_or_else(|| Error::Placement(format!("nothing under {}", origin)))?;
        log::info!(
            "Hovering {:?} polygon {:?} at {:?}",
            hover.mesh,
            hover.polygon,
            hover.position
        );
        brushes.on_motion(hover, &mut scene);
        log::info!("Placement state: {:?}", brushes.state());

        let id = brushes.try_insert(&mut scene, &mut operations)?;
        if let Some(world) = scene.world_transform(id) {
            log::info!("{} placed at {}", brush.name(), world.transform_point3(Vec3::ZERO));
        }
        placed.push(id);
    }
    log::info!("Scene has {} nodes under floor {:?}", scene.node_count(), floor);

    operations.undo(&mut scene)?;
    log::info!("After undo: {} nodes", scene.node_count());
    operations.redo(&mut scene)?;
    log::info!("After redo: {} nodes", scene.node_count());

    if let Some(&last) = placed.last() {
        let converted = library.brush_from_mesh(&scene, last, brush.density())?;
        log::info!(
            "Converted {:?} into brush {} (volume {:.3})",
            last,
            converted.name(),
            converted.get_scaled(1.0).volume
        );
    }

    for brush in library.brushes() {
        for scale in [0.5, 1.0, 2.0] {
            let scaled = brush.get_scaled(scale);
            log::info!(
                "{:>18} x{:<3} volume {:>8.4} mass {:>8.4} inertia diag {:?}",
                brush.name(),
                scale,
                scaled.volume,
                scaled.mass,
                [
                    scaled.local_inertia.x_axis.x,
                    scaled.local_inertia.y_axis.y,
                    scaled.local_inertia.z_axis.z,
                ]
            );
        }
    }

    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
