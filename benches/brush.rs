use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion, black_box};

use rkedit::brush::{Brush, BrushCreateInfo, ReferenceFrame};
use rkedit::geometry::shapes::{make_grid_plane, make_rock};
use rkedit::math::Ray;
use rkedit::scene::{LocalTransform, MeshContent, NewNode, NodeContent, SceneGraph, SceneLayer};

use glam::Vec3;

fn rock_brush() -> Brush {
    Brush::new(BrushCreateInfo::from_generator("rock", || make_rock(3, 1.0, 16)))
}

fn bench_reference_frame(c: &mut Criterion) {
    let rock = make_rock(3, 1.0, 16);
    let polygons = rock.polygon_count();

    c.bench_function("reference_frame_new", |b| {
        let mut polygon = 0u32;
        b.iter(|| {
            polygon = (polygon + 1) % polygons;
            ReferenceFrame::new(black_box(&rock), polygon, 0, 1)
        });
    });
}

fn bench_scaled_cache_hit(c: &mut Criterion) {
    let brush = rock_brush();
    brush.get_scaled(2.0);

    c.bench_function("get_scaled_hit", |b| {
        b.iter(|| brush.get_scaled(black_box(2.0)));
    });
}

fn bench_create_scaled(c: &mut Criterion) {
    let brush = rock_brush();
    brush.late_initialize();

    c.bench_function("create_scaled_rock_16", |b| {
        b.iter(|| brush.create_scaled(black_box(3 * 65536 / 2)));
    });
}

fn bench_scene_raycast(c: &mut Criterion) {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let floor = Arc::new(make_grid_plane(64.0, 64));
    scene
        .add_node(
            root,
            NewNode {
                name: "floor".to_string(),
                layer: SceneLayer::Content,
                local_transform: LocalTransform::identity(),
                content: NodeContent::Mesh(MeshContent::from_geometry(floor, None)),
            },
        )
        .expect("root exists");

    c.bench_function("scene_raycast_floor_64", |b| {
        let mut frame = 0u32;
        b.iter(|| {
            frame += 1;
            let x = (frame as f32 * 0.37).sin() * 30.0;
            let z = (frame as f32 * 0.21).cos() * 30.0;
            scene.raycast(black_box(&Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)))
        });
    });
}

criterion_group!(
    benches,
    bench_reference_frame,
    bench_scaled_cache_hit,
    bench_create_scaled,
    bench_scene_raycast,
);

criterion_main!(benches);
