// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use metalweight::geometry::{enclosed_volume, is_closed, Primitive};
use metalweight::host::Scene;
use metalweight::{accumulate, GeometryKind, UnitSystem, VolumeAccumulator};
use nalgebra::Vector3;

fn build_scene(count: usize) -> Scene {
    let mut scene = Scene::new(UnitSystem::Millimeters, 1e-6);
    for i in 0..count {
        let (kind, mesh) = match i % 4 {
            0 => (GeometryKind::Solid, Primitive::cube(Vector3::new(10.0, 10.0, 10.0), false).to_mesh()),
            1 => (GeometryKind::Solid, Primitive::cylinder(20.0, 5.0, 32).to_mesh()),
            2 => (GeometryKind::Mesh, Primitive::sphere(10.0, 32).to_mesh()),
            _ => (GeometryKind::Solid, Primitive::plane(10.0, 10.0).to_mesh()),
        };
        scene.add(format!("part-{}", i), kind, mesh, false);
    }
    scene
}

fn bench_oracles(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracles");

    let sphere = Primitive::sphere(10.0, 64).to_mesh();
    group.bench_function("is_closed_sphere_64", |b| {
        b.iter(|| is_closed(black_box(&sphere), 1e-6));
    });
    group.bench_function("volume_sphere_64", |b| {
        b.iter(|| enclosed_volume(black_box(&sphere)));
    });

    group.finish();
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");
    group.sample_size(20);

    for count in [16, 128, 512] {
        let scene = build_scene(count);
        group.bench_with_input(BenchmarkId::new("global_pool", count), scene.objects(), |b, objects| {
            b.iter(|| accumulate(black_box(objects)));
        });
    }

    let scene = build_scene(128);
    for threads in [1, 4] {
        if let Ok(accumulator) = VolumeAccumulator::with_threads(threads) {
            group.bench_with_input(BenchmarkId::new("threads", threads), scene.objects(), |b, objects| {
                b.iter(|| accumulator.run(black_box(objects), &()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_oracles, bench_accumulate);
criterion_main!(benches);
