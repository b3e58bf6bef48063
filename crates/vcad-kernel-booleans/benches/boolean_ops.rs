//! Criterion benchmarks for vcad-kernel-booleans.
//!
//! Measures:
//! - Micro-benchmarks: predicates, spatial grid queries, the pairwise
//!   triangle intersector.
//! - Macro-benchmarks: full `boolean()` calls across disjoint, overlapping,
//!   and open-surface inputs.
//! - Scaling benchmarks: `boolean()` cost against mesh resolution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vcad_kernel_booleans::grid::{cell_size_for, SpatialGrid};
use vcad_kernel_booleans::ssi::{intersect_mesh_pair_tagged, tri_tri_intersect};
use vcad_kernel_booleans::{boolean, BooleanOp};
use vcad_kernel_math::predicates::{incircle, orient2d, orient3d};
use vcad_kernel_math::{Plane2, Point2, Point3};
use vcad_kernel_mesh::fixtures::{make_cube, make_flat_patch};
use vcad_kernel_mesh::Triangle;

fn tri(v0: (f64, f64, f64), v1: (f64, f64, f64), v2: (f64, f64, f64)) -> Triangle {
    Triangle::new(
        Point3::new(v0.0, v0.1, v0.2),
        Point3::new(v1.0, v1.1, v1.2),
        Point3::new(v2.0, v2.1, v2.2),
    )
    .unwrap()
}

fn bench_predicates(c: &mut Criterion) {
    let a2 = Point2::new(0.0, 0.0);
    let b2 = Point2::new(1.0, 0.0);
    let c2 = Point2::new(0.5, 1.0);
    let d2 = Point2::new(0.5, 0.3);

    c.bench_function("orient2d", |bencher| {
        bencher.iter(|| orient2d(black_box(&a2), black_box(&b2), black_box(&c2)))
    });
    c.bench_function("incircle", |bencher| {
        bencher.iter(|| incircle(black_box(&a2), black_box(&b2), black_box(&c2), black_box(&d2)))
    });

    let a3 = Point3::new(0.0, 0.0, 0.0);
    let b3 = Point3::new(1.0, 0.0, 0.0);
    let c3 = Point3::new(0.0, 1.0, 0.0);
    let d3 = Point3::new(0.3, 0.3, 1.0);
    c.bench_function("orient3d", |bencher| {
        bencher.iter(|| orient3d(black_box(&a3), black_box(&b3), black_box(&c3), black_box(&d3)))
    });
}

fn bench_spatial_grid(c: &mut Criterion) {
    let cube = make_cube(Point3::origin(), 2.0);
    let cell_size = cell_size_for(&cube);
    let grid = SpatialGrid::build(&cube, cell_size, Plane2::Xy);
    let bb = cube[0].aabb().project(Plane2::Xy);

    c.bench_function("spatial_grid_build_cube", |bencher| {
        bencher.iter(|| SpatialGrid::build(black_box(&cube), cell_size, Plane2::Xy))
    });
    c.bench_function("spatial_grid_query_box", |bencher| {
        bencher.iter(|| grid.query_box(black_box(&bb)))
    });
}

fn bench_tri_tri_intersect(c: &mut Criterion) {
    let a = tri((0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (1.0, 2.0, 0.0));
    let b = tri((1.0, 1.0, -1.0), (1.0, 1.0, 1.0), (1.0, -1.0, 0.0));
    c.bench_function("tri_tri_intersect_crossing", |bencher| {
        bencher.iter(|| tri_tri_intersect(black_box(&a), black_box(&b)))
    });
}

fn bench_intersect_mesh_pair(c: &mut Criterion) {
    let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
    c.bench_function("intersect_mesh_pair_tagged_overlapping_cubes", |bencher| {
        bencher.iter(|| intersect_mesh_pair_tagged(black_box(&a), black_box(&b)))
    });
}

fn bench_boolean_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");

    let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
    group.bench_function("overlapping_cubes_subtract", |bencher| {
        bencher.iter(|| boolean(black_box(&a), black_box(&b), BooleanOp::Subtract))
    });
    group.bench_function("overlapping_cubes_union", |bencher| {
        bencher.iter(|| boolean(black_box(&a), black_box(&b), BooleanOp::Union))
    });
    group.bench_function("overlapping_cubes_intersect", |bencher| {
        bencher.iter(|| boolean(black_box(&a), black_box(&b), BooleanOp::Intersect))
    });

    let disjoint_a = make_cube(Point3::new(0.0, 0.0, 0.0), 1.0);
    let disjoint_b = make_cube(Point3::new(10.0, 10.0, 10.0), 1.0);
    group.bench_function("disjoint_cubes_union", |bencher| {
        bencher.iter(|| boolean(black_box(&disjoint_a), black_box(&disjoint_b), BooleanOp::Union))
    });

    let patch_a = make_flat_patch(Point3::new(0.0, 0.0, 5.0), 10.0, 10.0, 4, 4);
    let patch_b = make_flat_patch(Point3::new(0.0, 0.0, 5.5), 8.0, 8.0, 4, 4);
    group.bench_function("flat_patches_subtract", |bencher| {
        bencher.iter(|| boolean(black_box(&patch_a), black_box(&patch_b), BooleanOp::Subtract))
    });

    group.finish();
}

fn bench_boolean_by_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean_by_resolution");
    for div in [2u32, 4, 8] {
        let a = make_flat_patch(Point3::new(0.0, 0.0, 0.0), 10.0, 10.0, div, div);
        let b = make_flat_patch(Point3::new(0.0, 0.0, 0.5), 10.0, 10.0, div, div);
        group.bench_with_input(BenchmarkId::from_parameter(div), &div, |bencher, _| {
            bencher.iter(|| boolean(black_box(&a), black_box(&b), BooleanOp::Subtract))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_predicates,
    bench_spatial_grid,
    bench_tri_tri_intersect,
    bench_intersect_mesh_pair,
    bench_boolean_ops,
    bench_boolean_by_resolution
);
criterion_main!(benches);
