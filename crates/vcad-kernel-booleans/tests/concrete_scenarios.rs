//! Integration tests exercising the full `boolean()` pipeline against
//! concrete geometric scenarios, plus the pairwise and utility hooks used
//! directly by callers.

use vcad_kernel_booleans::classify::{classify_point_multi_axis, Classification, TriGrids};
use vcad_kernel_booleans::polyline::{chain_segments, simplify_polyline};
use vcad_kernel_booleans::ssi::{tri_tri_intersect, Segment};
use vcad_kernel_booleans::{boolean, BooleanOp};
use vcad_kernel_math::Point3;
use vcad_kernel_mesh::fixtures::{make_cube, make_flat_patch};
use vcad_kernel_mesh::{IndexedMesh, Triangle};

#[test]
fn overlapping_cubes_subtract_has_no_open_edges() {
    let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
    let result = boolean(&a, &b, BooleanOp::Subtract).expect("subtract should produce a result");
    assert!(!result.soup.is_empty());

    let mesh = IndexedMesh {
        points: result.points,
        triangles: result.triangles,
    };
    assert!(mesh.edge_use_counts().values().all(|&count| count <= 2));
}

#[test]
fn overlapping_cubes_union_has_at_least_as_many_triangles_as_subtract() {
    let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
    let subtract = boolean(&a, &b, BooleanOp::Subtract).unwrap();
    let union = boolean(&a, &b, BooleanOp::Union).unwrap();
    assert!(union.triangles.len() >= subtract.triangles.len());
}

#[test]
fn overlapping_cubes_intersect_is_bounded_by_input_size() {
    let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
    let result = boolean(&a, &b, BooleanOp::Intersect).expect("overlapping cubes must intersect");
    assert!(!result.soup.is_empty());
    assert!(result.soup.len() <= 3 * (a.len() + b.len()));
}

#[test]
fn disjoint_cubes_intersect_is_null() {
    let a = make_cube(Point3::new(0.0, 0.0, 0.0), 1.0);
    let b = make_cube(Point3::new(10.0, 10.0, 10.0), 1.0);
    assert!(boolean(&a, &b, BooleanOp::Intersect).is_none());
}

#[test]
fn overlapping_flat_patches_subtract_does_not_panic() {
    let a = make_flat_patch(Point3::new(0.0, 0.0, 5.0), 10.0, 10.0, 4, 4);
    let b = make_flat_patch(Point3::new(0.0, 0.0, 5.5), 8.0, 8.0, 4, 4);
    // Either a null or a non-empty result is acceptable on open surfaces;
    // the contract is that this does not panic.
    let _ = boolean(&a, &b, BooleanOp::Subtract);
}

#[test]
fn point_classifier_inside_and_outside_cube() {
    let cube = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    let grids = TriGrids::build(&cube);
    assert_eq!(
        classify_point_multi_axis(&Point3::new(0.3, 0.2, -0.5), &grids),
        Classification::Inside
    );
    assert_eq!(
        classify_point_multi_axis(&Point3::new(5.0, 5.0, 0.0), &grids),
        Classification::Outside
    );

    let larger_cube = make_cube(Point3::new(0.0, 0.0, 0.0), 4.0);
    let larger_grids = TriGrids::build(&larger_cube);
    assert_eq!(
        classify_point_multi_axis(&Point3::new(0.7, 0.3, -0.2), &larger_grids),
        Classification::Inside
    );
}

#[test]
fn tri_tri_intersect_nonparallel_triangles_cross() {
    let a = Triangle::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(1.0, 2.0, 0.0),
    )
    .unwrap();
    let b = Triangle::new(
        Point3::new(1.0, 1.0, -1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(1.0, -1.0, 0.0),
    )
    .unwrap();
    let segment = tri_tri_intersect(&a, &b).expect("expected a non-null intersection");
    assert!(segment.length() > 1e-8);
}

#[test]
fn tri_tri_intersect_parallel_planes_at_different_heights_is_null() {
    let a = Triangle::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(1.0, 2.0, 0.0),
    )
    .unwrap();
    let b = Triangle::new(
        Point3::new(0.0, 0.0, 5.0),
        Point3::new(2.0, 0.0, 5.0),
        Point3::new(1.0, 2.0, 5.0),
    )
    .unwrap();
    assert!(tri_tri_intersect(&a, &b).is_none());
}

#[test]
fn chain_segments_forms_one_polyline_from_collinear_chain() {
    let segments = vec![
        Segment {
            p0: Point3::new(0.0, 0.0, 0.0),
            p1: Point3::new(1.0, 0.0, 0.0),
        },
        Segment {
            p0: Point3::new(1.0, 0.0, 0.0),
            p1: Point3::new(2.0, 0.0, 0.0),
        },
        Segment {
            p0: Point3::new(2.0, 0.0, 0.0),
            p1: Point3::new(3.0, 0.0, 0.0),
        },
    ];
    let chains = chain_segments(&segments, 0.01);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].len(), 4);
}

#[test]
fn simplify_polyline_reduces_dense_sampling() {
    let points: Vec<Point3> = (0..100).map(|i| Point3::new(i as f64 * 0.1, 0.0, 0.0)).collect();
    let simplified = simplify_polyline(&points, 1.0);
    assert!(simplified.len() < 101);
    assert_eq!(simplified.first(), points.first());
    assert_eq!(simplified.last(), points.last());
}
