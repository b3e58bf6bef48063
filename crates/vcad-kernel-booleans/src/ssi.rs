//! Triangle–triangle and mesh-pair intersection.
//!
//! Implements Möller's separating-axis test for a single triangle pair
//! ([`tri_tri_intersect`] / [`tri_tri_intersect_detailed`]), and the
//! mesh-pair sweep ([`intersect_mesh_pair_tagged`]) that uses a
//! [`crate::grid::SpatialGrid`] on one mesh to avoid an O(n*m) triangle
//! comparison.

use std::collections::HashMap;

use vcad_kernel_math::predicates::unit_normals_near_parallel;
use vcad_kernel_math::{triangle_normal_raw, Plane2, Point3, Vec3};
use vcad_kernel_mesh::Triangle;

use crate::grid::{cell_size_for, SpatialGrid};

/// Near-coplanar reject: triangle pairs whose unit normals agree to within
/// this dot-product threshold are treated as non-intersecting.
pub const COPLANAR_THRESHOLD: f64 = 0.9999;
/// Minimum length of the candidate intersection-line direction.
pub const LINE_DIRECTION_EPS: f64 = 1e-12;
/// Minimum magnitude of the 2x2 Cramer determinant used to pick a point on
/// the intersection line.
pub const CRAMER_EPS: f64 = 1e-12;
/// A vertex within this signed distance of the opposing plane is treated as
/// lying on it.
pub const ON_PLANE_EPS: f64 = 1e-10;
/// Minimum width of the overlapping parametric interval.
pub const INTERVAL_EPS: f64 = 1e-10;
/// Minimum reconstructed segment length.
pub const SEGMENT_LENGTH_EPS: f64 = 1e-8;

/// A 3D line segment: the intersection of two triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub p0: Point3,
    /// Second endpoint.
    pub p1: Point3,
}

impl Segment {
    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        vcad_kernel_math::distance(&self.p0, &self.p1)
    }
}

/// A [`Segment`] tagged with the indices of its two source triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedSegment {
    /// The segment itself.
    pub segment: Segment,
    /// Index of the source triangle in soup A.
    pub idx_a: usize,
    /// Index of the source triangle in soup B.
    pub idx_b: usize,
}

/// Per-triangle signed vertex distances to the opposing plane, plus the
/// resulting segment length, returned by [`tri_tri_intersect_detailed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionDetail {
    /// Signed distances of triangle A's three vertices to plane(B).
    pub dist_a: [f64; 3],
    /// Signed distances of triangle B's three vertices to plane(A).
    pub dist_b: [f64; 3],
    /// Length of the resulting intersection segment.
    pub segment_length: f64,
}

/// Test two triangles for intersection, returning the 3D segment where
/// their surfaces cross, or `None` if they don't intersect (including the
/// near-coplanar and face-overlap cases, which this test deliberately does
/// not resolve into a segment).
pub fn tri_tri_intersect(a: &Triangle, b: &Triangle) -> Option<Segment> {
    tri_tri_intersect_inner(a, b).map(|(seg, _)| seg)
}

/// As [`tri_tri_intersect`], but also returns the signed vertex distances
/// used along the way.
pub fn tri_tri_intersect_detailed(a: &Triangle, b: &Triangle) -> Option<(Segment, IntersectionDetail)> {
    tri_tri_intersect_inner(a, b)
}

fn tri_tri_intersect_inner(a: &Triangle, b: &Triangle) -> Option<(Segment, IntersectionDetail)> {
    let a_verts = a.vertices();
    let b_verts = b.vertices();

    let n_a = triangle_normal_raw(&a.v0, &a.v1, &a.v2);
    let n_b = triangle_normal_raw(&b.v0, &b.v1, &b.v2);
    let n_a_len = n_a.norm();
    let n_b_len = n_b.norm();
    if n_a_len < LINE_DIRECTION_EPS || n_b_len < LINE_DIRECTION_EPS {
        return None;
    }
    let unit_a = n_a / n_a_len;
    let unit_b = n_b / n_b_len;

    // Step 1/2: early-out if all of one triangle's vertices are strictly on
    // one side of the other triangle's plane.
    let dist_a: [f64; 3] = a_verts.map(|v| signed_distance(&v, &b.v0, &n_b));
    if all_same_strict_sign(&dist_a) {
        return None;
    }
    let dist_b: [f64; 3] = b_verts.map(|v| signed_distance(&v, &a.v0, &n_a));
    if all_same_strict_sign(&dist_b) {
        return None;
    }

    // Step 3: near-coplanar reject.
    if unit_normals_near_parallel(&unit_a, &unit_b, COPLANAR_THRESHOLD) {
        return None;
    }

    // Step 4: line of intersection between the two planes.
    let direction = n_a.cross(&n_b);
    let dir_len = direction.norm();
    if dir_len < LINE_DIRECTION_EPS {
        return None;
    }
    let unit_dir = direction / dir_len;

    let reference = point_on_both_planes(&unit_dir, &a.v0, &n_a, &b.v0, &n_b)?;

    // Step 5: parametric interval of each triangle along the line.
    let interval_a = triangle_interval(&a_verts, &dist_a, &reference, &unit_dir)?;
    let interval_b = triangle_interval(&b_verts, &dist_b, &reference, &unit_dir)?;

    // Step 6: clip intervals.
    let lo = interval_a.0.max(interval_b.0);
    let hi = interval_a.1.min(interval_b.1);
    if hi - lo < INTERVAL_EPS {
        return None;
    }

    // Step 7: materialise endpoints.
    let p0 = reference + unit_dir * lo;
    let p1 = reference + unit_dir * hi;
    let segment = Segment { p0, p1 };
    if segment.length() < SEGMENT_LENGTH_EPS {
        return None;
    }

    let detail = IntersectionDetail {
        dist_a,
        dist_b,
        segment_length: segment.length(),
    };
    Some((segment, detail))
}

fn signed_distance(p: &Point3, plane_point: &Point3, plane_normal: &Vec3) -> f64 {
    (p - plane_point).dot(plane_normal)
}

fn all_same_strict_sign(d: &[f64; 3]) -> bool {
    (d.iter().all(|&x| x > ON_PLANE_EPS)) || (d.iter().all(|&x| x < -ON_PLANE_EPS))
}

/// Find a point lying on both planes by zeroing the dominant component of
/// `direction` and solving the remaining 2x2 system via Cramer's rule.
fn point_on_both_planes(
    direction: &Vec3,
    point_a: &Point3,
    normal_a: &Vec3,
    point_b: &Point3,
    normal_b: &Vec3,
) -> Option<Point3> {
    let abs = [direction.x.abs(), direction.y.abs(), direction.z.abs()];
    let dominant = if abs[0] >= abs[1] && abs[0] >= abs[2] {
        0
    } else if abs[1] >= abs[2] {
        1
    } else {
        2
    };

    let (i, j) = match dominant {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let d_a = normal_a.dot(&point_a.coords);
    let d_b = normal_b.dot(&point_b.coords);

    let m00 = normal_a[i];
    let m01 = normal_a[j];
    let m10 = normal_b[i];
    let m11 = normal_b[j];

    let det = m00 * m11 - m01 * m10;
    if det.abs() < CRAMER_EPS {
        return None;
    }

    let x_i = (d_a * m11 - d_b * m01) / det;
    let x_j = (m00 * d_b - m10 * d_a) / det;

    let mut coords = [0.0; 3];
    coords[i] = x_i;
    coords[j] = x_j;
    coords[dominant] = 0.0;
    Some(Point3::new(coords[0], coords[1], coords[2]))
}

/// Parametric interval `[min, max]` of a triangle's intersection with the
/// line `reference + t * direction`, built from edges that cross the
/// opposing plane plus any vertex lying on it.
fn triangle_interval(
    verts: &[Point3; 3],
    dist: &[f64; 3],
    reference: &Point3,
    direction: &Vec3,
) -> Option<(f64, f64)> {
    let mut params: Vec<f64> = Vec::with_capacity(2);

    for k in 0..3 {
        let l = k;
        let r = (k + 1) % 3;
        if dist[l].abs() < ON_PLANE_EPS {
            params.push(project_param(&verts[l], reference, direction));
        }
        if (dist[l] > 0.0) != (dist[r] > 0.0) && dist[l].abs() >= ON_PLANE_EPS && dist[r].abs() >= ON_PLANE_EPS {
            let t = dist[l] / (dist[l] - dist[r]);
            let crossing = vcad_kernel_math::lerp(&verts[l], &verts[r], t);
            params.push(project_param(&crossing, reference, direction));
        }
    }

    if params.len() < 2 {
        return None;
    }
    let min = params.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = params.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

fn project_param(p: &Point3, reference: &Point3, direction: &Vec3) -> f64 {
    (p - reference).dot(direction)
}

/// A mapping from triangle index to every tagged segment touching it.
pub type CrossedSet = HashMap<usize, Vec<TaggedSegment>>;

/// Find every intersection segment between triangles of `soup_a` and
/// `soup_b`, each tagged with its source indices.
///
/// Builds a spatial grid on `soup_b` in the XY projection (cell size
/// `max(2*avgEdge(B), 0.1)`), then for each triangle of `soup_a` queries
/// candidates by its projected AABB and runs [`tri_tri_intersect`] on each
/// candidate pair.
pub fn intersect_mesh_pair_tagged(soup_a: &[Triangle], soup_b: &[Triangle]) -> Vec<TaggedSegment> {
    if soup_a.is_empty() || soup_b.is_empty() {
        return Vec::new();
    }

    let cell_size = cell_size_for(soup_b);
    let grid = SpatialGrid::build(soup_b, cell_size, Plane2::Xy);

    let mut out = Vec::new();
    for (idx_a, tri_a) in soup_a.iter().enumerate() {
        let bb2 = tri_a.aabb().project(Plane2::Xy);
        for idx_b in grid.query_box(&bb2) {
            let tri_b = &soup_b[idx_b];
            if let Some(segment) = tri_tri_intersect(tri_a, tri_b) {
                out.push(TaggedSegment {
                    segment,
                    idx_a,
                    idx_b,
                });
            }
        }
    }
    out
}

/// Partition a list of tagged segments into a [`CrossedSet`] keyed by
/// `idx_a` (pass `true`) or `idx_b` (pass `false`).
pub fn crossed_set_by(segments: &[TaggedSegment], by_a: bool) -> CrossedSet {
    let mut set: CrossedSet = HashMap::new();
    for &seg in segments {
        let key = if by_a { seg.idx_a } else { seg.idx_b };
        set.entry(key).or_default().push(seg);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcad_kernel_mesh::fixtures::make_cube;

    fn tri(v0: (f64, f64, f64), v1: (f64, f64, f64), v2: (f64, f64, f64)) -> Triangle {
        Triangle::new(
            Point3::new(v0.0, v0.1, v0.2),
            Point3::new(v1.0, v1.1, v1.2),
            Point3::new(v2.0, v2.1, v2.2),
        )
        .unwrap()
    }

    #[test]
    fn test_tri_tri_intersect_crossing_pair() {
        let a = tri((0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (1.0, 2.0, 0.0));
        let b = tri((1.0, 1.0, -1.0), (1.0, 1.0, 1.0), (1.0, -1.0, 0.0));
        let segment = tri_tri_intersect(&a, &b).expect("expected an intersection segment");
        assert!(segment.length() > SEGMENT_LENGTH_EPS);
    }

    #[test]
    fn test_tri_tri_intersect_parallel_planes_no_hit() {
        let a = tri((0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (1.0, 2.0, 0.0));
        let b = tri((0.0, 0.0, 5.0), (2.0, 0.0, 5.0), (1.0, 2.0, 5.0));
        assert!(tri_tri_intersect(&a, &b).is_none());
    }

    #[test]
    fn test_tri_tri_intersect_coplanar_reject() {
        let a = tri((0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (1.0, 2.0, 0.0));
        let b = tri((0.5, 0.5, 0.0), (3.0, 0.5, 0.0), (1.5, 3.0, 0.0));
        assert!(tri_tri_intersect(&a, &b).is_none());
    }

    #[test]
    fn test_tri_tri_intersect_disjoint_bboxes() {
        let a = tri((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0));
        let b = tri((100.0, 100.0, 100.0), (101.0, 100.0, 100.0), (100.0, 101.0, 100.0));
        assert!(tri_tri_intersect(&a, &b).is_none());
    }

    #[test]
    fn test_intersect_mesh_pair_tagged_overlapping_cubes() {
        let cube_a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let cube_b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
        let segments = intersect_mesh_pair_tagged(&cube_a, &cube_b);
        assert!(!segments.is_empty());
    }

    #[test]
    fn test_intersect_mesh_pair_tagged_disjoint_cubes_empty() {
        let cube_a = make_cube(Point3::new(0.0, 0.0, 0.0), 1.0);
        let cube_b = make_cube(Point3::new(10.0, 10.0, 10.0), 1.0);
        let segments = intersect_mesh_pair_tagged(&cube_a, &cube_b);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_crossed_set_by_partitions_correctly() {
        let segments = vec![
            TaggedSegment {
                segment: Segment {
                    p0: Point3::origin(),
                    p1: Point3::new(1.0, 0.0, 0.0),
                },
                idx_a: 0,
                idx_b: 5,
            },
            TaggedSegment {
                segment: Segment {
                    p0: Point3::origin(),
                    p1: Point3::new(0.0, 1.0, 0.0),
                },
                idx_a: 0,
                idx_b: 6,
            },
        ];
        let by_a = crossed_set_by(&segments, true);
        assert_eq!(by_a.get(&0).unwrap().len(), 2);
        let by_b = crossed_set_by(&segments, false);
        assert_eq!(by_b.len(), 2);
    }
}
