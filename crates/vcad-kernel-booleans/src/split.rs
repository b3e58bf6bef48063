//! Re-triangulation of crossed triangles ([`split_triangle`]) and
//! classification of the resulting sub-triangles
//! ([`classify_sub_triangles`]), combined into the advanced hook
//! [`split_straddling_and_classify`] used by [`crate::assemble`].

use std::collections::{HashMap, HashSet};

use vcad_kernel_math::{barycentric_2d, signed_area_2d, triangle_normal_raw, vertex_key, Point2, VertexKey};
use vcad_kernel_mesh::Triangle;

use crate::classify::{classify_point_multi_axis, Classification, TriGrids};
use crate::delaunay;
use crate::ssi::{CrossedSet, Segment};

/// Slop tolerance allowing a segment endpoint that fell slightly outside
/// the triangle due to float error to still be inserted as a Steiner point.
pub const STEINER_SLOP: f64 = -1e-4;
/// Slop tolerance for the post-triangulation centroid-inside check.
pub const CENTROID_SLOP: f64 = -1e-6;
/// Sub-triangles smaller than this fraction of the parent's 2D area are
/// discarded as triangulation noise.
pub const MIN_AREA_RATIO: f64 = 1e-8;
/// Minimum length of the local frame's basis vectors.
const FRAME_EPS: f64 = 1e-12;
/// Minimum magnitude of the 2D barycentric determinant.
const BARY_DET_EPS: f64 = 1e-12;

/// Replace a crossed triangle with sub-triangles whose edges respect the
/// intersection segments lying on it. Returns `[*tri]` unchanged whenever
/// the local frame, triangulation, or area filter leaves nothing usable.
pub fn split_triangle(tri: &Triangle, segments: &[Segment]) -> Vec<Triangle> {
    let origin = tri.v0;
    let u_raw = tri.v1 - origin;
    let u_len = u_raw.norm();
    if u_len < FRAME_EPS {
        return vec![*tri];
    }
    let u = u_raw / u_len;
    let raw_normal = triangle_normal_raw(&tri.v0, &tri.v1, &tri.v2);
    let n_len = raw_normal.norm();
    if n_len < FRAME_EPS {
        return vec![*tri];
    }
    let n = raw_normal / n_len;
    let v_axis = n.cross(&u);
    if v_axis.norm() < FRAME_EPS {
        return vec![*tri];
    }

    let to_2d = |p: &vcad_kernel_math::Point3| -> Point2 {
        let rel = p - origin;
        Point2::new(rel.dot(&u), rel.dot(&v_axis))
    };

    let a2 = to_2d(&tri.v0);
    let b2 = to_2d(&tri.v1);
    let c2 = to_2d(&tri.v2);
    let orig_area2d = signed_area_2d(&a2, &b2, &c2).abs();
    if orig_area2d < BARY_DET_EPS {
        return vec![*tri];
    }

    let mut points2d = vec![a2, b2, c2];
    let mut points3d = vec![tri.v0, tri.v1, tri.v2];
    let mut index_of: HashMap<VertexKey, usize> = HashMap::new();
    index_of.insert(vertex_key(&tri.v0), 0);
    index_of.insert(vertex_key(&tri.v1), 1);
    index_of.insert(vertex_key(&tri.v2), 2);

    let mut constraints: Vec<(usize, usize)> = Vec::new();
    for segment in segments {
        let mut endpoint_indices: [Option<usize>; 2] = [None, None];
        for (slot, endpoint) in [segment.p0, segment.p1].iter().enumerate() {
            let key = vertex_key(endpoint);
            if let Some(&existing) = index_of.get(&key) {
                endpoint_indices[slot] = Some(existing);
                continue;
            }
            let p2 = to_2d(endpoint);
            let bary = match barycentric_2d(&p2, &a2, &b2, &c2) {
                Some(b) => b,
                None => continue,
            };
            if bary.0 < STEINER_SLOP || bary.1 < STEINER_SLOP || bary.2 < STEINER_SLOP {
                continue;
            }
            let new_index = points2d.len();
            points2d.push(p2);
            points3d.push(*endpoint);
            index_of.insert(key, new_index);
            endpoint_indices[slot] = Some(new_index);
        }
        if let (Some(i0), Some(i1)) = (endpoint_indices[0], endpoint_indices[1]) {
            if i0 != i1 {
                constraints.push((i0, i1));
            }
        }
    }

    if points2d.len() == 3 {
        return vec![*tri];
    }

    let mut triangulation = delaunay::triangulate(&points2d);
    if triangulation.triangles.is_empty() {
        return vec![*tri];
    }
    for (i0, i1) in constraints {
        let _ = delaunay::constrain_edge(&mut triangulation, i0, i1);
    }

    let mut output = Vec::new();
    for t in &triangulation.triangles {
        let centroid = Point2::new(
            (points2d[t[0]].x + points2d[t[1]].x + points2d[t[2]].x) / 3.0,
            (points2d[t[0]].y + points2d[t[1]].y + points2d[t[2]].y) / 3.0,
        );
        let bary = match barycentric_2d(&centroid, &a2, &b2, &c2) {
            Some(b) => b,
            None => continue,
        };
        if bary.0 < CENTROID_SLOP || bary.1 < CENTROID_SLOP || bary.2 < CENTROID_SLOP {
            continue;
        }
        let area2d = signed_area_2d(&points2d[t[0]], &points2d[t[1]], &points2d[t[2]]).abs();
        if area2d < MIN_AREA_RATIO * orig_area2d {
            continue;
        }
        if let Ok(sub) = Triangle::new(points3d[t[0]], points3d[t[1]], points3d[t[2]]) {
            output.push(sub);
        }
    }

    if output.is_empty() {
        vec![*tri]
    } else {
        output
    }
}

/// Assign a classification to each of `sub_triangles` by vertex adjacency,
/// falling back to a ray cast on the centroid when none of a sub-triangle's
/// vertices carry an inherited class.
pub fn classify_sub_triangles(
    sub_triangles: &[Triangle],
    adjacency_classes: &HashMap<VertexKey, Classification>,
    curve_vertices: &HashSet<VertexKey>,
    opposing_grids: &TriGrids,
) -> Vec<Classification> {
    sub_triangles
        .iter()
        .map(|tri| {
            for v in tri.vertices() {
                let key = vertex_key(&v);
                if curve_vertices.contains(&key) {
                    continue;
                }
                if let Some(&class) = adjacency_classes.get(&key) {
                    return class;
                }
            }
            classify_point_multi_axis(&tri.centroid(), opposing_grids)
        })
        .collect()
}

/// Split every crossed triangle of `soup` and classify its sub-triangles.
///
/// `flood_classes` must have one entry per triangle of `soup` (the result
/// of [`crate::classify::flood_fill_classify`]); only its entries for
/// non-crossed triangles are consulted, to seed the vertex-adjacency map.
pub fn split_straddling_and_classify(
    soup: &[Triangle],
    crossed: &CrossedSet,
    flood_classes: &[Classification],
    opposing_grids: &TriGrids,
) -> (Vec<Triangle>, Vec<Classification>) {
    let mut adjacency_classes: HashMap<VertexKey, Classification> = HashMap::new();
    for (idx, tri) in soup.iter().enumerate() {
        if crossed.contains_key(&idx) {
            continue;
        }
        let class = flood_classes[idx];
        for v in tri.vertices() {
            adjacency_classes.entry(vertex_key(&v)).or_insert(class);
        }
    }

    let mut curve_vertices: HashSet<VertexKey> = HashSet::new();
    for segments in crossed.values() {
        for tagged in segments {
            curve_vertices.insert(vertex_key(&tagged.segment.p0));
            curve_vertices.insert(vertex_key(&tagged.segment.p1));
        }
    }

    let mut out_soup = Vec::new();
    let mut out_classes = Vec::new();
    for (&idx, segments) in crossed {
        let tri = &soup[idx];
        let raw_segments: Vec<Segment> = segments.iter().map(|t| t.segment).collect();
        let sub_triangles = split_triangle(tri, &raw_segments);
        let classes = classify_sub_triangles(&sub_triangles, &adjacency_classes, &curve_vertices, opposing_grids);
        out_soup.extend(sub_triangles);
        out_classes.extend(classes);
    }
    (out_soup, out_classes)
}
