//! Incremental Bowyer-Watson Delaunay triangulation with best-effort edge
//! constraints, used only by [`crate::split`].

use std::collections::HashMap;

use vcad_kernel_math::predicates::{incircle, orient2d, Sign};
use vcad_kernel_math::Point2;

/// A 2D triangulation: the input points plus triangles as index triples.
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Input points, in the order passed to [`triangulate`].
    pub points: Vec<Point2>,
    /// Triangles as CCW index triples into `points`.
    pub triangles: Vec<[usize; 3]>,
}

/// Triangulate `points` via incremental Bowyer-Watson. Degenerate inputs
/// (fewer than 3 points) produce an empty triangle list.
pub fn triangulate(points: &[Point2]) -> Triangulation {
    let n = points.len();
    if n < 3 {
        return Triangulation {
            points: points.to_vec(),
            triangles: Vec::new(),
        };
    }

    let mut all = points.to_vec();
    let (a, b, c) = super_triangle(points);
    let super_idx = [n, n + 1, n + 2];
    all.push(a);
    all.push(b);
    all.push(c);

    let mut triangles = vec![ccw_triangle(&all, super_idx[0], super_idx[1], super_idx[2])];
    for i in 0..n {
        insert_point(&all, &mut triangles, i);
    }
    triangles.retain(|t| t.iter().all(|&idx| idx < n));

    Triangulation {
        points: points.to_vec(),
        triangles,
    }
}

/// Attempt to force the edge `(a, b)` to appear in the triangulation via a
/// local edge-flip walk. Returns whether the edge is present afterward
/// (it may already have been). Failure is silent — the triangulation is
/// left in whatever state the flip walk reached.
pub fn constrain_edge(triangulation: &mut Triangulation, a: usize, b: usize) -> bool {
    if edge_exists(&triangulation.triangles, a, b) {
        return true;
    }
    let max_iters = triangulation.triangles.len() * 4 + 8;
    for _ in 0..max_iters {
        if edge_exists(&triangulation.triangles, a, b) {
            return true;
        }
        if !try_one_flip_toward(&triangulation.points, &mut triangulation.triangles, a, b) {
            break;
        }
    }
    edge_exists(&triangulation.triangles, a, b)
}

fn super_triangle(points: &[Point2]) -> (Point2, Point2, Point2) {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    let dx = (max.x - min.x).max(1e-9);
    let dy = (max.y - min.y).max(1e-9);
    let delta = dx.max(dy);
    let mid_x = (min.x + max.x) / 2.0;
    let mid_y = (min.y + max.y) / 2.0;
    (
        Point2::new(mid_x - 20.0 * delta, mid_y - delta),
        Point2::new(mid_x, mid_y + 20.0 * delta),
        Point2::new(mid_x + 20.0 * delta, mid_y - delta),
    )
}

fn ccw_triangle(points: &[Point2], a: usize, b: usize, c: usize) -> [usize; 3] {
    match orient2d(&points[a], &points[b], &points[c]) {
        Sign::Negative => [a, c, b],
        _ => [a, b, c],
    }
}

fn insert_point(points: &[Point2], triangles: &mut Vec<[usize; 3]>, p: usize) {
    let bad: Vec<usize> = triangles
        .iter()
        .enumerate()
        .filter(|(_, tri)| in_circumcircle(points, tri, p))
        .map(|(idx, _)| idx)
        .collect();
    if bad.is_empty() {
        return;
    }

    let mut directed: Vec<(usize, usize)> = Vec::new();
    for &ti in &bad {
        let t = triangles[ti];
        directed.push((t[0], t[1]));
        directed.push((t[1], t[2]));
        directed.push((t[2], t[0]));
    }

    let mut canon_count: HashMap<(usize, usize), u32> = HashMap::new();
    let mut canon_edge: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    for &(a, b) in &directed {
        let key = if a < b { (a, b) } else { (b, a) };
        *canon_count.entry(key).or_insert(0) += 1;
        canon_edge.entry(key).or_insert((a, b));
    }
    let boundary: Vec<(usize, usize)> = canon_count
        .iter()
        .filter(|&(_, &count)| count == 1)
        .map(|(key, _)| canon_edge[key])
        .collect();

    let mut bad_sorted = bad.clone();
    bad_sorted.sort_unstable_by(|a, b| b.cmp(a));
    for idx in bad_sorted {
        triangles.remove(idx);
    }

    for (a, b) in boundary {
        triangles.push(ccw_triangle(points, a, b, p));
    }
}

fn in_circumcircle(points: &[Point2], tri: &[usize; 3], p: usize) -> bool {
    incircle(&points[tri[0]], &points[tri[1]], &points[tri[2]], &points[p]).is_positive()
}

fn edge_exists(triangles: &[[usize; 3]], a: usize, b: usize) -> bool {
    triangles.iter().any(|t| {
        let edges = [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])];
        edges.iter().any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    })
}

fn shared_edges(triangles: &[[usize; 3]]) -> Vec<(usize, usize, (usize, usize))> {
    let mut by_edge: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (ti, tri) in triangles.iter().enumerate() {
        for &(x, y) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = if x < y { (x, y) } else { (y, x) };
            by_edge.entry(key).or_default().push(ti);
        }
    }
    by_edge
        .into_iter()
        .filter(|(_, tris)| tris.len() == 2)
        .map(|(edge, tris)| (tris[0], tris[1], edge))
        .collect()
}

fn try_one_flip_toward(points: &[Point2], triangles: &mut Vec<[usize; 3]>, target_a: usize, target_b: usize) -> bool {
    let pa = &points[target_a];
    let pb = &points[target_b];
    for (ti, tj, (e0, e1)) in shared_edges(triangles) {
        if e0 == target_a || e0 == target_b || e1 == target_a || e1 == target_b {
            continue;
        }
        let opp_i = match triangles[ti].iter().copied().find(|&v| v != e0 && v != e1) {
            Some(v) => v,
            None => continue,
        };
        let opp_j = match triangles[tj].iter().copied().find(|&v| v != e0 && v != e1) {
            Some(v) => v,
            None => continue,
        };
        if !segments_properly_intersect(&points[e0], &points[e1], pa, pb) {
            continue;
        }
        if !segments_properly_intersect(&points[e0], &points[e1], &points[opp_i], &points[opp_j]) {
            continue;
        }
        triangles[ti] = ccw_triangle(points, opp_i, e0, opp_j);
        triangles[tj] = ccw_triangle(points, opp_i, opp_j, e1);
        return true;
    }
    false
}

fn segments_properly_intersect(p1: &Point2, p2: &Point2, p3: &Point2, p4: &Point2) -> bool {
    let d1 = orient2d(p3, p4, p1);
    let d2 = orient2d(p3, p4, p2);
    let d3 = orient2d(p1, p2, p3);
    let d4 = orient2d(p1, p2, p4);
    opposite_strict(d1, d2) && opposite_strict(d3, d4)
}

fn opposite_strict(a: Sign, b: Sign) -> bool {
    matches!((a, b), (Sign::Positive, Sign::Negative) | (Sign::Negative, Sign::Positive))
}
