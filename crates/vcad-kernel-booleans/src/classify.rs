//! Inside/outside classification: jittered multi-axis ray casting for a
//! single point, and flood-fill propagation across shared edges for an
//! entire non-crossed region.

use std::collections::{HashMap, HashSet, VecDeque};

use vcad_kernel_math::{vertex_key, Aabb2, EdgeKey, Plane2, Point2, Point3, VertexKey};
use vcad_kernel_mesh::Triangle;

use crate::grid::{cell_size_for, SpatialGrid};
use crate::ssi::CrossedSet;

/// Barycentric-determinant and slop tolerances used by the ray cast.
const DETERMINANT_EPS: f64 = 1e-12;
const BARYCENTRIC_SLOP: f64 = -1e-10;

/// Three deterministic jitter offsets per axis, applied to the two
/// projection coordinates before casting. Distinct per axis so a point
/// unlucky on one axis's projection is not unlucky on all three.
const JITTER_Z: [(f64, f64); 3] = [(1.3e-4, -0.7e-4), (-0.9e-4, 1.1e-4), (0.4e-5, 0.6e-5)];
const JITTER_X: [(f64, f64); 3] = [(0.8e-4, -1.2e-4), (1.5e-4, 0.3e-4), (-0.6e-5, -0.9e-5)];
const JITTER_Y: [(f64, f64); 3] = [(-1.1e-4, 0.9e-4), (0.5e-4, -1.4e-4), (0.7e-5, 0.2e-5)];

/// Inside/outside/unassigned classification of a triangle or point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The sampled point lies inside the opposing solid.
    Inside,
    /// The sampled point lies outside the opposing solid.
    Outside,
    /// Not yet classified.
    Unassigned,
}

impl Classification {
    /// The signed-byte representation used by callers storing a
    /// classification vector compactly.
    pub fn as_i8(self) -> i8 {
        match self {
            Classification::Inside => 1,
            Classification::Outside => -1,
            Classification::Unassigned => 0,
        }
    }
}

/// The three spatial grids (one per projection plane) built over a single
/// mesh, used by [`classify_point_multi_axis`].
pub struct TriGrids<'a> {
    triangles: &'a [Triangle],
    xy: SpatialGrid,
    yz: SpatialGrid,
    xz: SpatialGrid,
}

impl<'a> TriGrids<'a> {
    /// Build all three projection grids over `triangles`, using the same
    /// cell-size derivation for each.
    pub fn build(triangles: &'a [Triangle]) -> Self {
        let cell_size = cell_size_for(triangles);
        TriGrids {
            triangles,
            xy: SpatialGrid::build(triangles, cell_size, Plane2::Xy),
            yz: SpatialGrid::build(triangles, cell_size, Plane2::Yz),
            xz: SpatialGrid::build(triangles, cell_size, Plane2::Xz),
        }
    }

    fn grid(&self, plane: Plane2) -> &SpatialGrid {
        match plane {
            Plane2::Xy => &self.xy,
            Plane2::Yz => &self.yz,
            Plane2::Xz => &self.xz,
        }
    }
}

/// Axis-aligned ray direction used by one pass of the classifier.
#[derive(Clone, Copy)]
enum Axis {
    Z,
    X,
    Y,
}

impl Axis {
    fn projection(self) -> Plane2 {
        match self {
            Axis::Z => Plane2::Xy,
            Axis::X => Plane2::Yz,
            Axis::Y => Plane2::Xz,
        }
    }

    fn jitters(self) -> [(f64, f64); 3] {
        match self {
            Axis::Z => JITTER_Z,
            Axis::X => JITTER_X,
            Axis::Y => JITTER_Y,
        }
    }

    /// The ray-axis coordinate of a 3D point (the coordinate being cast
    /// along, not one of the two projection coordinates).
    fn ray_coord(self, p: &Point3) -> f64 {
        match self {
            Axis::Z => p.z,
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// Decide whether `point` lies inside the solid bounded by `triangles`,
/// using `grids` (the three projection grids built over `triangles`).
///
/// Casts along +Z, +X, +Y, each with three deterministic jittered offsets,
/// and combines the per-axis votes per the documented decision table.
pub fn classify_point_multi_axis(point: &Point3, grids: &TriGrids) -> Classification {
    let mut inside_votes = 0u32;
    let mut outside_votes = 0u32;
    let mut any_axis_had_hits = false;
    let mut single_axis_vote: Option<Classification> = None;
    let mut axes_with_hits = 0u32;

    for axis in [Axis::Z, Axis::X, Axis::Y] {
        match axis_vote(point, grids, axis) {
            Some(vote) => {
                any_axis_had_hits = true;
                axes_with_hits += 1;
                match vote {
                    Classification::Inside => {
                        inside_votes += 1;
                        single_axis_vote = Some(Classification::Inside);
                    }
                    Classification::Outside => {
                        outside_votes += 1;
                        single_axis_vote = Some(Classification::Outside);
                    }
                    Classification::Unassigned => {}
                }
            }
            None => {}
        }
    }

    if inside_votes >= 2 {
        return Classification::Inside;
    }
    if outside_votes >= 1 && inside_votes <= 1 {
        return Classification::Outside;
    }
    if axes_with_hits == 1 {
        if let Some(vote) = single_axis_vote {
            if vote == Classification::Inside {
                return Classification::Inside;
            }
        }
    }
    if !any_axis_had_hits {
        return Classification::Outside;
    }
    Classification::Outside
}

/// Cast three jittered rays along `axis` and return this axis's vote, or
/// `None` if all three rays had zero hits.
fn axis_vote(point: &Point3, grids: &TriGrids, axis: Axis) -> Option<Classification> {
    let plane = axis.projection();
    let (pa, pb) = plane.project(point);
    let grid = grids.grid(plane);

    let mut inside_count = 0u32;
    let mut outside_count = 0u32;
    let mut zero_hit_count = 0u32;

    for (da, db) in axis.jitters() {
        let ja = pa + da;
        let jb = pb + db;
        let jittered = Point2::new(ja, jb);
        let bb = Aabb2 {
            min: jittered,
            max: jittered,
        };
        let candidates = grid.query_box(&bb);

        let mut crossings = 0u32;
        for idx in candidates {
            let tri = &grids.triangles[idx];
            let (a2, b2, c2) = project_triangle(tri, plane);
            let det = vcad_kernel_math::signed_area_2d(&a2, &b2, &c2) * 2.0;
            if det.abs() < DETERMINANT_EPS {
                continue;
            }
            let bary = match vcad_kernel_math::barycentric_2d(&jittered, &a2, &b2, &c2) {
                Some(b) => b,
                None => continue,
            };
            if bary.0 < BARYCENTRIC_SLOP || bary.1 < BARYCENTRIC_SLOP || bary.2 < BARYCENTRIC_SLOP {
                continue;
            }
            let interpolated = bary.0 * axis.ray_coord(&tri.v0)
                + bary.1 * axis.ray_coord(&tri.v1)
                + bary.2 * axis.ray_coord(&tri.v2);
            if interpolated > axis.ray_coord(point) {
                crossings += 1;
            }
        }

        if crossings == 0 {
            zero_hit_count += 1;
            outside_count += 1;
        } else if crossings % 2 == 1 {
            inside_count += 1;
        } else {
            outside_count += 1;
        }
    }

    if zero_hit_count == 3 {
        return None;
    }
    if inside_count > outside_count {
        Some(Classification::Inside)
    } else {
        Some(Classification::Outside)
    }
}

fn project_triangle(tri: &Triangle, plane: Plane2) -> (Point2, Point2, Point2) {
    let (ax, ay) = plane.project(&tri.v0);
    let (bx, by) = plane.project(&tri.v1);
    let (cx, cy) = plane.project(&tri.v2);
    (Point2::new(ax, ay), Point2::new(bx, by), Point2::new(cx, cy))
}

/// Flood-fill classification of every non-crossed triangle in `triangles`
/// against the opposing mesh's grids.
///
/// `crossed` marks triangle indices that already have an intersection
/// segment (and so are excluded from the flood and left unassigned — the
/// splitter handles them). Returns one [`Classification`] per input
/// triangle, in input order.
pub fn flood_fill_classify(
    triangles: &[Triangle],
    crossed: &CrossedSet,
    opposing_grids: &TriGrids,
) -> Vec<Classification> {
    let mut result = vec![Classification::Unassigned; triangles.len()];
    let adjacency = build_edge_adjacency(triangles, crossed);
    let mut visited = vec![false; triangles.len()];

    for seed in 0..triangles.len() {
        if crossed.contains_key(&seed) || visited[seed] {
            continue;
        }
        let seed_class = classify_point_multi_axis(&triangles[seed].centroid(), opposing_grids);

        let mut queue = VecDeque::new();
        queue.push_back(seed);
        visited[seed] = true;
        while let Some(current) = queue.pop_front() {
            result[current] = seed_class;
            if let Some(neighbours) = adjacency.get(&current) {
                for &next in neighbours {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    result
}

/// Build an edge -> {triangle indices} adjacency over triangles that are
/// not in `crossed`, keyed by canonical vertex-key edge.
fn build_edge_adjacency(triangles: &[Triangle], crossed: &CrossedSet) -> HashMap<usize, HashSet<usize>> {
    let mut by_edge: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (idx, tri) in triangles.iter().enumerate() {
        if crossed.contains_key(&idx) {
            continue;
        }
        for edge in triangle_edge_keys(tri) {
            by_edge.entry(edge).or_default().push(idx);
        }
    }

    let mut adjacency: HashMap<usize, HashSet<usize>> = HashMap::new();
    for indices in by_edge.values() {
        for &i in indices {
            for &j in indices {
                if i != j {
                    adjacency.entry(i).or_default().insert(j);
                }
            }
        }
    }
    adjacency
}

fn triangle_edge_keys(tri: &Triangle) -> [EdgeKey; 3] {
    let keys: [VertexKey; 3] = [vertex_key(&tri.v0), vertex_key(&tri.v1), vertex_key(&tri.v2)];
    [
        EdgeKey::new(keys[0], keys[1]),
        EdgeKey::new(keys[1], keys[2]),
        EdgeKey::new(keys[2], keys[0]),
    ]
}
