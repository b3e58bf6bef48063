//! A 2D uniform hash grid accelerating triangle bounding-box queries.
//!
//! Built on one mesh and parameterised by a choice of projection plane
//! (XY, YZ, or XZ); the pair intersector ([`crate::ssi`]) and point
//! classifier ([`crate::classify`]) both query it rather than testing
//! every triangle pair or triangle candidate directly.

use std::collections::HashMap;

use vcad_kernel_math::{Aabb2, Plane2, Point2};
use vcad_kernel_mesh::Triangle;

/// Which pair of axes a spatial grid is built over. A thin re-export of
/// [`vcad_kernel_math::Plane2`] under the name used by the distilled
/// spec's component design (§4.1).
pub type Projection = Plane2;

/// Cell coordinate: `floor(coord / cell_size)` on each axis.
type CellCoord = (i64, i64);

/// A 2D uniform hash grid over a fixed set of triangles.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    projection: Projection,
    cell_size: f64,
    cells: HashMap<CellCoord, Vec<usize>>,
}

impl SpatialGrid {
    /// Build a grid over `triangles`, projecting each triangle's 3D AABB
    /// onto `projection` and inserting its index into every cell the
    /// projected box overlaps.
    pub fn build(triangles: &[Triangle], cell_size: f64, projection: Projection) -> Self {
        let mut cells: HashMap<CellCoord, Vec<usize>> = HashMap::new();
        for (idx, tri) in triangles.iter().enumerate() {
            let bb2 = tri.aabb().project(projection);
            for cell in cells_overlapping(&bb2, cell_size) {
                cells.entry(cell).or_default().push(idx);
            }
        }
        SpatialGrid {
            projection,
            cell_size,
            cells,
        }
    }

    /// Which projection this grid was built with.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// The cell size this grid was built with.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// All distinct triangle indices whose cells overlap `bb2d`.
    pub fn query_box(&self, bb2d: &Aabb2) -> Vec<usize> {
        let mut hits: Vec<usize> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for cell in cells_overlapping(bb2d, self.cell_size) {
            if let Some(indices) = self.cells.get(&cell) {
                for &idx in indices {
                    if seen.insert(idx) {
                        hits.push(idx);
                    }
                }
            }
        }
        hits
    }

    /// All triangle indices in the single cell containing `(a, b)`.
    pub fn query_point(&self, point: Point2) -> Vec<usize> {
        let cell = cell_of(point.x, self.cell_size, point.y, self.cell_size);
        self.cells.get(&cell).cloned().unwrap_or_default()
    }
}

fn cell_of(a: f64, cell_size_a: f64, b: f64, cell_size_b: f64) -> CellCoord {
    (
        (a / cell_size_a).floor() as i64,
        (b / cell_size_b).floor() as i64,
    )
}

fn cells_overlapping(bb2: &Aabb2, cell_size: f64) -> Vec<CellCoord> {
    let min_i = (bb2.min.x / cell_size).floor() as i64;
    let max_i = (bb2.max.x / cell_size).floor() as i64;
    let min_j = (bb2.min.y / cell_size).floor() as i64;
    let max_j = (bb2.max.y / cell_size).floor() as i64;

    let mut out = Vec::with_capacity(((max_i - min_i + 1) * (max_j - min_j + 1)).max(1) as usize);
    for i in min_i..=max_i {
        for j in min_j..=max_j {
            out.push((i, j));
        }
    }
    out
}

/// Mean edge length over the first 100 triangles of `triangles`
/// (fallback `1.0` if `triangles` is empty).
pub fn avg_edge(triangles: &[Triangle]) -> f64 {
    let sample = &triangles[..triangles.len().min(100)];
    if sample.is_empty() {
        return 1.0;
    }
    let mut total = 0.0;
    let mut count = 0usize;
    for tri in sample {
        total += vcad_kernel_math::distance(&tri.v0, &tri.v1);
        total += vcad_kernel_math::distance(&tri.v1, &tri.v2);
        total += vcad_kernel_math::distance(&tri.v2, &tri.v0);
        count += 3;
    }
    if count == 0 {
        1.0
    } else {
        total / count as f64
    }
}

/// The cell size used system-wide for a mesh: `max(2 * avg_edge, 0.1)`.
pub fn cell_size_for(triangles: &[Triangle]) -> f64 {
    (2.0 * avg_edge(triangles)).max(0.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcad_kernel_math::Point3;

    fn unit_triangle(ox: f64, oy: f64) -> Triangle {
        Triangle::new(
            Point3::new(ox, oy, 0.0),
            Point3::new(ox + 1.0, oy, 0.0),
            Point3::new(ox, oy + 1.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_avg_edge_fallback_on_empty() {
        assert_eq!(avg_edge(&[]), 1.0);
    }

    #[test]
    fn test_avg_edge_unit_triangle() {
        let tris = vec![unit_triangle(0.0, 0.0)];
        // Edges: 1, 1, sqrt(2)
        let expected = (2.0 + 2.0f64.sqrt()) / 3.0;
        assert!((avg_edge(&tris) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_grid_query_box_finds_overlapping() {
        let tris = vec![unit_triangle(0.0, 0.0), unit_triangle(10.0, 10.0)];
        let grid = SpatialGrid::build(&tris, 1.0, Projection::Xy);
        let bb = Aabb2 {
            min: Point2::new(-0.5, -0.5),
            max: Point2::new(1.5, 1.5),
        };
        let hits = grid.query_box(&bb);
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn test_grid_query_box_dedups_multi_cell_triangle() {
        // A triangle large enough to span several cells still reports once.
        let big = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(0.0, 5.0, 0.0),
        )
        .unwrap();
        let grid = SpatialGrid::build(&[big], 1.0, Projection::Xy);
        let bb = Aabb2 {
            min: Point2::new(-1.0, -1.0),
            max: Point2::new(6.0, 6.0),
        };
        assert_eq!(grid.query_box(&bb), vec![0]);
    }

    #[test]
    fn test_grid_query_point() {
        let tris = vec![unit_triangle(0.0, 0.0)];
        let grid = SpatialGrid::build(&tris, 1.0, Projection::Xy);
        assert_eq!(grid.query_point(Point2::new(0.2, 0.2)), vec![0]);
        assert!(grid.query_point(Point2::new(50.0, 50.0)).is_empty());
    }

    #[test]
    fn test_cell_size_for_uses_avg_edge_floor() {
        let tris = vec![unit_triangle(0.0, 0.0)];
        let size = cell_size_for(&tris);
        assert!(size >= 0.1);
    }
}
