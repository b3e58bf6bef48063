#![warn(missing_docs)]

//! Triangle soup and indexed mesh types for the vcad Boolean kernel.
//!
//! This crate stands in for the mesh-repair and rendering-adapter
//! collaborators the Boolean core depends on but does not implement
//! itself: [`weld`] builds an indexed mesh from a soup, [`dedup`] merges
//! positionally coincident seam vertices, and [`orient`] provides the
//! per-triangle Z-up fallback used when a result group isn't manifold.
//! [`fixtures`] generates the deterministic test/benchmark geometry
//! (cubes, flat patches) used throughout `vcad-kernel-booleans`'s test
//! suite and benchmarks.

pub mod dedup;
pub mod fixtures;
pub mod orient;
pub mod weld;

use thiserror::Error;
use vcad_kernel_math::{triangle_area, Aabb3, Point3};

/// Errors raised at the mesh construction boundary.
///
/// Once a [`Triangle`]/[`TriangleSoup`] has been constructed successfully,
/// every downstream stage in the Boolean core is infallible — this is the
/// crate's one real `Result`-returning boundary.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// A vertex coordinate was not finite (`NaN` or `±Inf`).
    #[error("non-finite vertex coordinate: ({0}, {1}, {2})")]
    NonFiniteVertex(f64, f64, f64),
}

/// A single triangle in winding order `(v0, v1, v2)`.
///
/// Triangles carry no identity or adjacency of their own; they are
/// positioned purely by their three vertex coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3,
    /// Second vertex.
    pub v1: Point3,
    /// Third vertex.
    pub v2: Point3,
}

impl Triangle {
    /// Construct a triangle, rejecting non-finite coordinates.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Result<Self, MeshError> {
        for v in [&v0, &v1, &v2] {
            if !v.x.is_finite() || !v.y.is_finite() || !v.z.is_finite() {
                return Err(MeshError::NonFiniteVertex(v.x, v.y, v.z));
            }
        }
        Ok(Triangle { v0, v1, v2 })
    }

    /// The triangle's three vertices as an array, in winding order.
    pub fn vertices(&self) -> [Point3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Centroid of the triangle.
    pub fn centroid(&self) -> Point3 {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Area of the triangle in 3D.
    pub fn area(&self) -> f64 {
        triangle_area(&self.v0, &self.v1, &self.v2)
    }

    /// Bounding box of the triangle.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_triangle(&self.v0, &self.v1, &self.v2)
    }

    /// A copy of this triangle with `v1`/`v2` swapped, reversing its winding.
    pub fn flipped(&self) -> Triangle {
        Triangle {
            v0: self.v0,
            v1: self.v2,
            v2: self.v1,
        }
    }

    /// Whether the triangle's area is at or below a degeneracy threshold.
    pub fn is_degenerate(&self, min_area: f64) -> bool {
        self.area() <= min_area
    }
}

/// An ordered sequence of triangles with no shared vertex identity.
///
/// Order is meaningful only as a stable index used to tag intersections
/// and classifications — it carries no other semantics.
pub type TriangleSoup = Vec<Triangle>;

/// Build a [`TriangleSoup`] from flat vertex triples, rejecting any
/// non-finite coordinate.
pub fn soup_from_triples(triples: &[(f64, f64, f64); 3]) -> Result<Triangle, MeshError> {
    Triangle::new(
        Point3::new(triples[0].0, triples[0].1, triples[0].2),
        Point3::new(triples[1].0, triples[1].1, triples[1].2),
        Point3::new(triples[2].0, triples[2].1, triples[2].2),
    )
}

/// Bounding box of an entire triangle soup. `None` if the soup is empty.
pub fn soup_aabb(soup: &[Triangle]) -> Option<Aabb3> {
    let mut iter = soup.iter();
    let first = iter.next()?;
    let mut bb = first.aabb();
    for tri in iter {
        bb.union(&tri.aabb());
    }
    Some(bb)
}

/// A vertex pool plus triangles referencing it by index — the result of
/// welding a [`TriangleSoup`] under a tolerance (see [`weld::weld`]).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh {
    /// Unique vertex positions.
    pub points: Vec<Point3>,
    /// Triangles as index triples into `points`.
    pub triangles: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of unique vertices.
    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    /// Expand back into a triangle soup (loses the shared-vertex structure).
    pub fn to_soup(&self) -> TriangleSoup {
        self.triangles
            .iter()
            .map(|idx| Triangle {
                v0: self.points[idx[0] as usize],
                v1: self.points[idx[1] as usize],
                v2: self.points[idx[2] as usize],
            })
            .collect()
    }

    /// Count how many triangles reference each undirected edge. An
    /// edge referenced more than twice indicates a non-manifold seam;
    /// used by the Boolean core's tests to check the "no duplicate
    /// output edges" property.
    pub fn edge_use_counts(&self) -> std::collections::HashMap<(u32, u32), u32> {
        let mut counts = std::collections::HashMap::new();
        for tri in &self.triangles {
            for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a <= b { (a, b) } else { (b, a) };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_rejects_non_finite() {
        let v0 = Point3::new(0.0, 0.0, 0.0);
        let v1 = Point3::new(1.0, 0.0, 0.0);
        let bad = Point3::new(f64::NAN, 0.0, 0.0);
        assert!(Triangle::new(v0, v1, bad).is_err());
    }

    #[test]
    fn test_triangle_centroid_and_area() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        )
        .unwrap();
        assert_eq!(tri.centroid(), Point3::new(2.0 / 3.0, 2.0 / 3.0, 0.0));
        assert!((tri.area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_soup_aabb_empty() {
        let soup: TriangleSoup = Vec::new();
        assert!(soup_aabb(&soup).is_none());
    }

    #[test]
    fn test_indexed_mesh_edge_use_counts() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        // Two triangles sharing edge (1,2).
        let mesh = IndexedMesh {
            points,
            triangles: vec![[0, 1, 2], [1, 3, 2]],
        };
        let counts = mesh.edge_use_counts();
        assert_eq!(counts.get(&(1, 2)), Some(&2));
        assert_eq!(counts.get(&(0, 1)), Some(&1));
    }
}
