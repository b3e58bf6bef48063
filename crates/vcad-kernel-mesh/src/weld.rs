//! The weld collaborator: build an indexed mesh from a triangle soup.
//!
//! Uses a 3D uniform hash keyed by the quantised vertex position (see
//! [`vcad_kernel_math::vertex_key`]) so that positionally coincident
//! vertices — within the tolerance baked into the key's precision — share
//! one pool entry, rather than a distance-based spatial search.

use std::collections::HashMap;

use vcad_kernel_math::{vertex_key, Point3, VertexKey};

use crate::{IndexedMesh, Triangle, TriangleSoup};

/// Build an indexed mesh from `soup`, merging vertices that land on the
/// same quantised key after scaling by `1 / tolerance`.
///
/// `tolerance` selects how coarsely vertices are quantised: positions
/// within `tolerance` of each other are merged into a single pool entry.
/// A `tolerance` of `0.0` disables merging — quantisation still uses
/// [`vcad_kernel_math::VERTEX_KEY_PRECISION`], so only exact (to that
/// precision) duplicates are merged.
pub fn weld(soup: &TriangleSoup, tolerance: f64) -> IndexedMesh {
    let scale = if tolerance > 0.0 { 1.0 / tolerance } else { 1.0 };

    let mut index_of: HashMap<VertexKey, u32> = HashMap::new();
    let mut points: Vec<Point3> = Vec::new();
    let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(soup.len());

    let mut key_of = |p: &Point3| -> u32 {
        let scaled = Point3::new(p.x * scale, p.y * scale, p.z * scale);
        let key = vertex_key(&scaled);
        *index_of.entry(key).or_insert_with(|| {
            points.push(*p);
            (points.len() - 1) as u32
        })
    };

    for tri in soup {
        let i0 = key_of(&tri.v0);
        let i1 = key_of(&tri.v1);
        let i2 = key_of(&tri.v2);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            // Welding collapsed this triangle to a degenerate edge/point.
            continue;
        }
        triangles.push([i0, i1, i2]);
    }

    IndexedMesh { points, triangles }
}
