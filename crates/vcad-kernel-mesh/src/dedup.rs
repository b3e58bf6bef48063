//! The seam-dedup collaborator: merge positionally coincident vertices
//! within a triangle soup without building an indexed mesh.
//!
//! The Boolean assembler (`vcad-kernel-booleans::assemble`) calls this on
//! each classified group before winding propagation, so that seam
//! vertices introduced independently by the two input meshes' splitters
//! compare equal when the winding propagator builds its edge-adjacency
//! map.

use std::collections::HashMap;

use vcad_kernel_math::{vertex_key, Point3, VertexKey};

use crate::{Triangle, TriangleSoup};

/// Snap every vertex in `soup` to a representative position within
/// `tolerance`, dropping any triangle that degenerates to a repeated
/// vertex as a result.
///
/// Unlike [`crate::weld::weld`], this returns another soup (not an
/// indexed mesh) — seam dedup happens mid-pipeline, before the final
/// weld step that produces the public result.
pub fn dedup_seams(soup: &TriangleSoup, tolerance: f64) -> TriangleSoup {
    let scale = if tolerance > 0.0 { 1.0 / tolerance } else { 1.0 };
    let mut representative: HashMap<VertexKey, Point3> = HashMap::new();

    let mut snap = |p: &Point3| -> Point3 {
        let scaled = Point3::new(p.x * scale, p.y * scale, p.z * scale);
        let key = vertex_key(&scaled);
        *representative.entry(key).or_insert(*p)
    };

    soup.iter()
        .filter_map(|tri| {
            let v0 = snap(&tri.v0);
            let v1 = snap(&tri.v1);
            let v2 = snap(&tri.v2);
            if v0 == v1 || v1 == v2 || v0 == v2 {
                None
            } else {
                Some(Triangle { v0, v1, v2 })
            }
        })
        .collect()
}
