//! The Z-up fallback collaborator used by the winding propagator
//! (`vcad-kernel-booleans::winding`) on non-manifold groups.

use crate::Triangle;
use vcad_kernel_math::triangle_normal_raw;

/// Orientation threshold: a triangle's normal Z component must be at
/// least this far negative before the fallback flips it. Matches the
/// tolerance carried by the distilled spec rather than a bare `< 0.0`
/// check, so that near-horizontal slivers aren't flipped on noise.
pub const Z_UP_THRESHOLD: f64 = -0.01;

/// Per-triangle best-effort orientation: flip the triangle's winding if
/// its normal's Z component is more than [`Z_UP_THRESHOLD`] negative.
///
/// This is not a substitute for true winding propagation (it has no
/// notion of neighbour consistency); it's the fallback used when a
/// result group isn't manifold and BFS-based propagation can't be
/// trusted.
pub fn orient_z_up(tri: &Triangle) -> Triangle {
    let n = triangle_normal_raw(&tri.v0, &tri.v1, &tri.v2);
    if n.z < Z_UP_THRESHOLD {
        tri.flipped()
    } else {
        *tri
    }
}
