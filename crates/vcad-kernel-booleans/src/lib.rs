#![warn(missing_docs)]

//! Boolean set operations (union, intersection, difference) on triangle
//! meshes, including open (non-watertight) surfaces.
//!
//! The public entry point is [`boolean`]. Internally the pipeline is:
//! [`ssi::intersect_mesh_pair_tagged`] finds where the two input soups
//! cross, [`classify::flood_fill_classify`] assigns inside/outside to
//! everything that doesn't cross, [`split::split_straddling_and_classify`]
//! re-triangulates and classifies what does, and [`assemble::assemble`]
//! combines, dedups, re-winds, and welds the result.
//!
//! Every stage past [`vcad_kernel_mesh::Triangle`] construction is
//! infallible: degenerate geometry degrades locally (a triangle is skipped
//! or returned unchanged) rather than propagating an error. The crate's one
//! sentinel is `boolean`'s `None` return, meaning "no meaningful output."

pub mod assemble;
pub mod classify;
pub mod delaunay;
pub mod grid;
pub mod polyline;
pub mod split;
pub mod ssi;
pub mod winding;

pub use assemble::BooleanOp;
pub use classify::classify_point_multi_axis;
pub use split::split_straddling_and_classify;
pub use ssi::intersect_mesh_pair_tagged;

use vcad_kernel_math::Point3;
use vcad_kernel_mesh::{IndexedMesh, Triangle};

/// The result of a successful [`boolean`] call: the resulting triangle
/// soup, plus its welded indexed form (`points`/`triangles`).
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanResult {
    /// The result as a triangle soup (no shared vertex identity).
    pub soup: Vec<Triangle>,
    /// Unique vertex positions of the welded result.
    pub points: Vec<Point3>,
    /// Triangles as index triples into `points`.
    pub triangles: Vec<[u32; 3]>,
}

impl From<IndexedMesh> for BooleanResult {
    fn from(mesh: IndexedMesh) -> Self {
        let soup = mesh.to_soup();
        BooleanResult {
            soup,
            points: mesh.points,
            triangles: mesh.triangles,
        }
    }
}

/// Compute a Boolean set operation between two triangle soups.
///
/// Returns `None` when either input is empty, when `op` is
/// [`BooleanOp::Intersect`] and the inputs don't overlap, or when the
/// combined result is otherwise empty after classification.
pub fn boolean(soup_a: &[Triangle], soup_b: &[Triangle], op: BooleanOp) -> Option<BooleanResult> {
    assemble::assemble(soup_a, soup_b, op).map(BooleanResult::from)
}
