//! The Boolean pipeline orchestrator: intersect, classify, split, dedup,
//! propagate winding, combine, weld.

use vcad_kernel_mesh::{dedup::dedup_seams, weld::weld, IndexedMesh, Triangle};

use crate::classify::{flood_fill_classify, Classification, TriGrids};
use crate::split::split_straddling_and_classify;
use crate::ssi::{crossed_set_by, intersect_mesh_pair_tagged};
use crate::winding::propagate_winding;

/// The Boolean set operation requested of [`assemble`]/[`crate::boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// `A ∪ B`.
    Union,
    /// `A − B`.
    Subtract,
    /// `A ∩ B`.
    Intersect,
}

/// Tolerance used to dedup seam vertices within each classified group
/// before winding propagation.
pub const SEAM_DEDUP_TOLERANCE: f64 = 1e-4;
/// Tolerance used for the final weld into an indexed mesh.
pub const WELD_TOLERANCE: f64 = 1e-4;

/// Run the full Boolean pipeline on two triangle soups. Returns `None` when
/// either input is empty or the operation has nothing to emit.
pub fn assemble(soup_a: &[Triangle], soup_b: &[Triangle], op: BooleanOp) -> Option<IndexedMesh> {
    if soup_a.is_empty() || soup_b.is_empty() {
        return None;
    }

    let tagged = intersect_mesh_pair_tagged(soup_a, soup_b);
    if tagged.is_empty() {
        return match op {
            BooleanOp::Union => {
                let mut soup = soup_a.to_vec();
                soup.extend_from_slice(soup_b);
                Some(weld(&soup, WELD_TOLERANCE))
            }
            BooleanOp::Intersect => None,
            BooleanOp::Subtract => Some(unwelded_indexed(soup_a)),
        };
    }

    let crossed_a = crossed_set_by(&tagged, true);
    let crossed_b = crossed_set_by(&tagged, false);

    let grids_a = TriGrids::build(soup_a);
    let grids_b = TriGrids::build(soup_b);

    let flood_a = flood_fill_classify(soup_a, &crossed_a, &grids_b);
    let flood_b = flood_fill_classify(soup_b, &crossed_b, &grids_a);

    let (split_a, split_a_classes) = split_straddling_and_classify(soup_a, &crossed_a, &flood_a, &grids_b);
    let (split_b, split_b_classes) = split_straddling_and_classify(soup_b, &crossed_b, &flood_b, &grids_a);

    let (a_inside, a_outside) = partition_by_class(soup_a, &crossed_a, &flood_a, split_a, split_a_classes);
    let (b_inside, b_outside) = partition_by_class(soup_b, &crossed_b, &flood_b, split_b, split_b_classes);

    let a_inside = propagate_winding(&dedup_seams(&a_inside, SEAM_DEDUP_TOLERANCE));
    let a_outside = propagate_winding(&dedup_seams(&a_outside, SEAM_DEDUP_TOLERANCE));
    let b_inside = propagate_winding(&dedup_seams(&b_inside, SEAM_DEDUP_TOLERANCE));
    let b_outside = propagate_winding(&dedup_seams(&b_outside, SEAM_DEDUP_TOLERANCE));

    let combined: Vec<Triangle> = match op {
        BooleanOp::Union => {
            let mut soup = a_outside;
            soup.extend(b_outside);
            soup
        }
        BooleanOp::Intersect => {
            let mut soup = a_inside;
            soup.extend(b_inside);
            soup
        }
        BooleanOp::Subtract => {
            let mut soup = a_outside;
            soup.extend(b_inside.iter().map(Triangle::flipped));
            soup
        }
    };

    if combined.is_empty() {
        return None;
    }
    Some(weld(&combined, WELD_TOLERANCE))
}

/// Split `soup`'s non-crossed triangles by flood-fill classification and
/// its crossed triangles' sub-triangles by `split_classes`, into
/// `(inside, outside)`.
fn partition_by_class(
    soup: &[Triangle],
    crossed: &crate::ssi::CrossedSet,
    flood_classes: &[Classification],
    split_triangles: Vec<Triangle>,
    split_classes: Vec<Classification>,
) -> (Vec<Triangle>, Vec<Triangle>) {
    let mut inside = Vec::new();
    let mut outside = Vec::new();

    for (idx, tri) in soup.iter().enumerate() {
        if crossed.contains_key(&idx) {
            continue;
        }
        match flood_classes[idx] {
            Classification::Inside => inside.push(*tri),
            _ => outside.push(*tri),
        }
    }

    for (tri, class) in split_triangles.into_iter().zip(split_classes) {
        match class {
            Classification::Inside => inside.push(tri),
            _ => outside.push(tri),
        }
    }

    (inside, outside)
}

/// Build an indexed mesh with no vertex sharing — each triangle gets three
/// fresh vertex slots. Used for the disjoint-input `subtract` shortcut,
/// where nothing needs deduplication.
fn unwelded_indexed(soup: &[Triangle]) -> IndexedMesh {
    let mut points = Vec::with_capacity(soup.len() * 3);
    let mut triangles = Vec::with_capacity(soup.len());
    for tri in soup {
        let base = points.len() as u32;
        points.push(tri.v0);
        points.push(tri.v1);
        points.push(tri.v2);
        triangles.push([base, base + 1, base + 2]);
    }
    IndexedMesh { points, triangles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcad_kernel_math::Point3;
    use vcad_kernel_mesh::fixtures::make_cube;

    #[test]
    fn test_assemble_empty_input_returns_none() {
        let cube = make_cube(Point3::origin(), 1.0);
        assert!(assemble(&[], &cube, BooleanOp::Union).is_none());
        assert!(assemble(&cube, &[], BooleanOp::Union).is_none());
    }

    #[test]
    fn test_assemble_disjoint_intersect_is_none() {
        let a = make_cube(Point3::new(0.0, 0.0, 0.0), 1.0);
        let b = make_cube(Point3::new(10.0, 10.0, 10.0), 1.0);
        assert!(assemble(&a, &b, BooleanOp::Intersect).is_none());
    }

    #[test]
    fn test_assemble_disjoint_union_concatenates() {
        let a = make_cube(Point3::new(0.0, 0.0, 0.0), 1.0);
        let b = make_cube(Point3::new(10.0, 10.0, 10.0), 1.0);
        let result = assemble(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(result.num_triangles(), a.len() + b.len());
    }

    #[test]
    fn test_assemble_disjoint_subtract_returns_copy_of_a() {
        let a = make_cube(Point3::new(0.0, 0.0, 0.0), 1.0);
        let b = make_cube(Point3::new(10.0, 10.0, 10.0), 1.0);
        let result = assemble(&a, &b, BooleanOp::Subtract).unwrap();
        assert_eq!(result.num_triangles(), a.len());
        assert_eq!(result.num_vertices(), a.len() * 3);
    }

    #[test]
    fn test_assemble_overlapping_cubes_subtract_is_nonempty() {
        let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
        let result = assemble(&a, &b, BooleanOp::Subtract);
        assert!(result.is_some());
        let mesh = result.unwrap();
        assert!(!mesh.triangles.is_empty());
    }

    #[test]
    fn test_assemble_overlapping_cubes_union_at_least_subtract_count() {
        let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
        let subtract = assemble(&a, &b, BooleanOp::Subtract).unwrap();
        let union = assemble(&a, &b, BooleanOp::Union).unwrap();
        assert!(union.num_triangles() >= subtract.num_triangles());
    }

    #[test]
    fn test_assemble_overlapping_cubes_intersect_bounded() {
        let a = make_cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let b = make_cube(Point3::new(1.0, 0.0, 0.0), 2.0);
        let result = assemble(&a, &b, BooleanOp::Intersect);
        assert!(result.is_some());
        let mesh = result.unwrap();
        assert!(mesh.triangles.len() <= 3 * (a.len() + b.len()));
    }
}
