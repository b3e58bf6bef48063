//! Exact orientation and incircle/insphere tests, backed by `robust`'s
//! adaptive-precision arithmetic so the Boolean pipeline never has to tune
//! an epsilon against geometry scale.
//!
//! [`orient2d`] and [`incircle`] drive the constrained Delaunay
//! triangulator in `vcad-kernel-booleans::delaunay`; [`unit_normals_near_parallel`]
//! is the near-coplanar reject the triangle–triangle intersector
//! (`vcad-kernel-booleans::ssi`) runs before attempting to build an
//! intersection line. [`orient3d`] and [`insphere`] round out the 3D
//! counterparts for callers that need them; the rest of this module is
//! small derived checks built on top of the four exact predicates.

use crate::{Point2, Point3};

/// Result of an exact orientation or in-circle/in-sphere test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Clockwise (2D), below the plane (3D), or outside the circle/sphere.
    Negative,
    /// Collinear, coplanar, or exactly on the circle/sphere.
    Zero,
    /// Counter-clockwise (2D), above the plane (3D), or inside the circle/sphere.
    Positive,
}

impl Sign {
    /// Only meaningful applied to an exact predicate's result, never to a
    /// raw floating-point computation.
    #[inline]
    pub fn from_f64(v: f64) -> Self {
        if v > 0.0 {
            Sign::Positive
        } else if v < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Sign::Positive)
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Negative)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        matches!(self, Sign::Zero)
    }
}

fn coord2(p: &Point2) -> robust::Coord<f64> {
    robust::Coord { x: p.x, y: p.y }
}

fn coord3(p: &Point3) -> robust::Coord3D<f64> {
    robust::Coord3D {
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

/// Side of the directed line `a -> b` that `c` falls on: `Positive` left
/// (counter-clockwise), `Negative` right (clockwise), `Zero` collinear.
///
/// ```
/// use vcad_kernel_math::{Point2, predicates::{orient2d, Sign}};
/// let (a, b, c) = (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, 1.0));
/// assert_eq!(orient2d(&a, &b, &c), Sign::Positive);
/// ```
#[inline]
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Sign {
    Sign::from_f64(robust::orient2d(coord2(a), coord2(b), coord2(c)))
}

/// Whether `d` lies inside (`Positive`), on (`Zero`), or outside
/// (`Negative`) the circumcircle of `a`, `b`, `c`. Requires `a`, `b`, `c`
/// wound counter-clockwise; a clockwise triangle negates the result.
#[inline]
pub fn incircle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> Sign {
    Sign::from_f64(robust::incircle(coord2(a), coord2(b), coord2(c), coord2(d)))
}

/// Side of the plane through `a`, `b`, `c` that `d` falls on. `Positive`
/// when `d` is below the plane as seen from a counter-clockwise winding of
/// `a`, `b`, `c`; `Negative` above; `Zero` coplanar.
#[inline]
pub fn orient3d(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Sign {
    Sign::from_f64(robust::orient3d(coord3(a), coord3(b), coord3(c), coord3(d)))
}

/// Whether `e` lies inside (`Positive`), on (`Zero`), or outside
/// (`Negative`) the circumsphere of tetrahedron `a`, `b`, `c`, `d`.
/// Requires `orient3d(a, b, c, d)` positive; a negatively oriented
/// tetrahedron negates the result.
#[inline]
pub fn insphere(a: &Point3, b: &Point3, c: &Point3, d: &Point3, e: &Point3) -> Sign {
    Sign::from_f64(robust::insphere(
        coord3(a),
        coord3(b),
        coord3(c),
        coord3(d),
        coord3(e),
    ))
}

/// Whether `p` lies on the segment `a`-`b` (collinear and within its
/// bounding box), endpoints included.
pub fn point_on_segment_2d(p: &Point2, a: &Point2, b: &Point2) -> bool {
    if !orient2d(a, b, p).is_zero() {
        return false;
    }
    (a.x.min(b.x)..=a.x.max(b.x)).contains(&p.x) && (a.y.min(b.y)..=a.y.max(b.y)).contains(&p.y)
}

/// Whether four points are mutually coplanar — the exact check backing the
/// splitter's near-coplanar vertex handling.
#[inline]
pub fn are_coplanar(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> bool {
    orient3d(a, b, c, d).is_zero()
}

/// Whether two unit triangle normals agree to within `threshold` (the
/// crossing pipeline uses `0.9999`), in either direction. Reject these
/// pairs before constructing an intersection line — a face overlap has no
/// single well-defined segment.
#[inline]
pub fn unit_normals_near_parallel(a: &crate::Vec3, b: &crate::Vec3, threshold: f64) -> bool {
    a.dot(b).abs() > threshold
}

/// Whether `a`, `b`, `c` fall on a common 2D line.
#[inline]
pub fn are_collinear_2d(a: &Point2, b: &Point2, c: &Point2) -> bool {
    orient2d(a, b, c).is_zero()
}

/// Which side of line `a`-`b` the ray-cast sample `p` falls on, or `None`
/// when it lands exactly on the line (the caller should jitter and retry
/// rather than treat this as a real crossing).
#[inline]
pub fn point_side_of_line(p: &Point2, a: &Point2, b: &Point2) -> Option<Sign> {
    let sign = orient2d(a, b, p);
    if sign.is_zero() {
        None
    } else {
        Some(sign)
    }
}
