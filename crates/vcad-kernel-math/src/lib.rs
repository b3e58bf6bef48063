#![warn(missing_docs)]

//! Math primitives for the triangle-mesh Boolean kernel.
//!
//! Provides the point/vector aliases, axis-aligned bounding boxes, and
//! vertex/edge keying used throughout `vcad-kernel-mesh` and
//! `vcad-kernel-booleans`, plus the exact orientation predicates in
//! [`predicates`].

pub mod predicates;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;
/// A point in 2D space (used for local triangle frames and the Delaunay
/// triangulator's input).
pub type Point2 = nalgebra::Point2<f64>;
/// A free vector in 3D space.
pub type Vec3 = nalgebra::Vector3<f64>;
/// A free vector in 2D space.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Fixed-decimal precision (places) used to quantise vertex positions into
/// topological identity keys. Distinct from any geometric tolerance used by
/// the intersector or classifier.
pub const VERTEX_KEY_PRECISION: i32 = 6;

/// A quantised 3D vertex identity key, used for edge adjacency and
/// crossed-set membership instead of raw floating point equality.
///
/// Two vertices produce the same key when they agree to
/// [`VERTEX_KEY_PRECISION`] decimal places. This is the packed-integer
/// equivalent of the fixed-decimal string projection described by the
/// source algorithm: cheaper to hash and compare, identical quantisation
/// semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(pub i64, pub i64, pub i64);

/// An unordered pair of vertex keys, canonicalised so that both traversal
/// directions of an edge hash to the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub VertexKey, pub VertexKey);

impl EdgeKey {
    /// Build a canonical edge key from two endpoints, regardless of order.
    pub fn new(a: VertexKey, b: VertexKey) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

/// Quantise a 3D point into a [`VertexKey`] at [`VERTEX_KEY_PRECISION`].
#[inline]
pub fn vertex_key(p: &Point3) -> VertexKey {
    let scale = 10f64.powi(VERTEX_KEY_PRECISION);
    VertexKey(
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    )
}

/// Euclidean distance between two 3D points.
#[inline]
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    (b - a).norm()
}

/// Linear interpolation between two 3D points at parameter `t`.
#[inline]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    Point3::from(a.coords + (b.coords - a.coords) * t)
}

/// Linear interpolation between two 2D points at parameter `t`.
#[inline]
pub fn lerp2(a: &Point2, b: &Point2, t: f64) -> Point2 {
    Point2::from(a.coords + (b.coords - a.coords) * t)
}

/// Cross product of two free vectors.
#[inline]
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    a.cross(b)
}

/// Unnormalised normal of the triangle `(a, b, c)`: `(b-a) × (c-a)`.
#[inline]
pub fn triangle_normal_raw(a: &Point3, b: &Point3, c: &Point3) -> Vec3 {
    cross(&(b - a), &(c - a))
}

/// Unit normal of the triangle `(a, b, c)`, or `None` if the triangle is
/// degenerate (zero area within floating point precision).
pub fn triangle_normal(a: &Point3, b: &Point3, c: &Point3) -> Option<Vec3> {
    let n = triangle_normal_raw(a, b, c);
    let len = n.norm();
    if len < 1e-12 {
        None
    } else {
        Some(n / len)
    }
}

/// Area of the triangle `(a, b, c)` in 3D.
#[inline]
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    triangle_normal_raw(a, b, c).norm() * 0.5
}

/// Signed area of the 2D triangle `(a, b, c)` (positive when counter-clockwise).
#[inline]
pub fn signed_area_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Barycentric coordinates of `p` with respect to the 2D triangle `(a, b, c)`.
///
/// Returns `None` if the triangle is degenerate (the 2D signed-area
/// determinant has magnitude below `1e-12`).
pub fn barycentric_2d(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> Option<(f64, f64, f64)> {
    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() < 1e-12 {
        return None;
    }
    let l0 = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / det;
    let l1 = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / det;
    let l2 = 1.0 - l0 - l1;
    Some((l0, l1, l2))
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Component-wise minimum corner.
    pub min: Point3,
    /// Component-wise maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// The bounding box of a single point (zero volume).
    pub fn from_point(p: &Point3) -> Self {
        Aabb3 { min: *p, max: *p }
    }

    /// The bounding box enclosing three points (a triangle).
    pub fn from_triangle(a: &Point3, b: &Point3, c: &Point3) -> Self {
        let mut bb = Self::from_point(a);
        bb.expand(b);
        bb.expand(c);
        bb
    }

    /// Grow the box to include `p`.
    pub fn expand(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Merge another box into this one.
    pub fn union(&mut self, other: &Aabb3) {
        self.expand(&other.min);
        self.expand(&other.max);
    }

    /// Whether two boxes overlap (touching counts as overlapping).
    pub fn overlaps(&self, other: &Aabb3) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Project this box onto one of the three coordinate planes.
    pub fn project(&self, plane: Plane2) -> Aabb2 {
        let (min_a, min_b) = plane.project(&self.min);
        let (max_a, max_b) = plane.project(&self.max);
        Aabb2 {
            min: Point2::new(min_a, min_b),
            max: Point2::new(max_a, max_b),
        }
    }
}

/// Which pair of axes a 2D projection plane uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane2 {
    /// Project onto (x, y).
    Xy,
    /// Project onto (y, z).
    Yz,
    /// Project onto (x, z).
    Xz,
}

impl Plane2 {
    /// Project a 3D point onto this plane's two axes.
    #[inline]
    pub fn project(&self, p: &Point3) -> (f64, f64) {
        match self {
            Plane2::Xy => (p.x, p.y),
            Plane2::Yz => (p.y, p.z),
            Plane2::Xz => (p.x, p.z),
        }
    }
}

/// Axis-aligned bounding box in 2D (a projected [`Aabb3`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Component-wise minimum corner.
    pub min: Point2,
    /// Component-wise maximum corner.
    pub max: Point2,
}

impl Aabb2 {
    /// Whether two boxes overlap (touching counts as overlapping).
    pub fn overlaps(&self, other: &Aabb2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Whether this box contains a 2D point.
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
