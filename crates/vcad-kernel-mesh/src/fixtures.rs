//! Deterministic test and benchmark fixture generators.
//!
//! Stands in for the rendering-engine adapter's mesh-generation surface
//! (out of scope for the Boolean core itself, per the distilled spec's
//! §1): the core only ever needs *some* watertight solid and *some* open
//! patch to exercise against, and these generators produce exactly the
//! shapes named in the concrete test scenarios.

use vcad_kernel_math::Point3;

use crate::{Triangle, TriangleSoup};

/// Build a closed, axis-aligned cube of the given `size`, centred at
/// `center`, as a triangle soup (12 triangles, 2 per face, wound so each
/// face's normal points outward).
pub fn make_cube(center: Point3, size: f64) -> TriangleSoup {
    let h = size / 2.0;
    let c = center;
    let corners = [
        Point3::new(c.x - h, c.y - h, c.z - h), // 0
        Point3::new(c.x + h, c.y - h, c.z - h), // 1
        Point3::new(c.x + h, c.y + h, c.z - h), // 2
        Point3::new(c.x - h, c.y + h, c.z - h), // 3
        Point3::new(c.x - h, c.y - h, c.z + h), // 4
        Point3::new(c.x + h, c.y - h, c.z + h), // 5
        Point3::new(c.x + h, c.y + h, c.z + h), // 6
        Point3::new(c.x - h, c.y + h, c.z + h), // 7
    ];

    // Each face as two CCW (outward-facing) triangles.
    let faces: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // bottom (-Z), viewed from below
        [4, 5, 6, 7], // top (+Z)
        [0, 1, 5, 4], // -Y
        [1, 2, 6, 5], // +X
        [2, 3, 7, 6], // +Y
        [3, 0, 4, 7], // -X
    ];

    let mut soup = Vec::with_capacity(12);
    for quad in faces {
        let [a, b, c, d] = quad;
        soup.push(Triangle::new(corners[a], corners[b], corners[c]).unwrap());
        soup.push(Triangle::new(corners[a], corners[c], corners[d]).unwrap());
    }
    soup
}

/// Build an open, flat rectangular patch centred at `center` (whose Z
/// coordinate sets the patch's plane height), spanning `size_x` by
/// `size_y` in the XY plane, subdivided into `div_x` by `div_y` cells
/// (two triangles per cell). The boundary is left open — this is not a
/// solid, exercising the Boolean core's handling of non-watertight
/// surfaces.
pub fn make_flat_patch(center: Point3, size_x: f64, size_y: f64, div_x: u32, div_y: u32) -> TriangleSoup {
    let div_x = div_x.max(1);
    let div_y = div_y.max(1);
    let x0 = center.x - size_x / 2.0;
    let y0 = center.y - size_y / 2.0;
    let dx = size_x / div_x as f64;
    let dy = size_y / div_y as f64;

    let mut grid = vec![vec![Point3::origin(); (div_y + 1) as usize]; (div_x + 1) as usize];
    for (i, row) in grid.iter_mut().enumerate() {
        for (j, p) in row.iter_mut().enumerate() {
            *p = Point3::new(x0 + dx * i as f64, y0 + dy * j as f64, center.z);
        }
    }

    let mut soup = Vec::with_capacity((div_x * div_y * 2) as usize);
    for i in 0..div_x as usize {
        for j in 0..div_y as usize {
            let p00 = grid[i][j];
            let p10 = grid[i + 1][j];
            let p11 = grid[i + 1][j + 1];
            let p01 = grid[i][j + 1];
            soup.push(Triangle::new(p00, p10, p11).unwrap());
            soup.push(Triangle::new(p00, p11, p01).unwrap());
        }
    }
    soup
}
