//! Make a triangle group's winding self-consistent via BFS over a
//! half-edge adjacency map, falling back to a per-triangle heuristic when
//! the group isn't manifold.

use std::collections::{HashMap, VecDeque};

use vcad_kernel_math::{vertex_key, VertexKey};
use vcad_kernel_mesh::{orient::orient_z_up, Triangle};

type EdgeBucket = HashMap<(VertexKey, VertexKey), Vec<(usize, bool)>>;

/// Make every triangle in `soup` traverse its shared edges consistently
/// with its neighbours. If any edge isn't shared by exactly two triangles,
/// the group is not manifold and each triangle is instead reoriented
/// individually via [`orient_z_up`].
pub fn propagate_winding(soup: &[Triangle]) -> Vec<Triangle> {
    if soup.is_empty() {
        return Vec::new();
    }
    let buckets = build_edge_buckets(soup);
    if !is_manifold(&buckets) {
        return soup.iter().map(orient_z_up).collect();
    }

    let adjacency = build_adjacency(soup.len(), &buckets);
    let mut flip = vec![false; soup.len()];
    let mut visited = vec![false; soup.len()];

    for seed in 0..soup.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut queue = VecDeque::new();
        queue.push_back(seed);
        while let Some(current) = queue.pop_front() {
            for &(neighbour, needs_flip_relative) in &adjacency[current] {
                if visited[neighbour] {
                    continue;
                }
                visited[neighbour] = true;
                flip[neighbour] = if needs_flip_relative {
                    !flip[current]
                } else {
                    flip[current]
                };
                queue.push_back(neighbour);
            }
        }
    }

    soup.iter()
        .zip(flip)
        .map(|(tri, should_flip)| if should_flip { tri.flipped() } else { *tri })
        .collect()
}

fn build_edge_buckets(soup: &[Triangle]) -> EdgeBucket {
    let mut buckets: EdgeBucket = HashMap::new();
    for (idx, tri) in soup.iter().enumerate() {
        let keys = [vertex_key(&tri.v0), vertex_key(&tri.v1), vertex_key(&tri.v2)];
        for k in 0..3 {
            let a = keys[k];
            let b = keys[(k + 1) % 3];
            let (canon, forward) = if a <= b { ((a, b), true) } else { ((b, a), false) };
            buckets.entry(canon).or_default().push((idx, forward));
        }
    }
    buckets
}

fn is_manifold(buckets: &EdgeBucket) -> bool {
    buckets.values().all(|entries| entries.len() == 2)
}

/// Adjacency list: for each triangle, its neighbours paired with whether
/// traversing the shared edge means the neighbour needs the opposite flip
/// state from this triangle's current one.
fn build_adjacency(count: usize, buckets: &EdgeBucket) -> Vec<Vec<(usize, bool)>> {
    let mut adjacency = vec![Vec::new(); count];
    for entries in buckets.values() {
        if entries.len() != 2 {
            continue;
        }
        let (i, forward_i) = entries[0];
        let (j, forward_j) = entries[1];
        // Same absolute traversal direction across a shared edge is
        // inconsistent winding; require a flip between neighbours.
        let needs_flip = forward_i == forward_j;
        adjacency[i].push((j, needs_flip));
        adjacency[j].push((i, needs_flip));
    }
    adjacency
}
