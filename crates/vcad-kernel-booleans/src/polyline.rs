//! Chaining intersection segments into connected polylines and
//! simplifying them by minimum spacing.

use std::collections::VecDeque;

use vcad_kernel_math::{distance, Point3};

use crate::ssi::Segment;

/// Chain `segments` into connected polylines, joining two segments when an
/// endpoint of one lies within `threshold` of an endpoint of the other.
/// Order within a polyline follows the chaining direction found; segments
/// that don't connect to anything become single-segment polylines.
pub fn chain_segments(segments: &[Segment], threshold: f64) -> Vec<Vec<Point3>> {
    let mut remaining: Vec<Segment> = segments.to_vec();
    let mut polylines = Vec::new();

    while !remaining.is_empty() {
        let seed = remaining.remove(0);
        let mut chain: VecDeque<Point3> = VecDeque::new();
        chain.push_back(seed.p0);
        chain.push_back(seed.p1);

        loop {
            let mut extended = false;
            let back = *chain.back().unwrap();
            if let Some(pos) = remaining.iter().position(|s| distance(&s.p0, &back) < threshold) {
                chain.push_back(remaining.remove(pos).p1);
                extended = true;
            } else if let Some(pos) = remaining.iter().position(|s| distance(&s.p1, &back) < threshold) {
                chain.push_back(remaining.remove(pos).p0);
                extended = true;
            }

            let front = *chain.front().unwrap();
            if let Some(pos) = remaining.iter().position(|s| distance(&s.p1, &front) < threshold) {
                chain.push_front(remaining.remove(pos).p0);
                extended = true;
            } else if let Some(pos) = remaining.iter().position(|s| distance(&s.p0, &front) < threshold) {
                chain.push_front(remaining.remove(pos).p1);
                extended = true;
            }

            if !extended {
                break;
            }
        }

        polylines.push(chain.into_iter().collect());
    }

    polylines
}

/// Reduce a polyline to points at least `spacing` apart, always keeping the
/// first and last vertex. Returns `points` unchanged if it has two or fewer
/// vertices, or if `spacing` is zero or negative.
pub fn simplify_polyline(points: &[Point3], spacing: f64) -> Vec<Point3> {
    if points.len() <= 2 || spacing <= 0.0 {
        return points.to_vec();
    }

    let mut result = Vec::with_capacity(points.len());
    result.push(points[0]);
    let mut last = points[0];
    for &p in &points[1..points.len() - 1] {
        if distance(&last, &p) >= spacing {
            result.push(p);
            last = p;
        }
    }
    result.push(*points.last().unwrap());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(p0: (f64, f64, f64), p1: (f64, f64, f64)) -> Segment {
        Segment {
            p0: Point3::new(p0.0, p0.1, p0.2),
            p1: Point3::new(p1.0, p1.1, p1.2),
        }
    }

    #[test]
    fn test_chain_segments_joins_collinear_chain() {
        let segments = vec![
            seg((0.0, 0.0, 0.0), (1.0, 0.0, 0.0)),
            seg((1.0, 0.0, 0.0), (2.0, 0.0, 0.0)),
            seg((2.0, 0.0, 0.0), (3.0, 0.0, 0.0)),
        ];
        let chains = chain_segments(&segments, 0.01);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 4);
    }

    #[test]
    fn test_chain_segments_disjoint_stays_separate() {
        let segments = vec![
            seg((0.0, 0.0, 0.0), (1.0, 0.0, 0.0)),
            seg((100.0, 0.0, 0.0), (101.0, 0.0, 0.0)),
        ];
        let chains = chain_segments(&segments, 0.01);
        assert_eq!(chains.len(), 2);
    }

    #[test]
    fn test_simplify_polyline_reduces_dense_line() {
        let points: Vec<Point3> = (0..100).map(|i| Point3::new(i as f64 * 0.1, 0.0, 0.0)).collect();
        let simplified = simplify_polyline(&points, 1.0);
        assert!(simplified.len() < points.len());
        assert_eq!(simplified.first(), points.first());
        assert_eq!(simplified.last(), points.last());
    }

    #[test]
    fn test_simplify_polyline_passthrough_short_input() {
        let points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(simplify_polyline(&points, 1.0), points);
    }

    #[test]
    fn test_simplify_polyline_passthrough_zero_spacing() {
        let points: Vec<Point3> = (0..10).map(|i| Point3::new(i as f64 * 0.1, 0.0, 0.0)).collect();
        assert_eq!(simplify_polyline(&points, 0.0), points);
    }
}
