//! Measures on simple polygons given as ordered vertex lists.
//!
//! The polygon is implicitly closed: the last vertex connects back to the first.

use crate::core::types::Vec2;

/// Unsigned area via the shoelace formula. Fewer than three vertices yield 0.
pub fn area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    // Relative to the first vertex to keep precision far from the origin
    let origin = points[0];
    let mut twice_area = 0.0;
    for (i, p) in points.iter().enumerate() {
        let p = *p - origin;
        let q = points[(i + 1) % points.len()] - origin;
        twice_area += p.x * q.y - q.x * p.y;
    }
    twice_area.abs() / 2.0
}

/// True if every coordinate is finite
pub fn all_finite(points: &[Vec2]) -> bool {
    points.iter().all(|p| p.is_finite())
}

/// A polygon is degenerate when it has fewer than three vertices,
/// all vertices coincide, or it encloses no area.
pub fn is_degenerate(points: &[Vec2]) -> bool {
    if points.len() < 3 {
        return true;
    }
    let first = points[0];
    if points.iter().all(|p| *p == first) {
        return true;
    }
    area(points) <= f32::EPSILON
}
