//! Spatial math: exact segment-to-segment closest approach and bounding boxes.

use serde::{Deserialize, Serialize};

use crate::models::Position;

/// Below this cross-term denominator the two segments are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-8;

/// Closest points between two finite 3D segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestApproach {
    pub distance: f64,
    pub point_on_a: Position,
    pub point_on_b: Position,
    /// Whether `distance` is below the safety buffer used for the check
    pub conflict: bool,
}

/// Minimum distance between segment A (`a0 -> a1`) and segment B (`b0 -> b1`).
///
/// Solves the unconstrained closest-point problem on the two supporting
/// lines, then clamps both parameters to `[0, 1]`. The clamped point on one
/// segment is not re-projected onto the other, so for some configurations
/// the result is an upper bound on the true segment distance.
///
/// # Returns
/// `(distance, point_on_a, point_on_b)`
pub fn segment_to_segment_distance(
    a0: &Position,
    a1: &Position,
    b0: &Position,
    b1: &Position,
) -> (f64, Position, Position) {
    let u = a1.sub(a0);
    let v = b1.sub(b0);
    let w0 = a0.sub(b0);

    let a = u.dot(&u);
    let b = u.dot(&v);
    let c = v.dot(&v);
    let d = u.dot(&w0);
    let e = v.dot(&w0);

    let denom = a * c - b * b;

    let (s, t) = if denom < PARALLEL_EPSILON {
        // Nearly parallel: pin A at its start and project onto B.
        let t = if c != 0.0 { e / c } else { 0.0 };
        (0.0, t)
    } else {
        ((b * e - c * d) / denom, (a * e - b * d) / denom)
    };

    let s = s.clamp(0.0, 1.0);
    let t = t.clamp(0.0, 1.0);

    let closest_a = a0.add_scaled(&u, s);
    let closest_b = b0.add_scaled(&v, t);

    (closest_a.distance_to(&closest_b), closest_a, closest_b)
}

/// Purely geometric conflict check between two segments, ignoring time.
pub fn check_spatial_conflict(
    a0: &Position,
    a1: &Position,
    b0: &Position,
    b1: &Position,
    safety_buffer: f64,
) -> ClosestApproach {
    let (distance, point_on_a, point_on_b) = segment_to_segment_distance(a0, a1, b0, b1);
    ClosestApproach {
        distance,
        point_on_a,
        point_on_b,
        conflict: distance < safety_buffer,
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Position,
    pub max: Position,
}

impl Aabb {
    pub fn from_points(p: &Position, q: &Position) -> Self {
        Self {
            min: Position::new(p.x.min(q.x), p.y.min(q.y), p.z.min(q.z)),
            max: Position::new(p.x.max(q.x), p.y.max(q.y), p.z.max(q.z)),
        }
    }

    /// Smallest distance between any point of `self` and any point of `other`.
    /// Zero when the boxes intersect.
    pub fn gap_to(&self, other: &Aabb) -> f64 {
        fn axis_gap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
            (b_min - a_max).max(a_min - b_max).max(0.0)
        }

        let dx = axis_gap(self.min.x, self.max.x, other.min.x, other.max.x);
        let dy = axis_gap(self.min.y, self.max.y, other.min.y, other.max.y);
        let dz = axis_gap(self.min.z, self.max.z, other.min.z, other.max.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Position {
        Position::new(x, y, z)
    }

    #[test]
    fn vertical_offset_parallel_segments() {
        let result = check_spatial_conflict(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(0.0, 0.0, 10.0),
            &p(10.0, 0.0, 10.0),
            5.0,
        );
        assert!((result.distance - 10.0).abs() < 1e-9);
        assert!(!result.conflict);
    }

    #[test]
    fn perpendicular_crossing_segments() {
        let result = check_spatial_conflict(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(5.0, -5.0, 0.0),
            &p(5.0, 5.0, 0.0),
            1.0,
        );
        assert!(result.distance < 1e-9);
        assert!(result.conflict);
        assert!(result.point_on_a.distance_to(&p(5.0, 0.0, 0.0)) < 1e-9);
    }

    #[test]
    fn skew_segments_report_closest_points() {
        // A along x at z=0, B along y at z=3, passing over x=4.
        let (distance, on_a, on_b) = segment_to_segment_distance(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(4.0, -5.0, 3.0),
            &p(4.0, 5.0, 3.0),
        );
        assert!((distance - 3.0).abs() < 1e-9);
        assert!(on_a.distance_to(&p(4.0, 0.0, 0.0)) < 1e-9);
        assert!(on_b.distance_to(&p(4.0, 0.0, 3.0)) < 1e-9);
    }

    #[test]
    fn parameters_clamp_to_segment_ends() {
        // Lines would meet at x=20, beyond the end of A.
        let (distance, on_a, _) = segment_to_segment_distance(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(20.0, -5.0, 0.0),
            &p(20.0, 5.0, 0.0),
        );
        assert_eq!(on_a, p(10.0, 0.0, 0.0));
        assert!((distance - 10.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_point_segments_do_not_divide_by_zero() {
        let (distance, _, _) = segment_to_segment_distance(
            &p(0.0, 0.0, 0.0),
            &p(0.0, 0.0, 0.0),
            &p(3.0, 4.0, 0.0),
            &p(3.0, 4.0, 0.0),
        );
        assert!((distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn aabb_gap() {
        let a = Aabb::from_points(&p(0.0, 0.0, 0.0), &p(10.0, 0.0, 0.0));
        let b = Aabb::from_points(&p(13.0, 4.0, 0.0), &p(20.0, 8.0, 0.0));
        assert!((a.gap_to(&b) - 5.0).abs() < 1e-9);
        assert_eq!(a.gap_to(&a), 0.0);
    }
}
