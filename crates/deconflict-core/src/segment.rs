//! Time-parameterized flight segments.

use serde::{Deserialize, Serialize};

use crate::models::{Position, Waypoint};
use crate::spatial::Aabb;
use crate::temporal::interpolate_position;

/// Straight-line, constant-velocity leg between two waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Position,
    pub end: Position,
    pub t_start: f64,
    pub t_end: f64,
}

impl Segment {
    pub fn new(start: Position, end: Position, t_start: f64, t_end: f64) -> Self {
        Self {
            start,
            end,
            t_start,
            t_end,
        }
    }

    pub fn interval(&self) -> (f64, f64) {
        (self.t_start, self.t_end)
    }

    pub fn duration(&self) -> f64 {
        self.t_end - self.t_start
    }

    /// Interpolated position at `t`, clamped to the segment endpoints.
    pub fn position_at(&self, t: f64) -> Position {
        interpolate_position(&self.start, &self.end, self.t_start, self.t_end, t)
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.start, &self.end)
    }
}

/// Build segments from consecutive waypoint pairs.
///
/// Pairs whose second timestamp does not strictly follow the first are
/// dropped without error, so malformed paths yield fewer segments.
pub fn build_segments(waypoints: &[Waypoint]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(waypoints.len().saturating_sub(1));
    for pair in waypoints.windows(2) {
        let (wp1, wp2) = (&pair[0], &pair[1]);
        if wp2.timestamp <= wp1.timestamp {
            tracing::warn!(
                from_id = wp1.id,
                to_id = wp2.id,
                t_from = wp1.timestamp,
                t_to = wp2.timestamp,
                "Dropping segment with non-increasing time"
            );
            continue;
        }
        segments.push(Segment::new(
            wp1.position,
            wp2.position,
            wp1.timestamp,
            wp2.timestamp,
        ));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_waypoint_yield_no_segments() {
        assert!(build_segments(&[]).is_empty());
        assert!(build_segments(&[Waypoint::new(0, 0.0, 0.0, 0.0, 0.0)]).is_empty());
    }

    #[test]
    fn builds_one_segment_per_valid_pair() {
        let waypoints = vec![
            Waypoint::new(0, 0.0, 0.0, 10.0, 0.0),
            Waypoint::new(1, 10.0, 0.0, 10.0, 10.0),
            Waypoint::new(2, 10.0, 10.0, 20.0, 25.0),
        ];
        let segments = build_segments(&waypoints);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start, Position::new(0.0, 0.0, 10.0));
        assert_eq!(segments[0].end, Position::new(10.0, 0.0, 10.0));
        assert_eq!(segments[1].interval(), (10.0, 25.0));
    }

    #[test]
    fn skips_non_increasing_time_pairs() {
        let waypoints = vec![
            Waypoint::new(0, 0.0, 0.0, 0.0, 0.0),
            Waypoint::new(1, 1.0, 0.0, 0.0, 5.0),
            Waypoint::new(2, 2.0, 0.0, 0.0, 5.0),
            Waypoint::new(3, 3.0, 0.0, 0.0, 3.0),
            Waypoint::new(4, 4.0, 0.0, 0.0, 8.0),
        ];
        let segments = build_segments(&waypoints);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].interval(), (0.0, 5.0));
        assert_eq!(segments[1].interval(), (3.0, 8.0));
        assert!(segments.iter().all(|s| s.duration() > 0.0));
    }
}
