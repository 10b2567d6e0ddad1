//! Time interval overlap and position interpolation along segments.

use crate::models::Position;
use crate::segment::Segment;

/// Intersection of two closed time intervals.
///
/// Reversed bounds are normalized first. Returns `None` unless the
/// intersection has strictly positive duration, so intervals that only
/// touch at an endpoint do not overlap.
pub fn time_overlap(interval_a: (f64, f64), interval_b: (f64, f64)) -> Option<(f64, f64)> {
    let (a_start, a_end) = ordered(interval_a);
    let (b_start, b_end) = ordered(interval_b);

    let start = a_start.max(b_start);
    let end = a_end.min(b_end);

    if start < end {
        Some((start, end))
    } else {
        None
    }
}

fn ordered((start, end): (f64, f64)) -> (f64, f64) {
    if end < start {
        (end, start)
    } else {
        (start, end)
    }
}

/// Overlapping time interval of two segments, if any.
pub fn segments_time_overlap(seg_a: &Segment, seg_b: &Segment) -> Option<(f64, f64)> {
    time_overlap(seg_a.interval(), seg_b.interval())
}

/// Linearly interpolate a position along a segment at time `t`.
///
/// A segment with `t_end <= t_start` is treated as stationary at `start`.
/// Query times outside `[t_start, t_end]` clamp to the nearest endpoint.
pub fn interpolate_position(
    start: &Position,
    end: &Position,
    t_start: f64,
    t_end: f64,
    t: f64,
) -> Position {
    if t_end <= t_start {
        return *start;
    }
    if t <= t_start {
        return *start;
    }
    if t >= t_end {
        return *end;
    }

    let alpha = (t - t_start) / (t_end - t_start);
    start.lerp(end, alpha)
}
