//! Spatiotemporal conflict resolution.
//!
//! Checks a primary mission against every other tracked flight by sampling
//! both drones' interpolated positions over each overlapping time window
//! and comparing the closest sampled distance to a safety buffer.

use serde::{Deserialize, Serialize};

use crate::models::{ConflictEvent, FlightSchedule, Mission, Position, ResolutionReport};
use crate::rules::ResolverConfig;
use crate::segment::Segment;
use crate::spatial::{check_spatial_conflict, ClosestApproach};
use crate::temporal::segments_time_overlap;

/// Result of evaluating one pair of segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentPairOutcome {
    pub conflict: bool,
    /// `f64::INFINITY` when the segments never share time
    pub min_distance: f64,
    pub conflict_time: Option<f64>,
    pub position_a: Option<Position>,
    pub position_b: Option<Position>,
}

impl SegmentPairOutcome {
    fn no_overlap() -> Self {
        Self {
            conflict: false,
            min_distance: f64::INFINITY,
            conflict_time: None,
            position_a: None,
            position_b: None,
        }
    }
}

/// `num_samples` evenly spaced times over `[start, end]`, both ends included.
/// A single sample sits at `start`.
pub fn sample_times(start: f64, end: f64, num_samples: usize) -> impl Iterator<Item = f64> {
    let step = if num_samples > 1 {
        (end - start) / (num_samples - 1) as f64
    } else {
        0.0
    };
    (0..num_samples).map(move |i| {
        if num_samples > 1 && i == num_samples - 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}

/// Evaluate whether two moving segments come within `safety_buffer` of each other.
///
/// Samples `num_samples` instants across the segments' shared time window and
/// keeps the first sample achieving the smallest separation. This approximates
/// the continuous closest approach and can miss a minimum falling between
/// samples.
pub fn evaluate_segment_pair(
    seg_a: &Segment,
    seg_b: &Segment,
    safety_buffer: f64,
    num_samples: usize,
) -> SegmentPairOutcome {
    let Some((overlap_start, overlap_end)) = segments_time_overlap(seg_a, seg_b) else {
        return SegmentPairOutcome::no_overlap();
    };
    if overlap_end <= overlap_start {
        return SegmentPairOutcome::no_overlap();
    }

    let mut best = SegmentPairOutcome::no_overlap();

    for t in sample_times(overlap_start, overlap_end, num_samples) {
        let pos_a = seg_a.position_at(t);
        let pos_b = seg_b.position_at(t);
        let distance = pos_a.distance_to(&pos_b);

        if distance < best.min_distance {
            best.min_distance = distance;
            best.conflict_time = Some(t);
            best.position_a = Some(pos_a);
            best.position_b = Some(pos_b);
        }
    }

    best.conflict = best.min_distance < safety_buffer;
    best
}

/// Time-independent proximity between a mission segment and another flight's segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricConflict {
    pub other_drone_id: String,
    pub mission_segment: usize,
    pub other_segment: usize,
    pub approach: ClosestApproach,
}

/// Checks missions against a flight schedule.
///
/// Cost grows with drones x primary segments x other segments x samples.
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    config: ResolverConfig,
}

impl ConflictResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Evaluate one segment pair with the configured buffer and sample count.
    pub fn evaluate_pair(&self, seg_a: &Segment, seg_b: &Segment) -> SegmentPairOutcome {
        evaluate_segment_pair(
            seg_a,
            seg_b,
            self.config.safety_buffer_m,
            self.config.num_samples,
        )
    }

    /// Check a primary mission against all other flights.
    ///
    /// Conflicts are collected drones first, then primary segments, then
    /// the other drone's segments. Locations come from the primary path.
    pub fn resolve(&self, mission: &Mission, schedule: &FlightSchedule) -> ResolutionReport {
        let buffer = self.config.safety_buffer_m;
        let mission_segments = mission.drone.segments();
        let mut conflicts = Vec::new();
        let mut skipped_pairs = 0usize;

        for other in &schedule.drones {
            let other_segments = other.segments();

            for seg_a in &mission_segments {
                for seg_b in &other_segments {
                    if self.config.prefilter
                        && seg_a.bounding_box().gap_to(&seg_b.bounding_box()) >= buffer
                    {
                        skipped_pairs += 1;
                        continue;
                    }

                    let outcome = self.evaluate_pair(seg_a, seg_b);
                    if !outcome.conflict {
                        continue;
                    }

                    let (Some(conflict_time), Some(location)) =
                        (outcome.conflict_time, outcome.position_a)
                    else {
                        continue;
                    };

                    tracing::debug!(
                        mission_id = %mission.mission_id,
                        other_drone_id = %other.drone_id,
                        min_distance = outcome.min_distance,
                        conflict_time,
                        "Segment pair conflict"
                    );

                    conflicts.push(ConflictEvent {
                        other_drone_id: other.drone_id.clone(),
                        min_distance: outcome.min_distance,
                        conflict_time,
                        location,
                    });
                }
            }
        }

        let report = ResolutionReport::from_conflicts(mission.mission_id.clone(), conflicts);
        tracing::info!(
            mission_id = %report.mission_id,
            status = %report.status,
            total_conflicts = report.total_conflicts,
            other_drones = schedule.len(),
            skipped_pairs,
            "Mission resolved"
        );
        report
    }

    /// Exact spatial check of every segment pair, ignoring timing.
    pub fn geometric_conflicts(
        &self,
        mission: &Mission,
        schedule: &FlightSchedule,
    ) -> Vec<GeometricConflict> {
        let mission_segments = mission.drone.segments();
        let mut conflicts = Vec::new();

        for other in &schedule.drones {
            for (i, seg_a) in mission_segments.iter().enumerate() {
                for (j, seg_b) in other.segments().iter().enumerate() {
                    let approach = check_spatial_conflict(
                        &seg_a.start,
                        &seg_a.end,
                        &seg_b.start,
                        &seg_b.end,
                        self.config.safety_buffer_m,
                    );
                    if approach.conflict {
                        conflicts.push(GeometricConflict {
                            other_drone_id: other.drone_id.clone(),
                            mission_segment: i,
                            other_segment: j,
                            approach,
                        });
                    }
                }
            }
        }

        conflicts
    }
}

/// Check a primary mission against a schedule with the given configuration.
pub fn resolve_conflicts_for_mission(
    mission: &Mission,
    schedule: &FlightSchedule,
    config: &ResolverConfig,
) -> ResolutionReport {
    ConflictResolver::new(config.clone()).resolve(mission, schedule)
}
