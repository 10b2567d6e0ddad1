//! Core data models for the deconfliction engine.

use serde::{Deserialize, Serialize};

use crate::segment::{build_segments, Segment};

/// A point in the local Cartesian airspace frame (meters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn sub(&self, other: &Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn add_scaled(&self, direction: &Position, scale: f64) -> Position {
        Position::new(
            self.x + scale * direction.x,
            self.y + scale * direction.y,
            self.z + scale * direction.z,
        )
    }

    pub fn dot(&self, other: &Position) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.sub(other).norm()
    }

    /// Affine interpolation, `alpha = 0` yields `self` and `alpha = 1` yields `other`.
    pub fn lerp(&self, other: &Position, alpha: f64) -> Position {
        Position::new(
            self.x + alpha * (other.x - self.x),
            self.y + alpha * (other.y - self.y),
            self.z + alpha * (other.z - self.z),
        )
    }
}

impl From<(f64, f64, f64)> for Position {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Position::new(x, y, z)
    }
}

/// A timed waypoint along a flight path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: i64,
    #[serde(flatten)]
    pub position: Position,
    pub timestamp: f64,
}

impl Waypoint {
    pub fn new(id: i64, x: f64, y: f64, z: f64, timestamp: f64) -> Self {
        Self {
            id,
            position: Position::new(x, y, z),
            timestamp,
        }
    }

    /// Copy of this waypoint flown at a different altitude.
    pub fn with_altitude(&self, z: f64) -> Self {
        Self {
            position: Position { z, ..self.position },
            ..self.clone()
        }
    }
}

/// Any drone flight, either a mission's primary path or tracked traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub drone_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Traversal order. Expected to have increasing timestamps.
    pub waypoints: Vec<Waypoint>,
}

impl Drone {
    pub fn new(drone_id: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            drone_id: drone_id.into(),
            name: String::new(),
            description: String::new(),
            waypoints,
        }
    }

    /// Set descriptive metadata.
    pub fn with_metadata(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// Straight-line, constant-velocity segments between consecutive waypoints.
    pub fn segments(&self) -> Vec<Segment> {
        build_segments(&self.waypoints)
    }

    /// First and last waypoint timestamps.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let first = self.waypoints.first()?;
        let last = self.waypoints.last()?;
        Some((first.timestamp, last.timestamp))
    }

    /// Where the drone is at time `t`, or `None` outside its segments.
    pub fn position_at(&self, t: f64) -> Option<Position> {
        self.segments()
            .iter()
            .find(|seg| seg.t_start <= t && t <= seg.t_end)
            .map(|seg| seg.position_at(t))
    }

    /// Same flight with every waypoint replaced by `f(index, waypoint)`.
    pub fn map_waypoints<F>(&self, mut f: F) -> Drone
    where
        F: FnMut(usize, &Waypoint) -> Waypoint,
    {
        Drone {
            waypoints: self
                .waypoints
                .iter()
                .enumerate()
                .map(|(idx, wp)| f(idx, wp))
                .collect(),
            ..self.clone()
        }
    }
}

/// Overall time window declared for a mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_time: f64,
    pub end_time: f64,
}

impl TimeWindow {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).abs()
    }
}

/// A primary flight whose path is checked against other traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub time_window: TimeWindow,
    pub drone: Drone,
}

impl Mission {
    pub fn new(mission_id: impl Into<String>, time_window: TimeWindow, drone: Drone) -> Self {
        Self {
            mission_id: mission_id.into(),
            name: String::new(),
            description: String::new(),
            time_window,
            drone,
        }
    }

    /// Same mission flying a different path.
    pub fn with_drone(&self, drone: Drone) -> Mission {
        Mission {
            drone,
            ..self.clone()
        }
    }
}

/// Other flights sharing the airspace with a mission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightSchedule {
    pub drones: Vec<Drone>,
}

impl FlightSchedule {
    pub fn new(drones: Vec<Drone>) -> Self {
        Self { drones }
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    pub fn get(&self, drone_id: &str) -> Option<&Drone> {
        self.drones.iter().find(|d| d.drone_id == drone_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// No conflicting segment pair found
    Clear,
    /// At least one conflict event
    ConflictDetected,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Clear => "clear",
            MissionStatus::ConflictDetected => "conflict_detected",
        }
    }
}

impl std::fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named regression scenario with its expected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub primary_mission_id: String,
    pub expected_result: MissionStatus,
    pub expected_conflicts: usize,
    #[serde(default)]
    pub conflict_details: Option<serde_json::Value>,
}

/// One conflicting segment pair, reported in the primary mission's frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictEvent {
    pub other_drone_id: String,
    pub min_distance: f64,
    pub conflict_time: f64,
    /// Primary drone's position at `conflict_time`
    pub location: Position,
}

/// Outcome of checking one mission against a flight schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub mission_id: String,
    pub status: MissionStatus,
    pub total_conflicts: usize,
    pub conflicts: Vec<ConflictEvent>,
}

impl ResolutionReport {
    pub fn from_conflicts(mission_id: impl Into<String>, conflicts: Vec<ConflictEvent>) -> Self {
        let status = if conflicts.is_empty() {
            MissionStatus::Clear
        } else {
            MissionStatus::ConflictDetected
        };
        Self {
            mission_id: mission_id.into(),
            status,
            total_conflicts: conflicts.len(),
            conflicts,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.status == MissionStatus::Clear
    }

    /// Distinct drone ids involved in conflicts, in first-seen order.
    pub fn conflicting_drones(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for conflict in &self.conflicts {
            if !ids.contains(&conflict.other_drone_id.as_str()) {
                ids.push(&conflict.other_drone_id);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_midpoint_is_mean() {
        let a = Position::new(0.0, 0.0, 10.0);
        let b = Position::new(10.0, 4.0, 20.0);
        assert_eq!(a.lerp(&b, 0.5), Position::new(5.0, 2.0, 15.0));
    }

    #[test]
    fn position_z_defaults_to_zero() {
        let pos: Position = serde_json::from_str(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert_eq!(pos, Position::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn report_status_follows_conflicts() {
        let clear = ResolutionReport::from_conflicts("m1", Vec::new());
        assert_eq!(clear.status, MissionStatus::Clear);
        assert_eq!(clear.total_conflicts, 0);

        let event = ConflictEvent {
            other_drone_id: "d1".to_string(),
            min_distance: 1.0,
            conflict_time: 5.0,
            location: Position::new(5.0, 0.0, 10.0),
        };
        let report = ResolutionReport::from_conflicts("m1", vec![event.clone(), event]);
        assert_eq!(report.status, MissionStatus::ConflictDetected);
        assert_eq!(report.total_conflicts, 2);
        assert_eq!(report.conflicting_drones(), vec!["d1"]);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&MissionStatus::ConflictDetected).unwrap();
        assert_eq!(json, "\"conflict_detected\"");
        let parsed: MissionStatus = serde_json::from_str("\"clear\"").unwrap();
        assert_eq!(parsed, MissionStatus::Clear);
    }

    #[test]
    fn map_waypoints_leaves_original_untouched() {
        let drone = Drone::new(
            "d1",
            vec![Waypoint::new(0, 0.0, 0.0, 10.0, 0.0), Waypoint::new(1, 1.0, 0.0, 10.0, 1.0)],
        );
        let raised = drone.map_waypoints(|_, wp| wp.with_altitude(30.0));
        assert_eq!(raised.waypoints[0].position.z, 30.0);
        assert_eq!(drone.waypoints[0].position.z, 10.0);
    }

    #[test]
    fn drone_position_follows_segments() {
        let drone = Drone::new(
            "d1",
            vec![
                Waypoint::new(0, 0.0, 0.0, 10.0, 10.0),
                Waypoint::new(1, 100.0, 0.0, 10.0, 20.0),
                Waypoint::new(2, 100.0, 0.0, 50.0, 30.0),
            ],
        );
        assert_eq!(drone.position_at(15.0), Some(Position::new(50.0, 0.0, 10.0)));
        assert_eq!(drone.position_at(25.0), Some(Position::new(100.0, 0.0, 30.0)));
        assert_eq!(drone.position_at(30.0), Some(Position::new(100.0, 0.0, 50.0)));
        assert_eq!(drone.position_at(5.0), None);
        assert_eq!(drone.position_at(31.0), None);
    }
}
