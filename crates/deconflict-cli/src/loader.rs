//! JSON loaders for missions, flight schedules and test scenarios.
//!
//! Waypoints are validated before they reach the core: `id`, `x`, `y` and
//! `timestamp` are required, `z` defaults to 0, and numeric fields accept
//! either JSON numbers or numeric strings.

use std::path::{Path, PathBuf};

use deconflict_core::{Drone, FlightSchedule, Mission, TestScenario, TimeWindow, Waypoint};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{owner}: waypoint {index} is not an object")]
    NotAnObject { owner: String, index: usize },
    #[error("{owner}: waypoint {index} missing required field '{field}'")]
    MissingField {
        owner: String,
        index: usize,
        field: &'static str,
    },
    #[error("{owner}: waypoint {index} field '{field}' is not numeric")]
    InvalidNumber {
        owner: String,
        index: usize,
        field: &'static str,
    },
}

const REQUIRED_FIELDS: [&str; 4] = ["id", "x", "y", "timestamp"];

#[derive(Debug, Deserialize)]
struct RawTimeWindow {
    start_time: f64,
    end_time: f64,
}

#[derive(Debug, Deserialize)]
struct RawMission {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    time_window: RawTimeWindow,
    waypoints: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawFlight {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    waypoints: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct MissionFile {
    missions: Vec<RawMission>,
}

#[derive(Debug, Deserialize)]
struct FlightFile {
    flights: Vec<RawFlight>,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    test_scenarios: Vec<TestScenario>,
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn numeric(
    value: &Value,
    field: &'static str,
    owner: &str,
    index: usize,
) -> Result<f64, LoadError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| LoadError::InvalidNumber {
        owner: owner.to_string(),
        index,
        field,
    })
}

/// Waypoint ids must be whole numbers: integral JSON numbers or integer strings.
fn integer_id(value: &Value, owner: &str, index: usize) -> Result<i64, LoadError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| LoadError::InvalidNumber {
        owner: owner.to_string(),
        index,
        field: "id",
    })
}

/// Validate and convert one raw waypoint object.
pub fn parse_waypoint(raw: &Value, owner: &str, index: usize) -> Result<Waypoint, LoadError> {
    let Some(obj) = raw.as_object() else {
        return Err(LoadError::NotAnObject {
            owner: owner.to_string(),
            index,
        });
    };

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            return Err(LoadError::MissingField {
                owner: owner.to_string(),
                index,
                field,
            });
        }
    }

    let id = integer_id(&obj["id"], owner, index)?;
    let x = numeric(&obj["x"], "x", owner, index)?;
    let y = numeric(&obj["y"], "y", owner, index)?;
    let timestamp = numeric(&obj["timestamp"], "timestamp", owner, index)?;
    let z = match obj.get("z") {
        Some(value) => numeric(value, "z", owner, index)?,
        None => 0.0,
    };

    Ok(Waypoint::new(id, x, y, z, timestamp))
}

fn parse_waypoints(raw: &[Value], owner: &str) -> Result<Vec<Waypoint>, LoadError> {
    raw.iter()
        .enumerate()
        .map(|(index, wp)| parse_waypoint(wp, owner, index))
        .collect()
}

pub fn load_missions_from_str(json: &str) -> Result<Vec<Mission>, LoadError> {
    let file: MissionFile = serde_json::from_str(json)?;
    file.missions
        .into_iter()
        .map(|m| -> Result<Mission, LoadError> {
            let waypoints = parse_waypoints(&m.waypoints, &m.id)?;
            let drone = Drone::new(m.id.clone(), waypoints)
                .with_metadata(m.name.clone(), m.description.clone());
            Ok(Mission {
                mission_id: m.id,
                name: m.name,
                description: m.description,
                time_window: TimeWindow::new(m.time_window.start_time, m.time_window.end_time),
                drone,
            })
        })
        .collect()
}

pub fn load_missions<P: AsRef<Path>>(path: P) -> Result<Vec<Mission>, LoadError> {
    let missions = load_missions_from_str(&read_file(path.as_ref())?)?;
    tracing::debug!(path = %path.as_ref().display(), count = missions.len(), "Loaded missions");
    Ok(missions)
}

pub fn load_flight_schedule_from_str(json: &str) -> Result<FlightSchedule, LoadError> {
    let file: FlightFile = serde_json::from_str(json)?;
    let drones = file
        .flights
        .into_iter()
        .map(|f| -> Result<Drone, LoadError> {
            let waypoints = parse_waypoints(&f.waypoints, &f.id)?;
            Ok(Drone::new(f.id, waypoints).with_metadata(f.name, f.description))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FlightSchedule::new(drones))
}

pub fn load_flight_schedule<P: AsRef<Path>>(path: P) -> Result<FlightSchedule, LoadError> {
    let schedule = load_flight_schedule_from_str(&read_file(path.as_ref())?)?;
    tracing::debug!(path = %path.as_ref().display(), count = schedule.len(), "Loaded flights");
    Ok(schedule)
}

pub fn load_test_scenarios_from_str(json: &str) -> Result<Vec<TestScenario>, LoadError> {
    let file: ScenarioFile = serde_json::from_str(json)?;
    Ok(file.test_scenarios)
}

pub fn load_test_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<TestScenario>, LoadError> {
    load_test_scenarios_from_str(&read_file(path.as_ref())?)
}
