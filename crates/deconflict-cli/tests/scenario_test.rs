//! End-to-end checks against the sample data set in `data/`.

use std::path::PathBuf;

use deconflict_cli::{
    check_mission_conflicts, load_flight_schedule, load_missions, run_all_scenarios,
    run_scenario, Catalog, Datasets, QueryError,
};
use deconflict_core::{
    ConflictResolver, FlightSchedule, MissionStatus, Profile, Position, ResolverConfig,
};

fn datasets() -> Datasets {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
    Datasets::from_dir(dir)
}

#[test]
fn mission_check_returns_report() {
    let data = datasets();
    let report = check_mission_conflicts(
        &data.missions,
        &data.flights,
        "mission_1",
        &ResolverConfig::default(),
    )
    .unwrap();

    assert_eq!(report.mission_id, "mission_1");
    assert_eq!(report.status, MissionStatus::Clear);
    assert_eq!(report.total_conflicts, report.conflicts.len());
}

#[test]
fn crossing_scenario_matches() {
    let data = datasets();
    let outcome = run_scenario(
        &data.missions,
        &data.flights,
        &data.scenarios,
        "scenario_2",
        &ResolverConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.expected_status, MissionStatus::ConflictDetected);
    assert_eq!(outcome.actual_status, MissionStatus::ConflictDetected);
    assert!(outcome.matches);
    assert_eq!(outcome.raw_output.total_conflicts, 1);

    let conflict = &outcome.raw_output.conflicts[0];
    assert_eq!(conflict.other_drone_id, "flight_B");
    assert!((conflict.conflict_time - 50.0).abs() < 2.5);
    assert!(conflict.location.distance_to(&Position::new(500.0, 500.0, 30.0)) < 25.0);
}

#[test]
fn every_sample_scenario_matches_with_default_config() {
    let outcomes = run_all_scenarios(&datasets(), &ResolverConfig::default()).unwrap();
    assert_eq!(outcomes.len(), 5);
    for outcome in &outcomes {
        assert!(outcome.matches, "{} did not match", outcome.scenario_id);
        assert_eq!(
            outcome.raw_output.total_conflicts, outcome.expected_conflicts,
            "{} conflict count",
            outcome.scenario_id
        );
    }
}

#[test]
fn production_buffer_breaks_vertical_separation() {
    let data = datasets();
    let outcome = run_scenario(
        &data.missions,
        &data.flights,
        &data.scenarios,
        "scenario_4",
        &ResolverConfig::for_profile(Profile::Production),
    )
    .unwrap();

    assert!(!outcome.matches);
    assert_eq!(outcome.actual_status, MissionStatus::ConflictDetected);
    let conflict = &outcome.raw_output.conflicts[0];
    assert_eq!(conflict.other_drone_id, "flight_D");
    assert!((conflict.min_distance - 70.0).abs() < 1e-9);
}

#[test]
fn unknown_ids_are_not_found() {
    let data = datasets();
    let err = check_mission_conflicts(
        &data.missions,
        &data.flights,
        "mission_404",
        &ResolverConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, QueryError::MissionNotFound(id) if id == "mission_404"));

    let err = run_scenario(
        &data.missions,
        &data.flights,
        &data.scenarios,
        "scenario_404",
        &ResolverConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, QueryError::ScenarioNotFound(_)));
}

#[test]
fn sample_data_loads_with_coercion_and_skipped_segments() {
    let data = datasets();
    let flights = load_flight_schedule(&data.flights).unwrap();
    let remote = flights.get("flight_A").unwrap();
    assert_eq!(remote.waypoints[0].position.z, 30.0);
    assert_eq!(remote.waypoints[1].position.z, 0.0);

    let missions = load_missions(&data.missions).unwrap();
    let backtracking = missions
        .iter()
        .find(|m| m.mission_id == "mission_5")
        .unwrap();
    assert_eq!(backtracking.drone.waypoints.len(), 4);
    assert_eq!(backtracking.drone.segments().len(), 2);
}

#[test]
fn every_mission_is_clear_against_empty_schedule() {
    let missions = load_missions(&datasets().missions).unwrap();
    let resolver = ConflictResolver::new(ResolverConfig::default());
    for mission in &missions {
        let report = resolver.resolve(mission, &FlightSchedule::default());
        assert_eq!(report.status, MissionStatus::Clear);
        assert_eq!(report.total_conflicts, 0);
    }
}

#[test]
fn loaded_catalog_agrees_with_file_queries() {
    let data = datasets();
    let config = ResolverConfig::default();
    let catalog = Catalog::load(&data).unwrap();
    assert_eq!(catalog.scenarios.len(), 5);

    let from_catalog = catalog.run_all(&config).unwrap();
    let from_files = run_all_scenarios(&data, &config).unwrap();
    assert_eq!(from_catalog, from_files);

    let report = catalog.check_mission("mission_2", &config).unwrap();
    let expected =
        check_mission_conflicts(&data.missions, &data.flights, "mission_2", &config).unwrap();
    assert_eq!(report, expected);
}
