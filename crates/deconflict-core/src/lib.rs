pub mod conflict;
pub mod models;
pub mod modifiers;
pub mod rules;
pub mod segment;
pub mod spatial;
pub mod temporal;
pub mod traffic;

pub use conflict::{
    evaluate_segment_pair, resolve_conflicts_for_mission, ConflictResolver, GeometricConflict,
    SegmentPairOutcome,
};
pub use models::{
    ConflictEvent, Drone, FlightSchedule, Mission, MissionStatus, Position, ResolutionReport,
    TestScenario, TimeWindow, Waypoint,
};
pub use modifiers::{randomize_altitude, slope_altitude, wave_altitude};
pub use rules::{ConfigError, Profile, ResolverConfig};
pub use segment::{build_segments, Segment};
pub use spatial::{check_spatial_conflict, segment_to_segment_distance, ClosestApproach};
pub use temporal::{interpolate_position, segments_time_overlap, time_overlap};
pub use traffic::{generate_random_drone, generate_random_flight_schedule, RandomFlightParams};
