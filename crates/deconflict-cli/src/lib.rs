//! Deconfliction CLI - loaders, query layer and tooling around the core engine.
//!
//! Binaries:
//! - deconflict: check a mission or run scenarios from the data directory
//! - random_airspace: check a mission against randomly generated traffic

pub mod config;
pub mod loader;
pub mod plot;
pub mod query;
pub mod telemetry;

pub use config::Config;
pub use loader::{load_flight_schedule, load_missions, load_test_scenarios, LoadError};
pub use plot::{animate_mission_svg, plot_mission_3d_svg, plot_mission_svg, PlotError, View};
pub use query::{
    check_mission_conflicts, get_mission_by_id, run_all_scenarios, run_scenario, Catalog,
    Datasets, QueryError, ScenarioOutcome,
};
