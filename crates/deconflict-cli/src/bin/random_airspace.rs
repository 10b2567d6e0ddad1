//! Check a mission against randomly generated traffic.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin random_airspace -- --mission mission_1 --drones 25 --seed 7

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use deconflict_cli::telemetry::init_tracing;
use deconflict_cli::{
    get_mission_by_id, load_missions, plot_mission_3d_svg, plot_mission_svg, Config, Datasets,
};
use deconflict_core::{
    generate_random_flight_schedule, randomize_altitude, slope_altitude, wave_altitude,
    ConflictResolver, Mission, RandomFlightParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AltitudeProfile {
    /// Keep the mission's own altitudes
    Flat,
    /// Climb linearly from 10m to 40m
    Slope,
    /// Half-sine hump between 20m and 30m
    Wave,
    /// Uniform random altitude in [10m, 40m]
    Random,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Stress a mission against random airspace traffic")]
struct Args {
    /// Mission ID from sample_missions.json
    #[arg(long, default_value = "mission_1")]
    mission: String,

    /// Number of random drones
    #[arg(long, default_value_t = 5)]
    drones: usize,

    /// RNG seed for reproducible traffic
    #[arg(long)]
    seed: Option<u64>,

    /// Side of the square area random flights are placed in (meters)
    #[arg(long, default_value_t = 150.0)]
    area: f64,

    /// Latest timestamp for random waypoints (seconds)
    #[arg(long, default_value_t = 100.0)]
    t_max: f64,

    #[arg(long, value_enum, default_value_t = AltitudeProfile::Flat)]
    altitude_profile: AltitudeProfile,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write a top-down SVG of the result
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write a perspective SVG, useful with altitude profiles
    #[arg(long)]
    plot_3d: Option<PathBuf>,
}

fn apply_profile(mission: &Mission, profile: AltitudeProfile, rng: &mut StdRng) -> Mission {
    match profile {
        AltitudeProfile::Flat => mission.clone(),
        AltitudeProfile::Slope => slope_altitude(mission, 10.0, 40.0),
        AltitudeProfile::Wave => wave_altitude(mission, 10.0, 20.0),
        AltitudeProfile::Random => randomize_altitude(mission, rng, 10.0, 40.0),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env();
    init_tracing(&config.log_filter, false)?;
    config.resolver.validate()?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let datasets = Datasets::from_dir(args.data_dir.as_ref().unwrap_or(&config.data_dir));
    let missions = load_missions(&datasets.missions)?;
    let mission = apply_profile(
        get_mission_by_id(&missions, &args.mission)?,
        args.altitude_profile,
        &mut rng,
    );

    let params = RandomFlightParams {
        area_size: args.area,
        t_max: args.t_max,
        ..RandomFlightParams::default()
    };
    let schedule = generate_random_flight_schedule(&mut rng, args.drones, &params);

    let started = Instant::now();
    let report = ConflictResolver::new(config.resolver.clone()).resolve(&mission, &schedule);
    let elapsed = started.elapsed();

    println!("=== {} vs {} random drones ===", mission.mission_id, schedule.len());
    println!(
        "Status: {} | conflicts={} | drones involved={} | {:.2?}",
        report.status,
        report.total_conflicts,
        report.conflicting_drones().len(),
        elapsed
    );
    for conflict in &report.conflicts {
        println!(
            "  {:<18} t={:>7.2}s d={:>6.2}m at ({:.1}, {:.1}, {:.1})",
            conflict.other_drone_id,
            conflict.conflict_time,
            conflict.min_distance,
            conflict.location.x,
            conflict.location.y,
            conflict.location.z
        );
    }

    if let Some(path) = &args.plot {
        plot_mission_svg(path, &mission, &schedule, &report.conflicts)?;
    }
    if let Some(path) = &args.plot_3d {
        plot_mission_3d_svg(path, &mission, &schedule, &report.conflicts)?;
    }

    Ok(())
}
