//! Check a planned mission against tracked traffic, or run named scenarios.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin deconflict -- --mission mission_2
//!   cargo run -p deconflict-cli --bin deconflict -- --scenario scenario_2 --plot out.svg
//!   cargo run -p deconflict-cli --bin deconflict -- --mission mission_4 --plot-3d out3d.svg
//!   cargo run -p deconflict-cli --bin deconflict -- --mission mission_2 --animate frames/
//!   cargo run -p deconflict-cli --bin deconflict -- --all-scenarios

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use deconflict_cli::telemetry::init_tracing;
use deconflict_cli::{
    animate_mission_svg, plot_mission_3d_svg, plot_mission_svg, Catalog, Config, Datasets, View,
};
use deconflict_core::{ConflictEvent, ConflictResolver, ResolverConfig};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FrameView {
    /// x/y from above
    TopDown,
    /// Perspective view including altitude
    Perspective,
}

impl From<FrameView> for View {
    fn from(view: FrameView) -> Self {
        match view {
            FrameView::TopDown => View::TopDown,
            FrameView::Perspective => View::Perspective,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Spatiotemporal deconfliction for planned drone missions")]
struct Args {
    /// Mission ID to check against the flight schedule
    #[arg(long, conflicts_with_all = ["scenario", "all_scenarios"])]
    mission: Option<String>,

    /// Scenario ID from scenarios.json
    #[arg(long, conflicts_with = "all_scenarios")]
    scenario: Option<String>,

    /// Run every scenario and report mismatches
    #[arg(long)]
    all_scenarios: bool,

    /// Directory holding sample_missions.json, simulated_flights.json, scenarios.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON config file overlay
    #[arg(long)]
    config: Option<PathBuf>,

    /// Safety buffer in meters (overrides config)
    #[arg(long)]
    safety_buffer: Option<f64>,

    /// Samples per overlapping segment pair (overrides config)
    #[arg(long)]
    samples: Option<usize>,

    /// Evaluate every segment pair, without bounding-box pruning
    #[arg(long)]
    no_prefilter: bool,

    /// Also report time-independent path proximity for --mission
    #[arg(long)]
    geometric: bool,

    /// Write a top-down SVG of the checked mission
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write a perspective SVG of the checked mission, altitude included
    #[arg(long)]
    plot_3d: Option<PathBuf>,

    /// Write time-stepped SVG frames of the checked mission into this directory
    #[arg(long)]
    animate: Option<PathBuf>,

    /// Number of frames for --animate
    #[arg(long, default_value_t = 30)]
    frames: usize,

    /// Projection for --animate
    #[arg(long, value_enum, default_value_t = FrameView::TopDown)]
    frame_view: FrameView,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn wants_images(&self) -> bool {
        self.plot.is_some() || self.plot_3d.is_some() || self.animate.is_some()
    }
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    checked_at: DateTime<Utc>,
    safety_buffer_m: f64,
    num_samples: usize,
    result: T,
}

fn print_json<T: Serialize>(resolver: &ResolverConfig, result: T) -> Result<()> {
    let envelope = Envelope {
        checked_at: Utc::now(),
        safety_buffer_m: resolver.safety_buffer_m,
        num_samples: resolver.num_samples,
        result,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn write_images(
    args: &Args,
    catalog: &Catalog,
    mission_id: &str,
    conflicts: &[ConflictEvent],
) -> Result<()> {
    let mission = catalog.mission(mission_id)?;
    if let Some(path) = &args.plot {
        plot_mission_svg(path, mission, &catalog.flights, conflicts)?;
    }
    if let Some(path) = &args.plot_3d {
        plot_mission_3d_svg(path, mission, &catalog.flights, conflicts)?;
    }
    if let Some(dir) = &args.animate {
        animate_mission_svg(
            dir,
            args.frame_view.into(),
            args.frames,
            mission,
            &catalog.flights,
            conflicts,
        )?;
    }
    Ok(())
}

/// Environment, then config file, then command-line overrides.
///
/// Returns whether the config file was found so the caller can log it once
/// the subscriber is installed.
fn resolve_config(args: &Args) -> Result<(Config, Option<(&Path, bool)>)> {
    let mut config = Config::from_env();

    let file_status = match &args.config {
        Some(path) => {
            let loaded = config
                .apply_file(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            Some((path.as_path(), loaded))
        }
        None => None,
    };
    if let Some(buffer) = args.safety_buffer {
        config.resolver.safety_buffer_m = buffer;
    }
    if let Some(samples) = args.samples {
        config.resolver.num_samples = samples;
    }
    if args.no_prefilter {
        config.resolver.prefilter = false;
    }
    config.resolver.validate()?;
    Ok((config, file_status))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, file_status) = resolve_config(&args)?;
    init_tracing(&config.log_filter, args.json_logs)?;
    match file_status {
        Some((path, true)) => tracing::info!(path = %path.display(), "Configuration loaded"),
        Some((path, false)) => {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults")
        }
        None => {}
    }

    let data_dir = args.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let datasets = Datasets::from_dir(&data_dir);
    tracing::debug!(?datasets, resolver = ?config.resolver, "Configuration resolved");

    if args.all_scenarios {
        let outcomes = Catalog::load(&datasets)
            .and_then(|catalog| catalog.run_all(&config.resolver))
            .context("running scenarios")?;
        let mismatches = outcomes.iter().filter(|o| !o.matches).count();
        print_json(&config.resolver, &outcomes)?;
        if mismatches > 0 {
            anyhow::bail!("{mismatches} of {} scenarios did not match", outcomes.len());
        }
        return Ok(());
    }

    if let Some(scenario_id) = &args.scenario {
        let catalog = Catalog::load(&datasets).context("loading data")?;
        let outcome = catalog
            .run_scenario(scenario_id, &config.resolver)
            .with_context(|| format!("running scenario {scenario_id}"))?;

        if args.wants_images() {
            write_images(
                &args,
                &catalog,
                &outcome.raw_output.mission_id,
                &outcome.raw_output.conflicts,
            )?;
        }
        print_json(&config.resolver, &outcome)?;
        return Ok(());
    }

    if let Some(mission_id) = &args.mission {
        let catalog = Catalog::load_traffic(&datasets).context("loading data")?;
        let report = catalog
            .check_mission(mission_id, &config.resolver)
            .with_context(|| format!("checking mission {mission_id}"))?;

        if args.wants_images() {
            write_images(&args, &catalog, mission_id, &report.conflicts)?;
        }

        if args.geometric {
            let geometric = ConflictResolver::new(config.resolver.clone())
                .geometric_conflicts(catalog.mission(mission_id)?, &catalog.flights);
            print_json(
                &config.resolver,
                serde_json::json!({ "report": report, "geometric": geometric }),
            )?;
        } else {
            print_json(&config.resolver, &report)?;
        }
        return Ok(());
    }

    eprintln!("Run with:");
    eprintln!("  deconflict --scenario scenario_2 --plot scenario_2.svg");
    eprintln!("  deconflict --mission mission_4 --plot-3d mission_4.svg");
    eprintln!("  deconflict --mission mission_2 --animate frames/ --frame-view perspective");
    eprintln!("  deconflict --all-scenarios");
    Ok(())
}
