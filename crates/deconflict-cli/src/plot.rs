//! SVG rendering of a mission, surrounding traffic and conflicts.
//!
//! Two views are available: top-down (x/y) and a perspective 3D view that
//! shows altitude. Either view can be rendered once for the whole flight or
//! as a sequence of time-stepped frames.

use std::path::{Path, PathBuf};

use deconflict_core::{ConflictEvent, Drone, FlightSchedule, Mission, Position};
use plotters::prelude::*;
use thiserror::Error;

const PLOT_SIZE: (u32, u32) = (900, 900);

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to render plot: {0}")]
    Draw(String),
    #[error("failed to create frame directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("animation needs at least one frame")]
    NoFrames,
}

fn draw_err<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Draw(err.to_string())
}

/// Projection used for a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    TopDown,
    Perspective,
}

/// Everything a single image shows.
struct Scene<'a> {
    mission: &'a Mission,
    schedule: &'a FlightSchedule,
    conflicts: &'a [ConflictEvent],
    /// `Some(t)` draws a snapshot: paths faded, drones at their positions,
    /// and only conflicts that have happened by `t`.
    at: Option<f64>,
}

impl Scene<'_> {
    fn drones(&self) -> impl Iterator<Item = &Drone> {
        std::iter::once(&self.mission.drone).chain(self.schedule.drones.iter())
    }

    fn visible_conflicts(&self) -> impl Iterator<Item = &ConflictEvent> {
        let at = self.at;
        self.conflicts
            .iter()
            .filter(move |c| at.map_or(true, |t| c.conflict_time <= t))
    }

    fn path_alpha(&self) -> f64 {
        if self.at.is_some() {
            0.25
        } else {
            0.7
        }
    }
}

type Extents = ((f64, f64), (f64, f64), (f64, f64));

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let margin = ((hi - lo) * 0.05).max(1.0);
    (lo - margin, hi + margin)
}

/// Padded x/y/z extents covering every waypoint and conflict marker.
fn extents(mission: &Mission, schedule: &FlightSchedule, conflicts: &[ConflictEvent]) -> Extents {
    let points = std::iter::once(&mission.drone)
        .chain(schedule.drones.iter())
        .flat_map(|d| d.waypoints.iter().map(|wp| wp.position))
        .chain(conflicts.iter().map(|c| c.location));

    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    let mut z = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        x = (x.0.min(p.x), x.1.max(p.x));
        y = (y.0.min(p.y), y.1.max(p.y));
        z = (z.0.min(p.z), z.1.max(p.z));
    }
    (pad(x), pad(y), pad(z))
}

fn xy(p: &Position) -> (f64, f64) {
    (p.x, p.y)
}

/// Plotters' 3D frame is y-up, so altitude goes on its second axis.
fn xzy(p: &Position) -> (f64, f64, f64) {
    (p.x, p.z, p.y)
}

fn draw_top_down(path: &Path, scene: &Scene<'_>, bounds: Extents) -> Result<(), PlotError> {
    let ((x_lo, x_hi), (y_lo, y_hi), _) = bounds;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(draw_err)?;

    for (idx, drone) in scene.schedule.drones.iter().enumerate() {
        let color = Palette99::pick(idx).mix(scene.path_alpha());
        let points = drone.waypoints.iter().map(|wp| xy(&wp.position));
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(draw_err)?;
    }

    let mission_points = scene.mission.drone.waypoints.iter().map(|wp| xy(&wp.position));
    chart
        .draw_series(LineSeries::new(
            mission_points,
            BLUE.mix(scene.path_alpha().max(0.4)).stroke_width(4),
        ))
        .map_err(draw_err)?;

    if let Some(t) = scene.at {
        let positions: Vec<(f64, f64)> = scene
            .drones()
            .filter_map(|d| d.position_at(t))
            .map(|p| xy(&p))
            .collect();
        chart
            .draw_series(positions.into_iter().map(|p| Circle::new(p, 5, BLACK.filled())))
            .map_err(draw_err)?;
    }

    chart
        .draw_series(
            scene
                .visible_conflicts()
                .map(|c| Circle::new(xy(&c.location), 6, RED.filled())),
        )
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_perspective(path: &Path, scene: &Scene<'_>, bounds: Extents) -> Result<(), PlotError> {
    let ((x_lo, x_hi), (y_lo, y_hi), (z_lo, z_hi)) = bounds;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_3d(x_lo..x_hi, z_lo..z_hi, y_lo..y_hi)
        .map_err(draw_err)?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.4;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    // Ground outline and corner posts give the altitude a reference.
    let ground = [
        (x_lo, z_lo, y_lo),
        (x_hi, z_lo, y_lo),
        (x_hi, z_lo, y_hi),
        (x_lo, z_lo, y_hi),
        (x_lo, z_lo, y_lo),
    ];
    chart
        .draw_series(LineSeries::new(ground, BLACK.mix(0.3)))
        .map_err(draw_err)?;
    for &(x, _, y) in &ground[..4] {
        chart
            .draw_series(LineSeries::new(
                [(x, z_lo, y), (x, z_hi, y)],
                BLACK.mix(0.15),
            ))
            .map_err(draw_err)?;
    }

    for (idx, drone) in scene.schedule.drones.iter().enumerate() {
        let color = Palette99::pick(idx).mix(scene.path_alpha());
        let points = drone.waypoints.iter().map(|wp| xzy(&wp.position));
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(draw_err)?;
    }

    let mission_points = scene.mission.drone.waypoints.iter().map(|wp| xzy(&wp.position));
    chart
        .draw_series(LineSeries::new(
            mission_points,
            BLUE.mix(scene.path_alpha().max(0.4)).stroke_width(4),
        ))
        .map_err(draw_err)?;

    if let Some(t) = scene.at {
        let positions: Vec<(f64, f64, f64)> = scene
            .drones()
            .filter_map(|d| d.position_at(t))
            .map(|p| xzy(&p))
            .collect();
        chart
            .draw_series(positions.into_iter().map(|p| Circle::new(p, 5, BLACK.filled())))
            .map_err(draw_err)?;
    }

    chart
        .draw_series(
            scene
                .visible_conflicts()
                .map(|c| Circle::new(xzy(&c.location), 6, RED.filled())),
        )
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

fn render(path: &Path, view: View, scene: &Scene<'_>, bounds: Extents) -> Result<(), PlotError> {
    match view {
        View::TopDown => draw_top_down(path, scene, bounds),
        View::Perspective => draw_perspective(path, scene, bounds),
    }
}

/// Render the mission (thick blue), other flights (palette colors) and
/// conflict locations (red dots) to a top-down SVG file.
pub fn plot_mission_svg(
    path: &Path,
    mission: &Mission,
    schedule: &FlightSchedule,
    conflicts: &[ConflictEvent],
) -> Result<(), PlotError> {
    let scene = Scene {
        mission,
        schedule,
        conflicts,
        at: None,
    };
    render(path, View::TopDown, &scene, extents(mission, schedule, conflicts))?;
    tracing::info!(path = %path.display(), conflicts = conflicts.len(), "Plot written");
    Ok(())
}

/// Same content as [`plot_mission_svg`] in a perspective view with altitude.
pub fn plot_mission_3d_svg(
    path: &Path,
    mission: &Mission,
    schedule: &FlightSchedule,
    conflicts: &[ConflictEvent],
) -> Result<(), PlotError> {
    let scene = Scene {
        mission,
        schedule,
        conflicts,
        at: None,
    };
    render(path, View::Perspective, &scene, extents(mission, schedule, conflicts))?;
    tracing::info!(path = %path.display(), conflicts = conflicts.len(), "3D plot written");
    Ok(())
}

/// Earliest and latest waypoint time over all flights.
fn time_range(mission: &Mission, schedule: &FlightSchedule) -> Option<(f64, f64)> {
    std::iter::once(&mission.drone)
        .chain(schedule.drones.iter())
        .filter_map(Drone::time_span)
        .fold(None, |acc, (lo, hi)| match acc {
            None => Some((lo.min(hi), lo.max(hi))),
            Some((a, b)) => Some((a.min(lo).min(hi), b.max(lo).max(hi))),
        })
}

/// Evenly spaced frame times over `[start, end]`, both ends included.
fn frame_times(start: f64, end: f64, frames: usize) -> Vec<f64> {
    match frames {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Write `frames` time-stepped snapshots as `frame_0000.svg`, ... into `dir`.
///
/// Frames span the earliest to latest waypoint time. Each one shows every
/// drone at its interpolated position and the conflicts reached so far, in
/// a fixed frame so the images can be stitched into an animation.
pub fn animate_mission_svg(
    dir: &Path,
    view: View,
    frames: usize,
    mission: &Mission,
    schedule: &FlightSchedule,
    conflicts: &[ConflictEvent],
) -> Result<Vec<PathBuf>, PlotError> {
    if frames == 0 {
        return Err(PlotError::NoFrames);
    }
    std::fs::create_dir_all(dir).map_err(|source| PlotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let bounds = extents(mission, schedule, conflicts);
    let (start, end) = time_range(mission, schedule).unwrap_or((0.0, 0.0));

    let mut written = Vec::with_capacity(frames);
    for (idx, t) in frame_times(start, end, frames).into_iter().enumerate() {
        let path = dir.join(format!("frame_{idx:04}.svg"));
        let scene = Scene {
            mission,
            schedule,
            conflicts,
            at: Some(t),
        };
        render(&path, view, &scene, bounds)?;
        written.push(path);
    }

    tracing::info!(
        dir = %dir.display(),
        frames = written.len(),
        ?view,
        "Animation frames written"
    );
    Ok(written)
}
