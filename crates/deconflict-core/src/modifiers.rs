//! Altitude profile transformations.
//!
//! Each function returns a new mission; x/y and timing are left unchanged.

use std::f64::consts::PI;

use rand::Rng;

use crate::models::Mission;

fn progress(idx: usize, count: usize) -> f64 {
    idx as f64 / count.saturating_sub(1).max(1) as f64
}

/// Altitude rising linearly from `start_z` at the first waypoint to `end_z` at the last.
pub fn slope_altitude(mission: &Mission, start_z: f64, end_z: f64) -> Mission {
    let count = mission.drone.waypoints.len();
    let drone = mission.drone.map_waypoints(|idx, wp| {
        let alpha = progress(idx, count);
        wp.with_altitude(start_z + alpha * (end_z - start_z))
    });
    mission.with_drone(drone)
}

/// Half-sine altitude hump: `base` at both ends, `base + amplitude` mid-path.
pub fn wave_altitude(mission: &Mission, amplitude: f64, base: f64) -> Mission {
    let count = mission.drone.waypoints.len();
    let drone = mission.drone.map_waypoints(|idx, wp| {
        wp.with_altitude(base + amplitude * (progress(idx, count) * PI).sin())
    });
    mission.with_drone(drone)
}

/// Uniformly random altitude in `[min_z, max_z]` at each waypoint.
pub fn randomize_altitude<R: Rng + ?Sized>(
    mission: &Mission,
    rng: &mut R,
    min_z: f64,
    max_z: f64,
) -> Mission {
    let (lo, hi) = if min_z <= max_z {
        (min_z, max_z)
    } else {
        (max_z, min_z)
    };
    let drone = mission
        .drone
        .map_waypoints(|_, wp| wp.with_altitude(rng.random_range(lo..=hi)));
    mission.with_drone(drone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Drone, TimeWindow, Waypoint};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_mission() -> Mission {
        Mission::new(
            "m1",
            TimeWindow::new(0.0, 30.0),
            Drone::new(
                "m1",
                vec![
                    Waypoint::new(0, 0.0, 0.0, 0.0, 0.0),
                    Waypoint::new(1, 10.0, 0.0, 0.0, 10.0),
                    Waypoint::new(2, 20.0, 0.0, 0.0, 20.0),
                ],
            ),
        )
    }

    fn altitudes(mission: &Mission) -> Vec<f64> {
        mission.drone.waypoints.iter().map(|wp| wp.position.z).collect()
    }

    #[test]
    fn slope_interpolates_by_index() {
        let original = sample_mission();
        let sloped = slope_altitude(&original, 10.0, 40.0);
        assert_eq!(altitudes(&sloped), vec![10.0, 25.0, 40.0]);
        assert_eq!(altitudes(&original), vec![0.0, 0.0, 0.0]);
        assert_eq!(sloped.drone.waypoints[1].position.x, 10.0);
    }

    #[test]
    fn wave_peaks_mid_path() {
        let waved = wave_altitude(&sample_mission(), 10.0, 20.0);
        let z = altitudes(&waved);
        assert!((z[0] - 20.0).abs() < 1e-9);
        assert!((z[1] - 30.0).abs() < 1e-9);
        assert!((z[2] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn single_waypoint_mission_is_handled() {
        let mut mission = sample_mission();
        mission.drone.waypoints.truncate(1);
        assert_eq!(altitudes(&slope_altitude(&mission, 5.0, 9.0)), vec![5.0]);
    }

    #[test]
    fn random_altitudes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let randomized = randomize_altitude(&sample_mission(), &mut rng, 40.0, 10.0);
        assert!(altitudes(&randomized)
            .iter()
            .all(|z| (10.0..=40.0).contains(z)));
    }
}
