//! Randomized flight generation for stress-testing the resolver.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Drone, FlightSchedule, Waypoint};

/// Bounds for randomly generated flights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomFlightParams {
    /// Waypoints fall inside the square `[0, area_size]`
    pub area_size: f64,
    pub t_min: f64,
    pub t_max: f64,
    pub min_waypoints: usize,
    pub max_waypoints: usize,
    pub min_altitude: f64,
    pub max_altitude: f64,
}

impl Default for RandomFlightParams {
    fn default() -> Self {
        Self {
            area_size: 150.0,
            t_min: 0.0,
            t_max: 100.0,
            min_waypoints: 2,
            max_waypoints: 5,
            min_altitude: 10.0,
            max_altitude: 40.0,
        }
    }
}

/// Generate one random flight with timestamps sorted ascending.
pub fn generate_random_drone<R: Rng + ?Sized>(
    rng: &mut R,
    drone_id: &str,
    params: &RandomFlightParams,
) -> Drone {
    let min_wps = params.min_waypoints.min(params.max_waypoints);
    let num_wps = rng.random_range(min_wps..=params.max_waypoints.max(min_wps));

    let (t_lo, t_hi) = (params.t_min.min(params.t_max), params.t_min.max(params.t_max));
    let mut times: Vec<f64> = (0..num_wps).map(|_| rng.random_range(t_lo..=t_hi)).collect();
    times.sort_by(f64::total_cmp);

    let area = params.area_size.abs();
    let (z_lo, z_hi) = (
        params.min_altitude.min(params.max_altitude),
        params.min_altitude.max(params.max_altitude),
    );

    let waypoints = times
        .into_iter()
        .enumerate()
        .map(|(idx, t)| {
            Waypoint::new(
                idx as i64,
                rng.random_range(0.0..=area),
                rng.random_range(0.0..=area),
                rng.random_range(z_lo..=z_hi),
                t,
            )
        })
        .collect();

    Drone::new(drone_id, waypoints).with_metadata(
        format!("Random {drone_id}"),
        "Randomly generated flight path in dynamic airspace",
    )
}

/// Generate a schedule of `num_drones` random flights named `random_drone_N`.
pub fn generate_random_flight_schedule<R: Rng + ?Sized>(
    rng: &mut R,
    num_drones: usize,
    params: &RandomFlightParams,
) -> FlightSchedule {
    let drones = (1..=num_drones)
        .map(|i| generate_random_drone(rng, &format!("random_drone_{i}"), params))
        .collect();
    FlightSchedule::new(drones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_drones_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = RandomFlightParams::default();
        let schedule = generate_random_flight_schedule(&mut rng, 20, &params);

        assert_eq!(schedule.len(), 20);
        assert_eq!(schedule.drones[0].drone_id, "random_drone_1");
        assert_eq!(schedule.drones[19].drone_id, "random_drone_20");

        for drone in &schedule.drones {
            assert!((2..=5).contains(&drone.waypoints.len()));
            for pair in drone.waypoints.windows(2) {
                assert!(pair[0].timestamp <= pair[1].timestamp);
            }
            for wp in &drone.waypoints {
                assert!((0.0..=150.0).contains(&wp.position.x));
                assert!((0.0..=150.0).contains(&wp.position.y));
                assert!((10.0..=40.0).contains(&wp.position.z));
                assert!((0.0..=100.0).contains(&wp.timestamp));
            }
        }
    }

    #[test]
    fn same_seed_same_schedule() {
        let params = RandomFlightParams::default();
        let a = generate_random_flight_schedule(&mut StdRng::seed_from_u64(9), 3, &params);
        let b = generate_random_flight_schedule(&mut StdRng::seed_from_u64(9), 3, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_waypoint_count() {
        let params = RandomFlightParams {
            min_waypoints: 3,
            max_waypoints: 3,
            ..RandomFlightParams::default()
        };
        let drone = generate_random_drone(&mut StdRng::seed_from_u64(1), "d", &params);
        assert_eq!(drone.waypoints.len(), 3);
        assert_eq!(drone.name, "Random d");
    }
}
