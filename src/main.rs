use safe_follow::math::Point2d;
use safe_follow::{
    Config, CycleInputs, LaneMap, LaneQuad, LaneRef, Navigator, ObstacleFootprint, PilotCommand, PolyId,
    VehicleEstimate,
};
use std::time::{Duration, Instant};

/// Simulation time step in s.
const DT: f64 = 0.1;

/// Length of each lane cell in m.
const CELL_LEN: f64 = 2.0;

/// Builds a straight lane along the x-axis.
fn straight_lane(cells: usize) -> Vec<LaneQuad> {
    let lane = LaneRef { seg: 1, lane: 1 };
    (0..cells)
        .map(|i| {
            let x0 = CELL_LEN * i as f64;
            let x1 = x0 + CELL_LEN;
            LaneQuad {
                poly_id: PolyId(i as i32),
                lane,
                corners: [
                    Point2d::new(x0, -2.0),
                    Point2d::new(x1, -2.0),
                    Point2d::new(x1, 2.0),
                    Point2d::new(x0, 2.0),
                ],
                length: CELL_LEN,
            }
        })
        .collect()
}

/// Drives a vehicle towards a stopped car and prints what the controller does each cycle.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => Config::load(&text),
            Err(err) => {
                log::warn!("cannot read {}: {}, using default configuration", path, err);
                Config::default()
            }
        },
        None => Config::default(),
    };

    let cells = straight_lane(100);
    let obstacles = ObstacleFootprint::new(vec![cells[60].clone()]);
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(config);

    let start = Instant::now();
    let mut pos = 1.0;
    let mut vel = 10.0;
    for frame in 0..300 {
        let inputs = CycleInputs {
            local_map: &map,
            obstacles: &obstacles,
            estimate: VehicleEstimate::new(Point2d::new(pos, 0.0), vel),
            car_approaching: false,
            pcmd: PilotCommand::new(12.0),
            now: start + Duration::from_secs_f64(frame as f64 * DT),
        };
        let command = match nav.cycle(&inputs) {
            Ok(cycle) => {
                println!(
                    "{:5.1}s pos {:6.2} m, vel {:5.2} m/s, obstacle {:7.2} m, cmd {:5.2} m/s, {:?}",
                    frame as f64 * DT,
                    pos,
                    vel,
                    cycle.observation.distance,
                    cycle.command.velocity,
                    cycle.result
                );
                cycle.command
            }
            Err(_) => nav.held_command().unwrap_or_default(),
        };

        // Track the command with limited acceleration
        let acc = ((command.velocity - vel) / DT).clamp(-6.0, 2.0);
        let next_vel = f64::max(vel + acc * DT, 0.0);
        pos += 0.5 * (vel + next_vel) * DT;
        vel = next_vel;

        if nav.lane_blocked() {
            println!("lane blocked after {:.1}s", frame as f64 * DT);
            break;
        }
    }
}
