//! Tests that drive the navigator through complete control cycles.

use assert_approx_eq::assert_approx_eq;
use safe_follow::config::{ObserverSection, VehicleSection};
use safe_follow::{
    math::Point2d, Config, ControllerResult, CycleInputs, LaneMap, LaneQuad, LaneRef, NavError, Navigator,
    ObstacleFootprint, PilotCommand, PolyId, VehicleEstimate,
};
use std::time::{Duration, Instant};

const CELL_LEN: f64 = 4.0;

fn lane_cells(count: usize) -> Vec<LaneQuad> {
    let lane = LaneRef { seg: 7, lane: 1 };
    (0..count)
        .map(|i| {
            let x0 = CELL_LEN * i as f64;
            let x1 = x0 + CELL_LEN;
            LaneQuad {
                poly_id: PolyId(100 + i as i32),
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

fn thresholds_config() -> Config {
    Config::from_json(
        r#"{ "follow": { "close_stopping_distance": 10.0, "min_following_time": 3.0,
             "desired_following_time": 5.0, "max_following_time": 7.0 } }"#,
    )
    .unwrap()
}

/// Runs a single cycle on a fresh navigator with the vehicle in the first cell.
fn single_cycle(obstacle_cell: Option<usize>, speed: f64, requested: f64) -> safe_follow::Cycle {
    let cells = lane_cells(50);
    let obstacles = ObstacleFootprint::new(obstacle_cell.map(|i| cells[i].clone()).into_iter().collect());
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(thresholds_config());
    nav.cycle(&CycleInputs {
        local_map: &map,
        obstacles: &obstacles,
        estimate: VehicleEstimate::new(Point2d::new(1.0, 0.0), speed),
        car_approaching: false,
        pcmd: PilotCommand::new(requested),
        now: Instant::now(),
    })
    .unwrap()
}

/// An obstacle 12 m ahead at 5 m/s is 2.4 s away, so the vehicle must stop.
#[test]
fn stops_when_following_time_too_short() {
    let cycle = single_cycle(Some(2), 5.0, 5.0);
    assert_approx_eq!(cycle.observation.distance, 12.0);
    assert_eq!(cycle.command.velocity, 0.0);
    assert!(!cycle.lane_blocked);
}

/// An obstacle 40 m ahead at 5 m/s is 8 s away, so the vehicle slows to 8 m/s.
#[test]
fn slows_when_following_time_too_long() {
    let cycle = single_cycle(Some(9), 5.0, 10.0);
    assert_approx_eq!(cycle.observation.distance, 40.0);
    assert_approx_eq!(cycle.command.velocity, 8.0);
    assert_eq!(cycle.result, ControllerResult::Normal);

    let cycle = single_cycle(Some(9), 5.0, 6.5);
    assert_approx_eq!(cycle.command.velocity, 6.5);
}

#[test]
fn empty_lane_leaves_command_untouched() {
    let cycle = single_cycle(None, 5.0, 11.0);
    assert_eq!(cycle.observation.distance, f64::INFINITY);
    assert!(cycle.observation.clear);
    assert_eq!(cycle.result, ControllerResult::Normal);
    assert_eq!(cycle.command, PilotCommand::new(11.0));
}

#[test]
fn obstacle_beyond_range_is_ignored() {
    // 25 cells of 4 m is 100 m, beyond the default 80 m range
    let cycle = single_cycle(Some(24), 5.0, 11.0);
    assert_approx_eq!(cycle.observation.distance, 100.0);
    assert_eq!(cycle.command.velocity, 11.0);
    assert_eq!(cycle.result, ControllerResult::Normal);
}

#[test]
fn approaching_car_is_a_collision_risk() {
    let cells = lane_cells(50);
    let obstacles = ObstacleFootprint::new(vec![cells[5].clone()]);
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(thresholds_config());
    let cycle = nav
        .cycle(&CycleInputs {
            local_map: &map,
            obstacles: &obstacles,
            estimate: VehicleEstimate::new(Point2d::new(1.0, 0.0), 0.0),
            car_approaching: true,
            pcmd: PilotCommand::new(3.0),
            now: Instant::now(),
        })
        .unwrap();
    assert_eq!(cycle.result, ControllerResult::CollisionRisk);
}

/// Drive towards a stopped car until the lane is reported blocked.
#[test]
fn approach_and_block() {
    let cells = lane_cells(50);
    let obstacles = ObstacleFootprint::new(vec![cells[30].clone()]);
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(thresholds_config());

    let start = Instant::now();
    let dt = 0.1;
    let mut pos = 1.0;
    let mut vel = 8.0;
    let mut new_obstacles = 0;
    let mut blocked_cycles = 0;

    for frame in 0..600 {
        let cycle = nav
            .cycle(&CycleInputs {
                local_map: &map,
                obstacles: &obstacles,
                estimate: VehicleEstimate::new(Point2d::new(pos, 0.0), vel),
                car_approaching: false,
                pcmd: PilotCommand::new(8.0),
                now: start + Duration::from_millis(100 * frame),
            })
            .unwrap();

        assert!(cycle.command.velocity <= 8.0);
        if cycle.observation.distance <= 10.0 {
            assert_eq!(cycle.command.velocity, 0.0);
        }
        new_obstacles += cycle.new_obstacle as usize;
        if cycle.lane_blocked {
            assert_eq!(cycle.result, ControllerResult::LaneBlocked);
            blocked_cycles += 1;
        }

        // Follow the command with limited deceleration
        let acc = ((cycle.command.velocity - vel) / dt).clamp(-6.0, 2.0);
        let next_vel = f64::max(vel + acc * dt, 0.0);
        pos += 0.5 * (vel + next_vel) * dt;
        vel = next_vel;
    }

    assert!(pos < 120.0, "drove into the obstacle at {}", pos);
    assert!(blocked_cycles > 10);
    assert_eq!(new_obstacles, 1);
    assert!(nav.lane_blocked());
}

#[test]
fn unresolvable_position_holds_command() {
    let cells = lane_cells(20);
    let obstacles = ObstacleFootprint::default();
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(Config::default());
    let now = Instant::now();

    let inputs = CycleInputs {
        local_map: &map,
        obstacles: &obstacles,
        estimate: VehicleEstimate::new(Point2d::new(2.0, 0.0), 4.0),
        car_approaching: false,
        pcmd: PilotCommand::new(4.0),
        now,
    };
    let good = nav.cycle(&inputs).unwrap();

    let err = nav
        .cycle(&CycleInputs {
            estimate: VehicleEstimate::new(Point2d::new(2.0, 500.0), 4.0),
            pcmd: PilotCommand::new(9.0),
            now: now + Duration::from_millis(100),
            ..inputs
        })
        .unwrap_err();
    assert_eq!(err, NavError::UnresolvablePosition { x: 2.0, y: 500.0 });
    assert_eq!(nav.held_command(), Some(good.command));
    assert_eq!(*nav.observation(), good.observation);
}

#[test]
fn malformed_config_uses_defaults() {
    let nav = Navigator::new(Config::load("[1, 2"));
    let t = nav.config().thresholds();
    assert_approx_eq!(t.min_following_time, 3.0);
    assert_approx_eq!(t.desired_following_time, 5.0);
    assert_approx_eq!(t.max_following_time, 7.0);
}

/// Settings built in code are validated just like those parsed from JSON.
#[test]
fn config_built_in_code_is_validated() {
    let config = Config {
        observer: ObserverSection {
            max_range: -1.0,
            ..Default::default()
        },
        vehicle: VehicleSection {
            max_speed: f64::NAN,
            ..Default::default()
        },
        ..Default::default()
    };
    let cells = lane_cells(20);
    let obstacles = ObstacleFootprint::new(vec![cells[1].clone()]);
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(config);
    assert_approx_eq!(nav.config().observer.max_range, 80.0);
    assert_approx_eq!(nav.config().vehicle.max_speed, 13.4);

    let cycle = nav
        .cycle(&CycleInputs {
            local_map: &map,
            obstacles: &obstacles,
            estimate: VehicleEstimate::new(Point2d::new(1.0, 0.0), 10.0),
            car_approaching: false,
            pcmd: PilotCommand::new(10.0),
            now: Instant::now(),
        })
        .unwrap();
    assert_approx_eq!(cycle.observation.distance, 8.0);
    assert_eq!(cycle.command.velocity, 0.0);
}

#[test]
fn reset_forgets_history() {
    let cells = lane_cells(50);
    let obstacles = ObstacleFootprint::new(vec![cells[10].clone()]);
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(thresholds_config());
    let start = Instant::now();

    for frame in 0..20 {
        nav.cycle(&CycleInputs {
            local_map: &map,
            obstacles: &obstacles,
            estimate: VehicleEstimate::new(Point2d::new(1.0, 0.0), 0.0),
            car_approaching: false,
            pcmd: PilotCommand::new(5.0),
            now: start + Duration::from_millis(100 * frame),
        })
        .unwrap();
    }
    assert!(nav.observation().applicable);
    assert!(nav.held_command().is_some());

    nav.reset();
    assert!(!nav.observation().applicable);
    assert_eq!(nav.observation().distance, f64::INFINITY);
    assert_eq!(nav.held_command(), None);
    assert!(!nav.lane_blocked());
}

#[cfg(feature = "debug")]
#[test]
fn debug_frame_records_one_cycle() {
    let cells = lane_cells(50);
    let obstacles = ObstacleFootprint::new(vec![cells[10].clone()]);
    let map = LaneMap::new(cells);
    let mut nav = Navigator::new(thresholds_config());
    let start = Instant::now();

    for frame in 0..3 {
        nav.cycle(&CycleInputs {
            local_map: &map,
            obstacles: &obstacles,
            estimate: VehicleEstimate::new(Point2d::new(1.0, 0.0), 5.0),
            car_approaching: false,
            pcmd: PilotCommand::new(5.0),
            now: start + Duration::from_millis(100 * frame),
        })
        .unwrap();
    }

    let frame = nav.debug();
    let records = frame.as_array().unwrap();
    let count = |kind: &str| records.iter().filter(|r| r["type"] == kind).count();
    assert_eq!(records.len(), 2);
    assert_eq!(count("observation"), 1);
    assert_eq!(count("command"), 1);
}
