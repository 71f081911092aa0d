//! Orbit Pool demo host
//!
//! Runs a fixed-timestep loop: a launcher fires pooled shots at a target
//! circling the arena, each shot flying one of the configured orbits. Shots
//! are recalled to the spawner when they arrive.
//!
//! Usage: `orbit-pool [config.json]`

use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use orbit_pool::consts::{FRAME_DT, MAX_FRAMES};
use orbit_pool::orbit::{OrbitEdge, OrbitRun, PositionSource};
use orbit_pool::pool::Spawner;
use orbit_pool::scene::{NodeHandle, NodeTemplate, Scene};
use orbit_pool::{Clock, Config, ManualClock};

/// Frames between shots
const FIRE_INTERVAL: u32 = 9;
/// Frames during which the launcher keeps firing
const FIRE_WINDOW: u32 = 60 * 8;
/// Radius of the target's circuit
const TARGET_ORBIT_RADIUS: f32 = 300.0;
/// Target angular speed (radians/s)
const TARGET_ANGULAR_SPEED: f32 = 0.8;

/// A shot in flight
struct Flight {
    shot: NodeHandle,
    run: OrbitRun<ManualClock>,
}

fn load_config() -> Config {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("No config given, using presets");
        return Config::with_presets();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| Config::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(config) if !config.orbits.is_empty() => config,
        Ok(_) => {
            log::warn!("{} defines no orbits, using presets", path);
            Config::with_presets()
        }
        Err(e) => {
            log::error!("Failed to load {}: {}", path, e);
            Config::with_presets()
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let config = load_config();
    let orbits = config.orbits.clone();

    let scene = Scene::new();
    let clock = ManualClock::new();
    let mut rng = Pcg32::seed_from_u64(0x0b17);

    let launcher = config.spawner.origin;
    let target = scene.spawn("target", Vec2::new(TARGET_ORBIT_RADIUS, 0.0));
    let target_source: Rc<dyn PositionSource> = Rc::new(target.clone());

    let template = NodeTemplate::new(&scene, "shot", launcher);
    let mut spawner = Spawner::from_config(template, &config.spawner);
    let mut flights: Vec<Flight> = Vec::new();

    let mut fired = 0u32;
    let mut arrived = 0u32;
    let mut destroyed = 0u32;
    let mut peak_live = 0usize;

    for frame in 0..MAX_FRAMES {
        clock.advance(FRAME_DT);

        let theta = clock.now() * TARGET_ANGULAR_SPEED;
        target.set_position(Vec2::from_angle(theta) * TARGET_ORBIT_RADIUS);

        if frame < FIRE_WINDOW && frame % FIRE_INTERVAL == 0 {
            let orbit_config = &orbits[fired as usize % orbits.len()];
            let shot = spawner.spawn();
            let edge = OrbitEdge::tracking(launcher, target_source.clone(), Vec2::ZERO);
            let run = orbit_config.build().calc_with_rng(
                edge,
                orbit_config.time_func.clone(),
                orbit_config.duration,
                clock.clone(),
                &mut rng,
            );
            flights.push(Flight { shot, run });
            fired += 1;
        }

        flights.retain_mut(|flight| match flight.run.next() {
            Some(pos) => {
                flight.shot.set_position(pos);
                true
            }
            None => {
                arrived += 1;
                if !spawner.recall(&flight.shot) {
                    destroyed += 1;
                }
                false
            }
        });

        peak_live = peak_live.max(scene.live_count());

        if frame >= FIRE_WINDOW && flights.is_empty() {
            log::info!("All shots landed after {} frames", frame + 1);
            break;
        }
    }

    log::info!(
        "Fired {}, arrived {}, destroyed over capacity {}, peak live nodes {}",
        fired,
        arrived,
        destroyed,
        peak_live
    );

    spawner.recall_all();
    log::info!(
        "After recall: {} live nodes, {} active",
        scene.live_count(),
        scene.active_count()
    );

    spawner.clear();
    log::info!("After clear: {} live nodes", scene.live_count());
}
