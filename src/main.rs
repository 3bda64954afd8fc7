//! Cue Sim entry point
//!
//! Headless break-shot runner: racks fifteen balls, breaks, and steps the
//! world at the fixed host rate until everything is at rest.
//!
//! Usage: `cue-sim [settings.json] [seed]`

use anyhow::{Context, Result};
use serde::Serialize;

use cue_sim::consts::{BALL_RADIUS, SIM_DT};
use cue_sim::rack::RackLayout;
use cue_sim::sim::{Body, BodyId, SimEvent, SimulationWorld, TableLayout};
use cue_sim::{PhysicsSettings, SimError, TimeScale};

/// Longest shot we are willing to simulate (seconds of simulated time)
const MAX_SHOT_SECONDS: f64 = 30.0;
/// Break speed (m/s)
const BREAK_SPEED: f64 = 9.0;

#[derive(Debug, Default, Serialize)]
struct ShotSummary {
    seed: u64,
    frames: u64,
    simulated_seconds: f64,
    boundary_hits: u32,
    pair_collisions: u32,
    budget_exhausted_ticks: u32,
    pocketed: Vec<BodyId>,
    scratched: bool,
    remaining: Vec<Body>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) if path != "-" => PhysicsSettings::load(&path)
            .with_context(|| format!("loading settings from {path}"))?,
        _ => PhysicsSettings::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed {raw:?}"))?,
        None => 0x5eed,
    };
    settings.validate()?;

    let layout = TableLayout::default();
    let mut world = SimulationWorld::new(settings, layout.build());

    for pos in RackLayout::default().positions(layout.foot_spot(), BALL_RADIUS, seed) {
        let id = world.allocate_body_id()?;
        world.register_body(Body::new(id, pos, BALL_RADIUS))?;
    }
    let cue_id = world.allocate_body_id()?;
    world.register_body(Body::cue(cue_id, layout.head_spot()))?;

    let cue = world.next_shootable_body()?.id;
    let aim = (layout.foot_spot() - layout.head_spot()).normalize();
    world
        .body_mut(cue)
        .context("cue ball vanished before the break")?
        .strike(aim * BREAK_SPEED);
    log::info!("Break: seed {seed}, cue {cue} at {BREAK_SPEED} m/s");

    let mut summary = ShotSummary {
        seed,
        ..ShotSummary::default()
    };
    let mut time_scale = TimeScale::default();
    let mut slowed = false;
    let mut events = Vec::new();

    while world.any_moving() && summary.simulated_seconds < MAX_SHOT_SECONDS {
        let dt = time_scale.update(SIM_DT);
        let report = world.advance(dt, &mut events);
        summary.frames += 1;
        summary.simulated_seconds += dt;
        if report.budget_exhausted {
            summary.budget_exhausted_ticks += 1;
        }

        for event in events.drain(..) {
            match event {
                SimEvent::BoundaryHit { .. } => summary.boundary_hits += 1,
                SimEvent::PairCollision { impact_speed, .. } => {
                    summary.pair_collisions += 1;
                    // Dramatic slow motion on the first contact with the rack
                    if !slowed {
                        slowed = true;
                        log::info!("First contact at {impact_speed:.2} m/s");
                        time_scale.ease_to(0.2, 0.05, 2.0);
                    }
                }
                SimEvent::PocketAbsorbed { body, pocket } => {
                    log::info!("Ball {body} pocketed in {pocket:?}");
                    if body == cue {
                        summary.scratched = true;
                    }
                    summary.pocketed.push(body);
                    world.deregister_body(body);
                }
            }
        }

        if slowed && !time_scale.is_easing() && time_scale.target() < 1.0 {
            time_scale.resume(0.5);
        }
    }

    // A scratched cue ball has to be replaced before the next shot
    match world.next_shootable_body() {
        Ok(body) => log::info!("Cue ball {} at rest at {}", body.id, body.pos),
        Err(SimError::NoShootableBody) => {
            let id = world.allocate_body_id()?;
            world.register_body(Body::cue(id, layout.head_spot()))?;
            log::warn!("Scratch: spawned replacement cue ball {id}");
        }
        Err(err) => return Err(err.into()),
    }

    summary.remaining = world.bodies().to_vec();
    log::info!(
        "Shot finished after {:.2}s simulated ({} frames): {} pocketed",
        summary.simulated_seconds,
        summary.frames,
        summary.pocketed.len()
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
