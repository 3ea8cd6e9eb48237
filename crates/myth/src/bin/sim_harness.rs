//! # Simulation Harness
//!
//! Headless scripted session: walk, idle, sprint with mouse look, quick-save,
//! wander off, quick-load, then re-generate every loaded chunk on the worker
//! pool and compare against the streamer's copies.
//!
//! ```text
//! sim_harness [config.toml]
//! LOG_LEVEL=debug sim_harness
//! ```

use std::process::ExitCode;

use crossbeam_channel::unbounded;
use myth::core::{InputState, JobSystem, Key};
use myth::procedural::generate_chunk;
use myth::telemetry::init_tracing;
use myth::{SimConfig, Simulation};
use tracing::{error, info, warn};

/// Fixed simulation step.
const STEP: f32 = 1.0 / 60.0;

/// One scripted stretch of input.
struct Phase {
    name: &'static str,
    keys: &'static [Key],
    seconds: f32,
    /// Mouse motion per tick while captured.
    look: (f32, f32),
}

const WANDER: &[Phase] = &[
    Phase { name: "walk north", keys: &[Key::Forward], seconds: 6.0, look: (0.0, 0.0) },
    Phase { name: "linger", keys: &[], seconds: 8.0, look: (0.0, 0.0) },
    Phase { name: "sprint and turn", keys: &[Key::Forward, Key::Sprint], seconds: 4.0, look: (2.0, 0.5) },
    Phase { name: "hop", keys: &[Key::Jump], seconds: 1.0, look: (0.0, 0.0) },
];

const DETOUR: &[Phase] = &[
    Phase { name: "strafe away", keys: &[Key::Left, Key::Sprint], seconds: 5.0, look: (0.0, 0.0) },
];

fn main() -> ExitCode {
    init_tracing("info");

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(error = %err, "Cannot start harness");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    let mut sim = Simulation::new(config);
    let mut input = InputState::new();
    input.set_mouse_captured(true);

    run(&mut sim, &mut input, WANDER);

    if !sim.quick_save() {
        return ExitCode::FAILURE;
    }
    let saved_at = sim.player_position();

    run(&mut sim, &mut input, DETOUR);
    info!(distance = sim.player_position().distance(saved_at), "Wandered from save point");

    if !sim.quick_load() {
        return ExitCode::FAILURE;
    }
    if sim.player_position().distance(saved_at) > 1e-4 {
        error!(?saved_at, now = ?sim.player_position(), "Load did not restore the player");
        return ExitCode::FAILURE;
    }

    match verify_terrain(&sim) {
        Ok(checked) => info!(checked, "Terrain regenerates identically"),
        Err(mismatches) => {
            error!(mismatches, "Terrain regeneration diverged");
            return ExitCode::FAILURE;
        }
    }

    let stats = sim.chunks().stats();
    info!(
        play_time = sim.play_time(),
        regions = sim.regions().tracked_region_count(),
        chunks_loaded = stats.loaded,
        chunks_generated = stats.generated_total,
        chunks_evicted = stats.evicted_total,
        "Session complete"
    );
    ExitCode::SUCCESS
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run(sim: &mut Simulation, input: &mut InputState, phases: &[Phase]) {
    for phase in phases {
        info!(phase = phase.name, seconds = phase.seconds, "Phase start");
        for &key in phase.keys {
            input.key_down(key);
        }

        let ticks = (phase.seconds / STEP).round() as u32;
        for _ in 0..ticks {
            input.mouse_motion(phase.look.0, phase.look.1);
            let report = sim.tick(input, STEP);
            input.begin_frame();

            if let Some(change) = report.region_change {
                info!(region = %change.coord, from = %change.from, to = %change.to, "Region shifted");
            }
        }

        for &key in phase.keys {
            input.key_up(key);
        }
    }
}

/// Regenerates every loaded chunk on the worker pool. Returns the number
/// checked, or the number that differed.
fn verify_terrain(sim: &Simulation) -> Result<usize, usize> {
    let jobs = match JobSystem::new(0) {
        Ok(jobs) => jobs,
        Err(err) => {
            warn!(error = %err, "Worker pool unavailable, skipping terrain check");
            return Ok(0);
        }
    };

    let config = *sim.chunks().config();
    let (tx, rx) = unbounded();
    let coords = sim.chunks().loaded_coords();
    for &coord in &coords {
        let tx = tx.clone();
        jobs.schedule(move || {
            let _ = tx.send(generate_chunk(coord, config.chunk_size, config.salt));
        });
    }
    drop(tx);
    jobs.wait();

    let mismatches = rx
        .iter()
        .filter(|chunk| sim.chunks().chunk(chunk.coord) != Some(chunk))
        .count();
    if mismatches == 0 {
        Ok(coords.len())
    } else {
        Err(mismatches)
    }
}
