//! Skystrike entry point
//!
//! Headless demo loop: runs the simulation with a scripted autopilot at a
//! fixed timestep until game over, then prints a session summary. Useful
//! for smoke-testing balance changes and as a reference host loop; a real
//! frontend drives `tick` the same way and renders `&SessionState`.

use std::time::Instant;

use glam::Vec2;

use skystrike::audio::{self, AudioPlayer, SoundKind};
use skystrike::consts::*;
use skystrike::sim::{GamePhase, SessionState, TickInput, tick};

/// Audio backend that just logs what it would play
#[derive(Default)]
struct LogAudio;

impl AudioPlayer for LogAudio {
    fn play(&mut self, kind: SoundKind, pitch: f32) {
        log::debug!("audio: {:?} (pitch {:.2})", kind, pitch);
    }
}

/// Scripted input: sweep across the field, lean on the beam when energy
/// allows, and burn banked charges as they come in
fn autopilot(state: &SessionState) -> TickInput {
    let t = state.time_ticks as f32 * SIM_DT;
    let target_x = FIELD_WIDTH / 2.0 + (FIELD_WIDTH / 2.0 - 60.0) * (t * 0.8).sin();
    let mut input = TickInput {
        target_pos: Some(Vec2::new(target_x, state.player.pos.y)),
        beam_held: state.player.energy > 40.0,
        ..Default::default()
    };
    // Fire whichever slot has charges banked, one per second
    if state.time_ticks % 60 == 0 {
        for slot in 0..4 {
            use skystrike::sim::AbilityKind;
            let kind = AbilityKind::from_slot(slot).unwrap();
            if state.player.inventory.count(kind) > 0 {
                input.use_slot[slot] = true;
                break;
            }
        }
    }
    input
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Skystrike (headless) starting with seed {}", seed);

    let mut state = SessionState::new(seed);
    let mut audio = LogAudio;
    let start = Instant::now();

    // Fixed-step accumulator loop, uncapped wall clock (headless runs are
    // flat-out; a rendering host would pace this against vsync)
    let mut ticks: u64 = 0;
    const MAX_TICKS: u64 = 60 * 60 * 10; // ten simulated minutes

    while state.phase == GamePhase::Playing && ticks < MAX_TICKS {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);
        audio::play_events(&mut audio, &state.take_events());
        ticks += 1;

        if ticks % (60 * 30) == 0 {
            log::info!(
                "t={}s score={} hp={:.0} energy={:.0} enemies={}",
                ticks / 60,
                state.score,
                state.player.hp,
                state.player.energy,
                state.enemies.len()
            );
        }
    }

    let summary = serde_json::json!({
        "seed": state.seed,
        "score": state.score,
        "survived_secs": state.time_ticks / 60,
        "weapon_level": state.player.weapon_level,
        "outcome": if state.phase == GamePhase::GameOver { "game over" } else { "timeout" },
    });
    println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
    log::info!("Simulated {} ticks in {:.2?}", ticks, start.elapsed());
}
