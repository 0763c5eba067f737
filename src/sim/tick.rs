//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one step. Phase order within a
//! tick is fixed: restart / terminal gate, buff timers and beam, deferred
//! tasks, ability activation, spawning, movement and culling, collision
//! resolution, terminal check. Determinism depends on this order and on
//! every random draw going through the session rng.

use glam::Vec2;
use rand::Rng;

use super::collision::{beam_intersects, hitboxes_overlap, squares_overlap};
use super::spawn;
use super::state::{
    AbilityKind, Enemy, GameEvent, GamePhase, PowerupKind, SessionState,
};
use super::tasks::Task;
use crate::consts::*;

/// Buff durations and sequencing, in ticks
pub const RAPID_FIRE_DURATION_TICKS: u32 = 300;
pub const WAVE_FIRE_DURATION_TICKS: u32 = 600;
pub const LIGHTNING_DURATION_TICKS: u32 = 180;
pub const LIGHTNING_PULSE_SPACING_TICKS: u64 = 60;
pub const LIGHTNING_PULSE_DAMAGE: f32 = 1.0;
pub const PLAYER_BULLET_DAMAGE: f32 = 1.0;
pub const HEAL_AMOUNT: f32 = 30.0;
pub const WAVE_FIRE_SCORE_BONUS: u64 = 50;
/// Hit flash lasts 0.1 s before a deferred task clears it
pub const HIT_FLASH_TICKS: u64 = 6;

/// Sine-pattern tuning: phase speed in rad/s, lateral amplitude in px/s
const SINE_PHASE_SPEED: f32 = 3.0;
const SINE_AMPLITUDE: f32 = 180.0;
/// Elite sway: lateral px around center, seconds divisor on the global clock
const ELITE_SWAY_AMPLITUDE: f32 = 120.0;
const ELITE_SWAY_PERIOD: f32 = 1.2;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer-follow position (mouse/touch); overrides `move_dir`
    pub target_pos: Option<Vec2>,
    /// Keyboard movement vector, unnormalized
    pub move_dir: Vec2,
    /// Edge-detected ability triggers, one per inventory slot
    pub use_slot: [bool; 4],
    /// Beam is level-triggered: active exactly while held with energy left
    pub beam_held: bool,
    /// Start a fresh session (only honored at game over)
    pub restart: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        if input.restart {
            // Reseed from the old rng so successive runs differ
            let seed = state.rng.random();
            *state = SessionState::new(seed);
        }
        return;
    }

    state.time_ticks += 1;

    update_buffs(state, input, dt);
    run_due_tasks(state);
    handle_abilities(state, input);
    run_spawners(state, dt);
    update_movement(state, input, dt);
    resolve_collisions(state);

    if state.player.hp <= 0.0 {
        state.end_session();
    }
}

/// Count down timed buffs and drive the level-triggered beam
fn update_buffs(state: &mut SessionState, input: &TickInput, dt: f32) {
    let buffs = &mut state.player.buffs;
    buffs.rapid_ticks = buffs.rapid_ticks.saturating_sub(1);
    buffs.wave_ticks = buffs.wave_ticks.saturating_sub(1);
    buffs.lightning_ticks = buffs.lightning_ticks.saturating_sub(1);

    let want_beam = input.beam_held && state.player.energy > 0.0;
    if want_beam && !state.player.buffs.beam_active {
        state.player.buffs.beam_active = true;
        state.push_event(GameEvent::BeamStarted);
    } else if !want_beam && state.player.buffs.beam_active {
        state.player.buffs.beam_active = false;
        state.push_event(GameEvent::BeamStopped);
    }

    if state.player.buffs.beam_active {
        state.player.energy -= BEAM_DRAIN_PER_SEC * dt;
        if state.player.energy <= 0.0 {
            state.player.energy = 0.0;
            state.player.buffs.beam_active = false;
            state.push_event(GameEvent::BeamStopped);
        }
    }
}

/// Drain every deferred task that has come due
fn run_due_tasks(state: &mut SessionState) {
    while let Some(task) = state.tasks.pop_due(state.time_ticks) {
        match task {
            Task::LightningPulse => lightning_pulse(state),
            Task::ClearEnemyFlash { enemy_id } => {
                // Stale id (enemy already destroyed) is a silent no-op
                if let Some(enemy) = state.enemy_mut(enemy_id) {
                    enemy.hit_flash = false;
                }
            }
            Task::ClearPlayerFlash => state.player.hit_flash = false,
        }
    }
}

/// One lightning strike: flat damage to every live enemy, kills rewarded
/// exactly like bullet kills
fn lightning_pulse(state: &mut SessionState) {
    state.push_event(GameEvent::LightningFlash);
    let mut i = 0;
    while i < state.enemies.len() {
        state.enemies[i].hp -= LIGHTNING_PULSE_DAMAGE;
        if state.enemies[i].hp <= 0.0 {
            let enemy = state.enemies.remove(i);
            reward_kill(state, &enemy);
        } else {
            i += 1;
        }
    }
}

/// Score, drop roll, and energy for a kill the player earned
fn reward_kill(state: &mut SessionState, enemy: &Enemy) {
    state.score += if enemy.elite { 100 } else { 10 };
    state.player.gain_energy(KILL_ENERGY_GAIN);
    spawn::roll_death_drop(state, enemy.pos, enemy.elite);
    state.push_event(GameEvent::EnemyDestroyed {
        elite: enemy.elite,
        pos: enemy.pos,
    });
}

/// Activate abilities for pressed slots. A slot is a no-op (charge kept)
/// when the timed buff is already running, or when healing at full hp.
fn handle_abilities(state: &mut SessionState, input: &TickInput) {
    for (slot, pressed) in input.use_slot.iter().enumerate() {
        if !pressed {
            continue;
        }
        let Some(kind) = AbilityKind::from_slot(slot) else {
            continue;
        };
        let blocked = match kind {
            AbilityKind::RapidFire => state.player.buffs.rapid_ticks > 0,
            AbilityKind::Lightning => state.player.buffs.lightning_ticks > 0,
            AbilityKind::WaveFire => state.player.buffs.wave_ticks > 0,
            AbilityKind::Heal => state.player.hp >= state.player.max_hp,
        };
        if blocked || !state.player.inventory.take(kind) {
            continue;
        }

        match kind {
            AbilityKind::RapidFire => {
                state.player.buffs.rapid_ticks = RAPID_FIRE_DURATION_TICKS;
            }
            AbilityKind::Lightning => {
                state.player.buffs.lightning_ticks = LIGHTNING_DURATION_TICKS;
                // First strike lands now, two more follow on the queue
                lightning_pulse(state);
                for n in 1..=2 {
                    state
                        .tasks
                        .schedule(state.time_ticks + n * LIGHTNING_PULSE_SPACING_TICKS, Task::LightningPulse);
                }
            }
            AbilityKind::WaveFire => {
                state.player.buffs.wave_ticks = WAVE_FIRE_DURATION_TICKS;
                state.score += WAVE_FIRE_SCORE_BONUS;
            }
            AbilityKind::Heal => {
                state.player.hp = (state.player.hp + HEAL_AMOUNT).min(state.player.max_hp);
            }
        }
        state.push_event(GameEvent::AbilityUsed(kind));
    }
}

/// Cadence-driven spawning and firing
fn run_spawners(state: &mut SessionState, dt: f32) {
    if state.time_ticks % spawn::BG_SPAWN_CADENCE == 0 {
        spawn::spawn_bg_object(state, -60.0);
    }
    if state.time_ticks % spawn::ENEMY_SPAWN_CADENCE == 0 {
        spawn::spawn_enemy(state);
    }
    if state.time_ticks % spawn::POWERUP_SPAWN_CADENCE == 0 {
        spawn::spawn_timed_powerup(state);
    }

    let cadence = if state.player.buffs.rapid_ticks > 0 {
        spawn::RAPID_FIRE_CADENCE
    } else {
        spawn::FIRE_CADENCE
    };
    if state.time_ticks % cadence == 0 {
        spawn::fire_player_weapon(state);
    }

    spawn::enemy_fire(state, dt);
}

/// Integrate positions, apply movement patterns, cull off-field entities
fn update_movement(state: &mut SessionState, input: &TickInput, dt: f32) {
    // Pointer follow wins over the keyboard vector
    let next = match input.target_pos {
        Some(target) => target,
        None => {
            state.player.pos + input.move_dir.normalize_or_zero() * PLAYER_SPEED * dt
        }
    };
    state.player.pos = crate::clamp_to_field(next, state.player.size);

    let elapsed_secs = state.time_ticks as f32 * SIM_DT;
    for enemy in &mut state.enemies {
        let half = enemy.size / 2.0;
        if enemy.elite {
            // Global-clock sway keeps all elites in phase
            enemy.pos.x =
                FIELD_WIDTH / 2.0 + ELITE_SWAY_AMPLITUDE * (elapsed_secs / ELITE_SWAY_PERIOD).sin();
            enemy.pos.y += enemy.vel.y * dt;
            continue;
        }
        match &mut enemy.pattern {
            super::state::MovePattern::Straight => {}
            super::state::MovePattern::Sine { phase } => {
                *phase += SINE_PHASE_SPEED * dt;
                enemy.vel.x = SINE_AMPLITUDE * phase.sin();
                // Wall contact: phase-shift by pi so the lateral velocity
                // reverses smoothly, with a hard clamp as the safety net
                let next_x = enemy.pos.x + enemy.vel.x * dt;
                if next_x < half || next_x > FIELD_WIDTH - half {
                    *phase += std::f32::consts::PI;
                    enemy.vel.x = -enemy.vel.x;
                }
            }
            super::state::MovePattern::Sway => {
                if (enemy.pos.x <= half + 2.0 && enemy.vel.x < 0.0)
                    || (enemy.pos.x >= FIELD_WIDTH - half - 2.0 && enemy.vel.x > 0.0)
                {
                    enemy.vel.x = -enemy.vel.x;
                }
            }
        }
        enemy.pos += enemy.vel * dt;
        enemy.pos.x = enemy.pos.x.clamp(half, FIELD_WIDTH - half);
    }

    for bullet in state.bullets.iter_mut().chain(&mut state.enemy_bullets) {
        bullet.pos += bullet.vel * dt;
    }
    for p in &mut state.powerups {
        p.pos += p.vel * dt;
    }
    for bg in &mut state.bg_objects {
        bg.pos.y += bg.fall_speed * dt;
    }

    // Bullets die a short margin past any edge; everything else only
    // leaves through the bottom
    let in_field = |pos: Vec2| {
        pos.x > -BULLET_CULL_MARGIN
            && pos.x < FIELD_WIDTH + BULLET_CULL_MARGIN
            && pos.y > -BULLET_CULL_MARGIN
            && pos.y < FIELD_HEIGHT + BULLET_CULL_MARGIN
    };
    state.bullets.retain(|b| in_field(b.pos));
    state.enemy_bullets.retain(|b| in_field(b.pos));
    state
        .enemies
        .retain(|e| e.pos.y < FIELD_HEIGHT + BOTTOM_CULL_MARGIN);
    state
        .powerups
        .retain(|p| p.pos.y < FIELD_HEIGHT + BOTTOM_CULL_MARGIN);
    state
        .bg_objects
        .retain(|b| b.pos.y < FIELD_HEIGHT + BOTTOM_CULL_MARGIN);
}

/// Pairwise collision resolution, fixed order: player bullets vs enemies,
/// enemies vs player, enemy bullets vs player, powerup pickup, beam sweep
fn resolve_collisions(state: &mut SessionState) {
    // Player bullets vs enemies, first match wins per bullet
    let mut bi = 0;
    'bullets: while bi < state.bullets.len() {
        for ei in 0..state.enemies.len() {
            let bullet = &state.bullets[bi];
            let enemy = &state.enemies[ei];
            if hitboxes_overlap(bullet.pos, bullet.size, enemy.pos, Vec2::splat(enemy.size)) {
                state.bullets.remove(bi);
                damage_enemy(state, ei, PLAYER_BULLET_DAMAGE);
                continue 'bullets;
            }
        }
        bi += 1;
    }

    // Enemies ramming the player: the ship is destroyed but the kill was
    // not earned, so no score, no drop, no energy
    let mut ei = 0;
    while ei < state.enemies.len() {
        let enemy = &state.enemies[ei];
        if squares_overlap(enemy.pos, enemy.size, state.player.pos, state.player.size) {
            let enemy = state.enemies.remove(ei);
            state.push_event(GameEvent::EnemyDestroyed {
                elite: enemy.elite,
                pos: enemy.pos,
            });
            damage_player(state, ENEMY_COLLISION_DAMAGE);
        } else {
            ei += 1;
        }
    }

    let mut bi = 0;
    while bi < state.enemy_bullets.len() {
        let bullet = &state.enemy_bullets[bi];
        if hitboxes_overlap(
            bullet.pos,
            bullet.size,
            state.player.pos,
            Vec2::splat(state.player.size),
        ) {
            state.enemy_bullets.remove(bi);
            damage_player(state, ENEMY_BULLET_DAMAGE);
        } else {
            bi += 1;
        }
    }

    let mut pi = 0;
    while pi < state.powerups.len() {
        let p = &state.powerups[pi];
        if squares_overlap(p.pos, p.size, state.player.pos, state.player.size) {
            let kind = state.powerups.remove(pi).kind;
            apply_pickup(state, kind);
        } else {
            pi += 1;
        }
    }

    if state.player.buffs.beam_active {
        beam_sweep(state);
    }
}

/// Apply damage to the enemy at `index`, resolving death immediately so a
/// dead ship can never absorb a second hit or survive into render
fn damage_enemy(state: &mut SessionState, index: usize, amount: f32) {
    let enemy = &mut state.enemies[index];
    enemy.hp -= amount;
    if enemy.hp <= 0.0 {
        let enemy = state.enemies.remove(index);
        reward_kill(state, &enemy);
    } else {
        enemy.hit_flash = true;
        let id = enemy.id;
        state
            .tasks
            .schedule(state.time_ticks + HIT_FLASH_TICKS, Task::ClearEnemyFlash { enemy_id: id });
        state.push_event(GameEvent::EnemyHit);
    }
}

fn damage_player(state: &mut SessionState, amount: f32) {
    state.player.hp = (state.player.hp - amount).max(0.0);
    state.player.hit_flash = true;
    state
        .tasks
        .schedule(state.time_ticks + HIT_FLASH_TICKS, Task::ClearPlayerFlash);
    state.push_event(GameEvent::PlayerHit);
}

/// Resolve a touched pickup: heals apply or bank, weapons upgrade or
/// discard at max level, skill charges bank up to the stack cap
fn apply_pickup(state: &mut SessionState, kind: PowerupKind) {
    let collected = match kind {
        PowerupKind::Heal => {
            if state.player.hp < state.player.max_hp {
                state.player.hp = (state.player.hp + HEAL_AMOUNT).min(state.player.max_hp);
                true
            } else {
                state.player.inventory.add(AbilityKind::Heal)
            }
        }
        PowerupKind::Weapon => {
            if state.player.weapon_level < MAX_WEAPON_LEVEL {
                state.player.weapon_level += 1;
                true
            } else {
                false
            }
        }
        PowerupKind::RapidFire => state.player.inventory.add(AbilityKind::RapidFire),
        PowerupKind::Lightning => state.player.inventory.add(AbilityKind::Lightning),
        PowerupKind::WaveFire => state.player.inventory.add(AbilityKind::WaveFire),
    };
    state.push_event(if collected {
        GameEvent::PickupCollected(kind)
    } else {
        GameEvent::PickupDiscarded(kind)
    });
}

/// Continuous beam damage to every enemy in the column above the player
fn beam_sweep(state: &mut SessionState) {
    let (player_pos, player_size) = (state.player.pos, state.player.size);
    let mut i = 0;
    while i < state.enemies.len() {
        let enemy = &mut state.enemies[i];
        if beam_intersects(player_pos, player_size, enemy.pos, enemy.size) {
            enemy.hp -= BEAM_DAMAGE_PER_TICK;
            if enemy.hp <= 0.0 {
                let enemy = state.enemies.remove(i);
                reward_kill(state, &enemy);
                continue;
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::state::{Bullet, BulletTint, MovePattern};
    use proptest::prelude::*;

    fn test_enemy(id: u32, pos: Vec2, hp: f32) -> Enemy {
        Enemy {
            id,
            pos,
            vel: Vec2::new(0.0, ENEMY_SPEED),
            size: ENEMY_SIZE,
            kind: 0,
            hp,
            max_hp: hp,
            pattern: MovePattern::Straight,
            ring_cooldown: None,
            elite: false,
            hit_flash: false,
        }
    }

    fn test_bullet(id: u32, pos: Vec2) -> Bullet {
        Bullet {
            id,
            pos,
            vel: Vec2::new(0.0, -BULLET_SPEED),
            size: Vec2::new(BULLET_SIZE, 12.0),
            tint: BulletTint::Blue,
        }
    }

    #[test]
    fn test_three_bullets_kill_scores_once() {
        let mut state = SessionState::new(1);
        let pos = Vec2::new(240.0, 300.0);
        state.enemies.push(test_enemy(100, pos, 3.0));
        for i in 0..3 {
            state.bullets.push(test_bullet(200 + i, pos));
        }

        resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.player.energy, KILL_ENERGY_GAIN);
    }

    #[test]
    fn test_no_double_kill_from_overlapping_bullets() {
        let mut state = SessionState::new(1);
        let pos = Vec2::new(240.0, 300.0);
        state.enemies.push(test_enemy(100, pos, 1.0));
        state.bullets.push(test_bullet(200, pos));
        state.bullets.push(test_bullet(201, pos));

        resolve_collisions(&mut state);

        // One bullet killed it; the other found nothing and flew on
        assert!(state.enemies.is_empty());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score, 10);
        let kills = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn test_ram_kill_awards_nothing() {
        let mut state = SessionState::new(1);
        state.enemies.push(test_enemy(100, state.player.pos, 3.0));

        resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.player.energy, 0.0);
        assert!(state.powerups.is_empty());
        assert_eq!(state.player.hp, PLAYER_MAX_HP - ENEMY_COLLISION_DAMAGE);
        assert!(state.player.hit_flash);
    }

    #[test]
    fn test_enemy_bullet_damages_player() {
        let mut state = SessionState::new(1);
        state.enemy_bullets.push(test_bullet(200, state.player.pos));

        resolve_collisions(&mut state);

        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.player.hp, PLAYER_MAX_HP - ENEMY_BULLET_DAMAGE);
    }

    #[test]
    fn test_beam_energy_monotone_and_forced_off() {
        let mut state = SessionState::new(1);
        state.player.energy = 0.5;
        let input = TickInput {
            beam_held: true,
            ..Default::default()
        };

        update_buffs(&mut state, &input, SIM_DT);
        assert!(state.player.buffs.beam_active);
        assert!(state.events.contains(&GameEvent::BeamStarted));

        let mut last = state.player.energy;
        for _ in 0..600 {
            update_buffs(&mut state, &input, SIM_DT);
            assert!(state.player.energy <= last);
            last = state.player.energy;
        }
        assert_eq!(state.player.energy, 0.0);
        assert!(!state.player.buffs.beam_active);
        assert!(state.events.contains(&GameEvent::BeamStopped));
    }

    #[test]
    fn test_beam_damages_column_only() {
        let mut state = SessionState::new(1);
        state.player.buffs.beam_active = true;
        let above = Vec2::new(state.player.pos.x, 100.0);
        let aside = Vec2::new(state.player.pos.x - 200.0, 100.0);
        state.enemies.push(test_enemy(100, above, 3.0));
        state.enemies.push(test_enemy(101, aside, 3.0));

        beam_sweep(&mut state);

        assert_eq!(state.enemies[0].hp, 3.0 - BEAM_DAMAGE_PER_TICK);
        assert_eq!(state.enemies[1].hp, 3.0);
    }

    #[test]
    fn test_beam_kill_is_rewarded() {
        let mut state = SessionState::new(1);
        state.player.buffs.beam_active = true;
        let above = Vec2::new(state.player.pos.x, 100.0);
        state.enemies.push(test_enemy(100, above, 0.1));

        beam_sweep(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.player.energy, KILL_ENERGY_GAIN);
    }

    #[test]
    fn test_pickup_bank_discards_at_cap() {
        let mut state = SessionState::new(1);
        for _ in 0..INVENTORY_CAP {
            assert!(state.player.inventory.add(AbilityKind::Lightning));
        }

        apply_pickup(&mut state, PowerupKind::Lightning);

        assert_eq!(state.player.inventory.count(AbilityKind::Lightning), INVENTORY_CAP);
        assert!(state
            .events
            .contains(&GameEvent::PickupDiscarded(PowerupKind::Lightning)));
    }

    #[test]
    fn test_heal_pickup_applies_when_hurt_banks_when_full() {
        let mut state = SessionState::new(1);
        state.player.hp = 50.0;
        apply_pickup(&mut state, PowerupKind::Heal);
        assert_eq!(state.player.hp, 80.0);
        assert_eq!(state.player.inventory.count(AbilityKind::Heal), 0);

        state.player.hp = state.player.max_hp;
        apply_pickup(&mut state, PowerupKind::Heal);
        assert_eq!(state.player.inventory.count(AbilityKind::Heal), 1);
    }

    #[test]
    fn test_weapon_pickup_discards_at_max_level() {
        let mut state = SessionState::new(1);
        state.player.weapon_level = MAX_WEAPON_LEVEL;
        apply_pickup(&mut state, PowerupKind::Weapon);
        assert_eq!(state.player.weapon_level, MAX_WEAPON_LEVEL);
        assert!(state
            .events
            .contains(&GameEvent::PickupDiscarded(PowerupKind::Weapon)));
    }

    #[test]
    fn test_lightning_clears_four_weak_enemies() {
        let mut state = SessionState::new(1);
        for i in 0..4 {
            state
                .enemies
                .push(test_enemy(100 + i, Vec2::new(60.0 + 80.0 * i as f32, 200.0), 1.0));
        }
        state.player.inventory.add(AbilityKind::Lightning);
        let input = TickInput {
            use_slot: [false, true, false, false],
            ..Default::default()
        };

        handle_abilities(&mut state, &input);

        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 40);
        assert_eq!(state.player.inventory.count(AbilityKind::Lightning), 0);
        // Two more pulses wait on the queue
        assert_eq!(state.tasks.len(), 2);
    }

    #[test]
    fn test_timed_buff_retrigger_keeps_charge() {
        let mut state = SessionState::new(1);
        state.player.inventory.add(AbilityKind::RapidFire);
        state.player.buffs.rapid_ticks = 100;
        let input = TickInput {
            use_slot: [true, false, false, false],
            ..Default::default()
        };

        handle_abilities(&mut state, &input);

        assert_eq!(state.player.inventory.count(AbilityKind::RapidFire), 1);
        assert_eq!(state.player.buffs.rapid_ticks, 100);
    }

    #[test]
    fn test_heal_ability_noop_at_full_hp() {
        let mut state = SessionState::new(1);
        state.player.inventory.add(AbilityKind::Heal);
        let input = TickInput {
            use_slot: [false, false, false, true],
            ..Default::default()
        };

        handle_abilities(&mut state, &input);
        assert_eq!(state.player.inventory.count(AbilityKind::Heal), 1);

        state.player.hp = 40.0;
        handle_abilities(&mut state, &input);
        assert_eq!(state.player.hp, 70.0);
        assert_eq!(state.player.inventory.count(AbilityKind::Heal), 0);
    }

    #[test]
    fn test_game_over_freezes_until_restart() {
        let mut state = SessionState::new(9);
        state.score = 500;
        state.tasks.schedule(1000, Task::LightningPulse);
        state.player.hp = 0.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.tasks.is_empty());

        let frozen_ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, frozen_ticks);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
        assert_eq!(state.time_ticks, 0);
        assert!(state.enemies.is_empty());
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = SessionState::new(9);
        state.score = 500;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.score, 500);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_player_clamped_to_field() {
        let mut state = SessionState::new(1);
        let input = TickInput {
            target_pos: Some(Vec2::new(-500.0, 10_000.0)),
            ..Default::default()
        };
        update_movement(&mut state, &input, SIM_DT);
        let half = state.player.size / 2.0;
        assert_eq!(state.player.pos.x, half);
        assert_eq!(state.player.pos.y, FIELD_HEIGHT - half);
    }

    #[test]
    fn test_bullets_cull_past_margin() {
        let mut state = SessionState::new(1);
        state.bullets.push(test_bullet(200, Vec2::new(240.0, -BULLET_CULL_MARGIN - 5.0)));
        state.bullets.push(test_bullet(201, Vec2::new(240.0, 400.0)));
        update_movement(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_sway_enemy_reflects_at_walls() {
        let mut state = SessionState::new(1);
        let mut e = test_enemy(100, Vec2::new(ENEMY_SIZE / 2.0 + 1.0, 200.0), 3.0);
        e.pattern = MovePattern::Sway;
        e.vel.x = -90.0;
        state.enemies.push(e);

        update_movement(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies[0].vel.x > 0.0);
    }

    #[test]
    fn test_determinism_same_seed_same_state() {
        let script = |t: u64| TickInput {
            move_dir: Vec2::new(if t % 120 < 60 { 1.0 } else { -1.0 }, 0.0),
            beam_held: t % 300 > 200,
            ..Default::default()
        };

        let mut a = SessionState::new(777);
        let mut b = SessionState::new(777);
        for t in 0..600 {
            tick(&mut a, &script(t), SIM_DT);
            tick(&mut b, &script(t), SIM_DT);
        }

        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }

    proptest! {
        /// Core clamps hold under arbitrary input scripts
        #[test]
        fn prop_clamps_hold_under_random_input(
            seed in any::<u64>(),
            script in prop::collection::vec(
                (any::<bool>(), -1.0f32..1.0, -1.0f32..1.0, any::<u8>()),
                1..300,
            ),
        ) {
            let mut state = SessionState::new(seed);
            for (beam, dx, dy, slots) in script {
                let input = TickInput {
                    move_dir: Vec2::new(dx, dy),
                    beam_held: beam,
                    use_slot: [
                        slots & 1 != 0,
                        slots & 2 != 0,
                        slots & 4 != 0,
                        slots & 8 != 0,
                    ],
                    ..Default::default()
                };
                tick(&mut state, &input, SIM_DT);

                prop_assert!((0.0..=PLAYER_MAX_HP).contains(&state.player.hp));
                prop_assert!((0.0..=PLAYER_MAX_ENERGY).contains(&state.player.energy));
                prop_assert!((1..=MAX_WEAPON_LEVEL).contains(&state.player.weapon_level));
                prop_assert!(state.bullets.len() <= MAX_PLAYER_BULLETS);
                prop_assert!(state.enemies.len() <= MAX_ENEMIES);
                prop_assert!(state.enemy_bullets.len() <= MAX_ENEMY_BULLETS);
                let half = state.player.size / 2.0;
                prop_assert!(state.player.pos.x >= half && state.player.pos.x <= FIELD_WIDTH - half);
                for e in &state.enemies {
                    prop_assert!(e.hp > 0.0);
                }
            }
        }
    }
}
