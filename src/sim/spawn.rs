//! Spawning policy: enemy cadence and variants, elite substitution,
//! power-up drops, bullet emission patterns, background decorations
//!
//! All cadences are measured in ticks so frequencies are frame-rate
//! independent; per-tick Bernoulli trials are scaled by dt for the same
//! reason. Every spawn silently no-ops when its pool is at capacity.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{
    BgKind, BgObject, Bullet, BulletTint, Enemy, GameEvent, MovePattern, Powerup, PowerupKind,
    SessionState,
};
use crate::consts::*;

/// One normal enemy roughly every N ticks
pub const ENEMY_SPAWN_CADENCE: u64 = 40;
/// Timed power-up drip
pub const POWERUP_SPAWN_CADENCE: u64 = 600;
/// Background decoration drip
pub const BG_SPAWN_CADENCE: u64 = 20;

/// Player fire cadence in ticks (halved under rapid-fire)
pub const FIRE_CADENCE: u64 = 12;
pub const RAPID_FIRE_CADENCE: u64 = 6;

/// Ring-fire cooldowns (3s normal, 2s elite) and burst sizes
pub const RING_COOLDOWN_TICKS: u32 = 180;
pub const ELITE_RING_COOLDOWN_TICKS: u32 = 120;
pub const RING_BULLET_COUNT: u32 = 8;
pub const ELITE_RING_BULLET_COUNT: u32 = 12;
/// Ring bullets travel slower than aimed shots
pub const RING_BULLET_SPEED: f32 = 210.0;

/// Expected aimed shots per second per non-ring enemy
pub const AIMED_SHOT_RATE_PER_SEC: f32 = 0.6;

/// Death-drop probabilities for skill charges
pub const SKILL_DROP_CHANCE: f64 = 0.5;
pub const ELITE_SKILL_DROP_CHANCE: f64 = 0.8;

/// An elite replaces a normal spawn every 15..=23 spawns
pub fn roll_elite_threshold(rng: &mut Pcg32) -> u32 {
    rng.random_range(15..=23)
}

/// Normal-enemy hit points by visual kind (armored and bomber are tougher)
fn enemy_hp_for_kind(kind: u8) -> f32 {
    match kind {
        2 => 8.0,
        3 => 5.0,
        _ => 3.0,
    }
}

/// Spawn the next enemy on the cadence: normal variant, or an elite once
/// the spawn counter crosses its random threshold
pub fn spawn_enemy(state: &mut SessionState) {
    if state.enemies.len() >= MAX_ENEMIES {
        return;
    }

    state.spawns_since_elite += 1;
    if state.spawns_since_elite >= state.elite_threshold {
        state.spawns_since_elite = 0;
        state.elite_threshold = roll_elite_threshold(&mut state.rng);
        spawn_elite(state);
        return;
    }

    let kind = state.rng.random_range(0..6u8);
    let half = ENEMY_SIZE / 2.0;
    let x = state.rng.random_range(half..FIELD_WIDTH - half);

    // Straight 20%, sine 40%, reflecting sway 40%
    let roll: f32 = state.rng.random();
    let (pattern, vx) = if roll < 0.2 {
        (MovePattern::Straight, 0.0)
    } else if roll < 0.6 {
        let phase = state.rng.random_range(0.0..std::f32::consts::TAU);
        (MovePattern::Sine { phase }, 0.0)
    } else {
        (MovePattern::Sway, state.rng.random_range(-90.0..90.0))
    };

    // Half the ships trade aimed shots for a radial ring on a cooldown;
    // the first ring is staggered so a wave doesn't fire in lockstep
    let ring_cooldown = if state.rng.random_bool(0.5) {
        Some(state.rng.random_range(30..=RING_COOLDOWN_TICKS))
    } else {
        None
    };

    let hp = enemy_hp_for_kind(kind);
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos: Vec2::new(x, -ENEMY_SIZE),
        vel: Vec2::new(vx, ENEMY_SPEED),
        size: ENEMY_SIZE,
        kind,
        hp,
        max_hp: hp,
        pattern,
        ring_cooldown,
        elite: false,
        hit_flash: false,
    });
}

/// Rare high-hp variant: central spawn, slow descent, global-clock sway,
/// 12-bullet ring every 2 seconds
fn spawn_elite(state: &mut SessionState) {
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos: Vec2::new(FIELD_WIDTH / 2.0, -ELITE_SIZE),
        vel: Vec2::new(0.0, ENEMY_SPEED * 0.5),
        size: ELITE_SIZE,
        kind: state.rng.random_range(0..6u8),
        hp: ELITE_HP,
        max_hp: ELITE_HP,
        pattern: MovePattern::Straight,
        ring_cooldown: Some(ELITE_RING_COOLDOWN_TICKS),
        elite: true,
        hit_flash: false,
    });
    state.push_event(GameEvent::EliteSpawned);
}

/// Timed drip spawn: mostly heals, sometimes a weapon upgrade
pub fn spawn_timed_powerup(state: &mut SessionState) {
    let kind = if state.rng.random::<f32>() < 0.7 {
        PowerupKind::Heal
    } else {
        PowerupKind::Weapon
    };
    let half = 15.0;
    let x = state.rng.random_range(half..FIELD_WIDTH - half);
    spawn_powerup(state, Vec2::new(x, -30.0), kind);
}

/// Roll a death drop; elites are more generous
pub fn roll_death_drop(state: &mut SessionState, pos: Vec2, elite: bool) {
    let chance = if elite {
        ELITE_SKILL_DROP_CHANCE
    } else {
        SKILL_DROP_CHANCE
    };
    if state.rng.random_bool(chance) {
        let kind = match state.rng.random_range(0..3u8) {
            0 => PowerupKind::RapidFire,
            1 => PowerupKind::Lightning,
            _ => PowerupKind::WaveFire,
        };
        spawn_powerup(state, pos, kind);
    }
}

fn spawn_powerup(state: &mut SessionState, pos: Vec2, kind: PowerupKind) {
    if state.powerups.len() >= MAX_POWERUPS {
        return;
    }
    let id = state.next_entity_id();
    state.powerups.push(Powerup {
        id,
        pos,
        vel: Vec2::new(0.0, 120.0),
        kind,
        size: 30.0,
    });
}

/// Emit this tick's player bullets according to weapon level and buffs
pub fn fire_player_weapon(state: &mut SessionState) {
    let tint = if state.player.buffs.rapid_ticks > 0 {
        BulletTint::Gold
    } else {
        BulletTint::Blue
    };
    let nose = Vec2::new(state.player.pos.x, state.player.pos.y - state.player.size / 2.0);

    if state.player.buffs.wave_ticks > 0 {
        fire_wave_spread(state, nose, tint);
    } else {
        fire_leveled(state, nose, tint);
    }
    state.push_event(GameEvent::ShotFired);
}

/// Standard fire patterns, one to four bullets by weapon level
fn fire_leveled(state: &mut SessionState, nose: Vec2, tint: BulletTint) {
    let s = BULLET_SPEED;
    // (x offset, y offset, vx, vy) per bullet
    let level = state.player.weapon_level.clamp(1, MAX_WEAPON_LEVEL);
    let pattern: &[(f32, f32, f32, f32)] = LEVEL_PATTERNS[(level - 1) as usize];
    for &(dx, dy, vx, vy) in pattern {
        push_player_bullet(
            state,
            nose + Vec2::new(dx, dy),
            Vec2::new(vx * s, vy * s),
            tint,
        );
    }
}

/// Per-level bullet layouts: offsets in px, velocities as fractions of
/// BULLET_SPEED (negative vy = upward)
const LEVEL_PATTERNS: [&[(f32, f32, f32, f32)]; 4] = [
    &[(0.0, 0.0, 0.0, -1.0)],
    &[(-5.0, 0.0, -0.125, -1.0), (5.0, 0.0, 0.125, -1.0)],
    &[
        (0.0, -5.0, 0.0, -1.0),
        (-7.0, 0.0, -0.25, -0.9),
        (7.0, 0.0, 0.25, -0.9),
    ],
    &[
        (-2.0, -5.0, -0.0625, -1.0),
        (4.0, -5.0, 0.0625, -1.0),
        (-12.0, 0.0, -0.375, -0.85),
        (12.0, 0.0, 0.375, -0.85),
    ],
];

/// Wave-fire override: an evenly spaced angular fan, widened by weapon
/// level (level + 2 bullets, 15 degrees apart)
fn fire_wave_spread(state: &mut SessionState, nose: Vec2, tint: BulletTint) {
    let count = state.player.weapon_level as i32 + 2;
    let step = 15.0f32.to_radians();
    let start = -step * (count - 1) as f32 / 2.0;
    for i in 0..count {
        let angle = start + step * i as f32;
        // Rotate the straight-up vector by the fan angle
        let vel = Vec2::new(
            BULLET_SPEED * angle.sin(),
            -BULLET_SPEED * angle.cos(),
        );
        push_player_bullet(state, nose, vel, tint);
    }
}

fn push_player_bullet(state: &mut SessionState, pos: Vec2, vel: Vec2, tint: BulletTint) {
    if state.bullets.len() >= MAX_PLAYER_BULLETS {
        return;
    }
    let id = state.next_entity_id();
    state.bullets.push(Bullet {
        id,
        pos,
        vel,
        size: Vec2::new(BULLET_SIZE, 12.0),
        tint,
    });
}

fn push_enemy_bullet(state: &mut SessionState, pos: Vec2, vel: Vec2) {
    if state.enemy_bullets.len() >= MAX_ENEMY_BULLETS {
        return;
    }
    let id = state.next_entity_id();
    state.enemy_bullets.push(Bullet {
        id,
        pos,
        vel,
        size: Vec2::new(BULLET_SIZE, 10.0),
        tint: BulletTint::Red,
    });
}

/// Per-enemy fire decisions: ring ships count down their cooldown and
/// fire a radial burst; the rest run a dt-scaled Bernoulli aimed shot
pub fn enemy_fire(state: &mut SessionState, dt: f32) {
    let player_pos = state.player.pos;
    for i in 0..state.enemies.len() {
        // Hold fire until fully on screen
        if state.enemies[i].pos.y < 0.0 {
            continue;
        }
        match state.enemies[i].ring_cooldown {
            Some(cd) => {
                if cd > 1 {
                    state.enemies[i].ring_cooldown = Some(cd - 1);
                } else {
                    let (pos, elite) = (state.enemies[i].pos, state.enemies[i].elite);
                    state.enemies[i].ring_cooldown = Some(if elite {
                        ELITE_RING_COOLDOWN_TICKS
                    } else {
                        RING_COOLDOWN_TICKS
                    });
                    fire_ring(state, pos, elite);
                }
            }
            None => {
                let p = (AIMED_SHOT_RATE_PER_SEC * dt).clamp(0.0, 1.0) as f64;
                if state.rng.random_bool(p) {
                    let origin = Vec2::new(
                        state.enemies[i].pos.x,
                        state.enemies[i].pos.y + state.enemies[i].size / 2.0,
                    );
                    let dir = (player_pos - origin).normalize_or_zero();
                    let dir = if dir == Vec2::ZERO { Vec2::Y } else { dir };
                    push_enemy_bullet(state, origin, dir * ENEMY_BULLET_SPEED);
                    state.push_event(GameEvent::EnemyShotFired);
                }
            }
        }
    }
}

/// Full radial burst, evenly spaced
fn fire_ring(state: &mut SessionState, origin: Vec2, elite: bool) {
    let count = if elite {
        ELITE_RING_BULLET_COUNT
    } else {
        RING_BULLET_COUNT
    };
    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let vel = Vec2::new(angle.cos(), angle.sin()) * RING_BULLET_SPEED;
        push_enemy_bullet(state, origin, vel);
    }
    state.push_event(GameEvent::RingFired { elite });
}

/// One scrolling decoration: a slow translucent cloud or a faster building
pub fn spawn_bg_object(state: &mut SessionState, y: f32) {
    if state.bg_objects.len() >= MAX_BG_OBJECTS {
        return;
    }
    let is_cloud = state.rng.random_bool(0.5);
    let (kind, size, speed) = if is_cloud {
        (
            BgKind::Cloud,
            Vec2::new(
                state.rng.random_range(40.0..100.0),
                state.rng.random_range(20.0..50.0),
            ),
            60.0,
        )
    } else {
        (
            BgKind::Building,
            Vec2::new(
                state.rng.random_range(30.0..80.0),
                state.rng.random_range(40.0..100.0),
            ),
            120.0,
        )
    };
    let x = state.rng.random_range(0.0..FIELD_WIDTH);
    let id = state.next_entity_id();
    state.bg_objects.push(BgObject {
        id,
        pos: Vec2::new(x, y),
        size,
        fall_speed: speed,
        kind,
    });
}

/// Scatter an initial backdrop across the field at session start
pub fn seed_background(state: &mut SessionState) {
    for _ in 0..10 {
        let y = state.rng.random_range(0.0..FIELD_HEIGHT);
        spawn_bg_object(state, y);
    }
}
