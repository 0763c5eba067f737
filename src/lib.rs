//! Skystrike - a vertical bullet-hell shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, buffs)
//! - `audio`: Sound effect seam for host audio backends
//!
//! Rendering, audio playback, and input capture live in the host. The host
//! drives `sim::tick` on a fixed-step accumulator and reads the session
//! state (plus the drained event list) to draw sprites and play sounds.

pub mod audio;
pub mod sim;

pub use audio::{AudioPlayer, NullAudio, SoundKind};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the hosted frame pacing)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    pub const PLAYER_MAX_ENERGY: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const MAX_WEAPON_LEVEL: u8 = 4;

    /// Bullet defaults
    pub const BULLET_SIZE: f32 = 6.0;
    pub const BULLET_SPEED: f32 = 480.0;
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_SPEED: f32 = 150.0;
    pub const ELITE_SIZE: f32 = 80.0;
    pub const ELITE_HP: f32 = 50.0;

    /// Damage constants
    pub const ENEMY_COLLISION_DAMAGE: f32 = 30.0;
    pub const ENEMY_BULLET_DAMAGE: f32 = 20.0;
    pub const BEAM_DAMAGE_PER_TICK: f32 = 0.2;
    pub const BEAM_WIDTH: f32 = 16.0;
    /// Beam energy drain per second of active firing
    pub const BEAM_DRAIN_PER_SEC: f32 = 5.0;
    /// Energy granted per bullet/beam/lightning kill
    pub const KILL_ENERGY_GAIN: f32 = 10.0;

    /// Inventory stack cap per ability kind
    pub const INVENTORY_CAP: u8 = 5;

    /// Collision boxes shrink inward by this much on each side
    pub const HITBOX_PADDING: f32 = 5.0;

    /// Off-screen cull margins
    pub const BULLET_CULL_MARGIN: f32 = 20.0;
    pub const BOTTOM_CULL_MARGIN: f32 = 50.0;

    /// Bounded pool capacities; spawns past these silently no-op
    pub const MAX_PLAYER_BULLETS: usize = 30;
    pub const MAX_ENEMIES: usize = 50;
    pub const MAX_ENEMY_BULLETS: usize = 50;
    pub const MAX_POWERUPS: usize = 16;
    pub const MAX_BG_OBJECTS: usize = 32;
}

/// Clamp a position to the playfield, keeping a half-size inset so the
/// entity stays fully visible
#[inline]
pub fn clamp_to_field(pos: Vec2, size: f32) -> Vec2 {
    let half = size / 2.0;
    Vec2::new(
        pos.x.clamp(half, consts::FIELD_WIDTH - half),
        pos.y.clamp(half, consts::FIELD_HEIGHT - half),
    )
}

/// Fraction helper with a divide-by-zero guard (zero max reads as empty)
#[inline]
pub fn fraction(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max).clamp(0.0, 1.0)
    }
}
