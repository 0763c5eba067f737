//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration and collision order
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tasks;
pub mod tick;

pub use collision::{beam_intersects, hitboxes_overlap, rects_overlap, squares_overlap};
pub use state::{
    AbilityKind, ActiveBuffs, BgKind, BgObject, Bullet, BulletTint, Enemy, GameEvent, GamePhase,
    Inventory, MovePattern, Player, Powerup, PowerupKind, SessionState,
};
pub use tasks::{Task, TaskQueue};
pub use tick::{TickInput, tick};
