//! Session state and core simulation types
//!
//! Everything the simulation mutates lives in one owned [`SessionState`]
//! aggregate, passed explicitly to each phase function. Restart is a matter
//! of reconstructing the aggregate; no module-level mutable state exists.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::tasks::TaskQueue;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player hp reached 0; one-way until restart
    GameOver,
}

/// Lateral movement rule for normal enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovePattern {
    /// Straight descent, no lateral motion
    Straight,
    /// Lateral velocity = amplitude * sin(phase); phase advances per entity
    Sine { phase: f32 },
    /// Constant lateral velocity, reflecting off the side walls
    Sway,
}

/// Power-up pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Restores 30 hp on contact; banks a heal charge at full hp
    Heal,
    /// Raises weapon level by one (discarded at max level)
    Weapon,
    /// Banked charge: doubled fire rate for 5 seconds
    RapidFire,
    /// Banked charge: three full-screen lightning strikes over 3 seconds
    Lightning,
    /// Banked charge: wide bullet spread for 10 seconds
    WaveFire,
}

/// Consumable ability kinds, indexing the player inventory and input slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    RapidFire,
    Lightning,
    WaveFire,
    Heal,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 4] = [
        AbilityKind::RapidFire,
        AbilityKind::Lightning,
        AbilityKind::WaveFire,
        AbilityKind::Heal,
    ];

    /// Map an input slot index (0..4) to an ability, if in range
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    fn index(self) -> usize {
        match self {
            AbilityKind::RapidFire => 0,
            AbilityKind::Lightning => 1,
            AbilityKind::WaveFire => 2,
            AbilityKind::Heal => 3,
        }
    }
}

/// Banked consumable charges, capped per kind at [`INVENTORY_CAP`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u8; 4],
}

impl Inventory {
    pub fn count(&self, kind: AbilityKind) -> u8 {
        self.counts[kind.index()]
    }

    /// Bank one charge; returns false (discard) when the stack is full
    pub fn add(&mut self, kind: AbilityKind) -> bool {
        let c = &mut self.counts[kind.index()];
        if *c >= INVENTORY_CAP {
            return false;
        }
        *c += 1;
        true
    }

    /// Consume one charge; returns false when none are banked
    pub fn take(&mut self, kind: AbilityKind) -> bool {
        let c = &mut self.counts[kind.index()];
        if *c == 0 {
            return false;
        }
        *c -= 1;
        true
    }
}

/// Active timed buffs, in remaining ticks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActiveBuffs {
    pub rapid_ticks: u32,
    pub wave_ticks: u32,
    pub lightning_ticks: u32,
    /// Beam is level-triggered (held input + energy), not timed
    pub beam_active: bool,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Fire pattern selector, 1..=MAX_WEAPON_LEVEL
    pub weapon_level: u8,
    /// Fuels the beam weapon
    pub energy: f32,
    pub max_energy: f32,
    pub buffs: ActiveBuffs,
    pub inventory: Inventory,
    /// Renderer tint hint, cleared by a deferred task
    pub hit_flash: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - PLAYER_SIZE - 50.0),
            size: PLAYER_SIZE,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            weapon_level: 1,
            energy: 0.0,
            max_energy: PLAYER_MAX_ENERGY,
            buffs: ActiveBuffs::default(),
            inventory: Inventory::default(),
            hit_flash: false,
        }
    }

    /// HP as a 0..1 fraction for HUD bars (zero max reads as empty)
    pub fn hp_fraction(&self) -> f32 {
        crate::fraction(self.hp, self.max_hp)
    }

    pub fn energy_fraction(&self) -> f32 {
        crate::fraction(self.energy, self.max_energy)
    }

    /// Gain energy from a kill, clamped to the meter
    pub fn gain_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(self.max_energy);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Renderer tint for player bullets (gold while rapid-fire is up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletTint {
    Blue,
    Gold,
    Red,
}

/// A projectile; ownership is implied by which collection holds it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub tint: BulletTint,
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Visual variant tag, 0..=5
    pub kind: u8,
    /// Fractional to support continuous beam damage
    pub hp: f32,
    pub max_hp: f32,
    pub pattern: MovePattern,
    /// Some(ticks) = fires a radial ring when the cooldown hits 0
    pub ring_cooldown: Option<u32>,
    pub elite: bool,
    pub hit_flash: bool,
}

impl Enemy {
    /// HP fraction for the health bar above the ship
    pub fn hp_fraction(&self) -> f32 {
        crate::fraction(self.hp, self.max_hp)
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PowerupKind,
    pub size: f32,
}

/// Background decoration variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BgKind {
    Cloud,
    Building,
}

/// Purely cosmetic scrolling decoration; shares the spawn/update/cull
/// lifecycle with gameplay entities but never collides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BgObject {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub fall_speed: f32,
    pub kind: BgKind,
}

/// Things that happened this tick, drained by the host for audio/VFX.
/// The simulation never depends on whether anyone consumes these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    EnemyShotFired,
    RingFired { elite: bool },
    EnemyHit,
    EnemyDestroyed { elite: bool, pos: Vec2 },
    EliteSpawned,
    PlayerHit,
    PickupCollected(PowerupKind),
    /// Pickup touched but discarded (full stack / max weapon level)
    PickupDiscarded(PowerupKind),
    AbilityUsed(AbilityKind),
    BeamStarted,
    BeamStopped,
    LightningFlash,
    GameOver,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete session state (deterministic given seed + input script)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single randomness source for spawn variants, drops, and jitter
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub player: Player,
    /// Player-owned bullets
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    pub bg_objects: Vec<BgObject>,
    /// Deferred one-shot effects, keyed by due tick
    pub tasks: TaskQueue,
    /// Normal spawns since the last elite
    pub spawns_since_elite: u32,
    /// Elite substitutes for a normal spawn once the counter reaches this
    pub elite_threshold: u32,
    /// Events since the last drain (visual/audio feedback only)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SessionState {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let elite_threshold = super::spawn::roll_elite_threshold(&mut rng);
        let mut state = Self {
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            player: Player::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            bg_objects: Vec::new(),
            tasks: TaskQueue::new(),
            spawns_since_elite: 0,
            elite_threshold,
            events: Vec::new(),
            next_id: 1,
        };

        // Pre-populate the backdrop so the field isn't empty on frame one
        super::spawn::seed_background(&mut state);
        state
    }

    /// Allocate a new entity id. Ids are never reused, so a stale id held
    /// by a deferred task can only miss, never alias a new entity.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand this tick's event list to the host (audio/VFX feedback)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// End the session: freeze the phase and invalidate every pending
    /// deferred task so nothing fires into a later play-through
    pub fn end_session(&mut self) {
        self.phase = GamePhase::GameOver;
        self.tasks.clear();
        self.push_event(GameEvent::GameOver);
    }

    /// Look up a live enemy by id (deferred-task guard)
    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }
}
