//! Audio seam between the simulation and the host
//!
//! The simulation never talks to an audio device; it emits [`GameEvent`]s
//! and the host maps them onto an [`AudioPlayer`]. Playback is
//! fire-and-forget: a backend that cannot play (missing device, missing
//! asset) logs a warning and the game carries on.

use crate::sim::{GameEvent, PowerupKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    /// Player bullet fired
    Shot,
    /// Enemy bullet fired (aimed or ring)
    EnemyShot,
    /// Bullet connected without a kill
    Hit,
    /// Enemy destroyed
    Explosion,
    /// Bigger boom for elites
    EliteExplosion,
    /// Player took damage
    PlayerHit,
    /// Power-up collected
    Pickup,
    /// Ability activated from the inventory
    AbilityActivate,
    /// Beam loop start
    BeamOn,
    /// Beam loop end
    BeamOff,
    /// Lightning strike flash
    Lightning,
    /// Elite arrival sting
    EliteWarning,
    GameOver,
}

/// Playback backend. `pitch` is a rate multiplier around 1.0 so repeated
/// effects don't sound machine-gunned; backends may ignore it.
pub trait AudioPlayer {
    fn play(&mut self, kind: SoundKind, pitch: f32);

    /// Mute/unmute all playback
    fn set_muted(&mut self, _muted: bool) {}
}

/// Backend that discards everything (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioPlayer for NullAudio {
    fn play(&mut self, _kind: SoundKind, _pitch: f32) {}
}

/// Map a simulation event to the sound it should make, if any
pub fn sound_for_event(event: &GameEvent) -> Option<SoundKind> {
    match event {
        GameEvent::ShotFired => Some(SoundKind::Shot),
        GameEvent::EnemyShotFired | GameEvent::RingFired { .. } => Some(SoundKind::EnemyShot),
        GameEvent::EnemyHit => Some(SoundKind::Hit),
        GameEvent::EnemyDestroyed { elite: true, .. } => Some(SoundKind::EliteExplosion),
        GameEvent::EnemyDestroyed { elite: false, .. } => Some(SoundKind::Explosion),
        GameEvent::EliteSpawned => Some(SoundKind::EliteWarning),
        GameEvent::PlayerHit => Some(SoundKind::PlayerHit),
        GameEvent::PickupCollected(kind) => match kind {
            // Weapon upgrades get the ability sting, the rest the pickup blip
            PowerupKind::Weapon => Some(SoundKind::AbilityActivate),
            _ => Some(SoundKind::Pickup),
        },
        // A discarded pickup makes no sound
        GameEvent::PickupDiscarded(_) => None,
        GameEvent::AbilityUsed(_) => Some(SoundKind::AbilityActivate),
        GameEvent::BeamStarted => Some(SoundKind::BeamOn),
        GameEvent::BeamStopped => Some(SoundKind::BeamOff),
        GameEvent::LightningFlash => Some(SoundKind::Lightning),
        GameEvent::GameOver => Some(SoundKind::GameOver),
    }
}

/// Play this tick's drained events through a backend, with a small
/// deterministic pitch wobble derived from the event index
pub fn play_events(audio: &mut dyn AudioPlayer, events: &[GameEvent]) {
    for (i, event) in events.iter().enumerate() {
        if let Some(kind) = sound_for_event(event) {
            let pitch = 0.9 + 0.05 * (i % 5) as f32;
            audio.play(kind, pitch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::AbilityKind;

    struct Recorder(Vec<SoundKind>);

    impl AudioPlayer for Recorder {
        fn play(&mut self, kind: SoundKind, _pitch: f32) {
            self.0.push(kind);
        }
    }

    #[test]
    fn test_event_sound_mapping() {
        assert_eq!(
            sound_for_event(&GameEvent::EnemyDestroyed {
                elite: true,
                pos: glam::Vec2::ZERO
            }),
            Some(SoundKind::EliteExplosion)
        );
        assert_eq!(
            sound_for_event(&GameEvent::PickupDiscarded(PowerupKind::Heal)),
            None
        );
    }

    #[test]
    fn test_play_events_skips_silent_ones() {
        let mut rec = Recorder(Vec::new());
        play_events(
            &mut rec,
            &[
                GameEvent::ShotFired,
                GameEvent::PickupDiscarded(PowerupKind::Weapon),
                GameEvent::AbilityUsed(AbilityKind::Heal),
            ],
        );
        assert_eq!(rec.0, vec![SoundKind::Shot, SoundKind::AbilityActivate]);
    }
}
