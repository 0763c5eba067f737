//! Axis-aligned bounding-box overlap tests
//!
//! Every entity is a center + size rectangle. Boxes are shrunk inward by a
//! few pixels on each side so grazing sprites don't register as hits; small
//! projectiles keep a minimum 2px core so padding can't erase them. The
//! sweep is a plain pairwise scan; collections stay in the low hundreds, so
//! no spatial index is needed (the helpers take plain rects, so a grid
//! could be slotted in front without touching the resolvers).

use glam::Vec2;

use crate::consts::{BEAM_WIDTH, HITBOX_PADDING};

/// Half extents after inward padding, floored at a 1px half-core
#[inline]
fn padded_half(size: Vec2, padding: f32) -> Vec2 {
    (size / 2.0 - Vec2::splat(padding)).max(Vec2::splat(1.0))
}

/// Overlap test between two center/size rects, each padded inward on every
/// side
pub fn rects_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2, padding: f32) -> bool {
    let half_a = padded_half(size_a, padding);
    let half_b = padded_half(size_b, padding);
    let d = (pos_a - pos_b).abs();
    d.x < half_a.x + half_b.x && d.y < half_a.y + half_b.y
}

/// Overlap with the standard inward padding
#[inline]
pub fn hitboxes_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    rects_overlap(pos_a, size_a, pos_b, size_b, HITBOX_PADDING)
}

/// Square-entity convenience wrapper
#[inline]
pub fn squares_overlap(pos_a: Vec2, size_a: f32, pos_b: Vec2, size_b: f32) -> bool {
    hitboxes_overlap(pos_a, Vec2::splat(size_a), pos_b, Vec2::splat(size_b))
}

/// Does an enemy intersect the beam column? The beam is a thin vertical
/// strip anchored to the player's nose, reaching the top of the field.
pub fn beam_intersects(player_pos: Vec2, player_size: f32, enemy_pos: Vec2, enemy_size: f32) -> bool {
    let nose_y = player_pos.y - player_size / 2.0;
    let enemy_half = enemy_size / 2.0;
    // Enemy must be at or above the nose
    if enemy_pos.y - enemy_half > nose_y {
        return false;
    }
    (enemy_pos.x - player_pos.x).abs() < BEAM_WIDTH / 2.0 + enemy_half
}
