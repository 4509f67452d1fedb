//! Collision tests between projectiles and the rest of the world
//!
//! Projectiles are circles for projectile-vs-projectile contact but use
//! their bounding square against rectangles (tiles and tanks).

use super::rect::Rect;
use super::state::Projectile;

/// Extra slack added to the radius sum when two shells meet
pub const PROJECTILE_CONTACT_SLACK: f32 = 1.0;

/// Bounding square of a projectile
#[inline]
pub fn projectile_rect(p: &Projectile) -> Rect {
    Rect::around(p.pos, p.radius)
}

/// True if two shells are close enough to cancel each other out.
///
/// Ownership is not checked here.
#[inline]
pub fn projectiles_touch(a: &Projectile, b: &Projectile) -> bool {
    a.pos.distance(b.pos) <= a.radius + b.radius + PROJECTILE_CONTACT_SLACK
}

/// True if a projectile overlaps a rectangle
#[inline]
pub fn projectile_hits_rect(p: &Projectile, rect: &Rect) -> bool {
    projectile_rect(p).overlaps(rect)
}
