//! Point-circle collision for the travel minigame
//!
//! The ship is treated as a circle of radius `half_size` around its centre,
//! obstacles as circles. Everything here works in pixel space.

use glam::Vec2;

/// True iff the obstacle circle overlaps the ship marker.
///
/// The boundary is exclusive: touching at exactly `radius + half_size` is a miss.
#[inline]
pub fn ship_obstacle_hit(ship: Vec2, half_size: f32, obstacle: Vec2, radius: f32) -> bool {
    ship.distance(obstacle) < radius + half_size
}
