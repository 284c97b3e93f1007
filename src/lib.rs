//! Astro Genesis - pick a planet, survive the trip, build a colony
//!
//! Core modules:
//! - `sim`: Game state store plus the travel and colony simulations
//! - `router`: Stage → screen mapping with mount/unmount transitions
//! - `session`: Owns the store and mounted loops, dispatches player intents
//! - `catalog`: Static planet and building data
//! - `tuning`: Data-driven game balance

pub mod catalog;
pub mod error;
pub mod router;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use session::{Intent, Session};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Ship health at the start of a run
    pub const MAX_SHIP_HEALTH: i32 = 100;
    /// Travel progress at arrival (percent)
    pub const MAX_TRAVEL_PROGRESS: f32 = 100.0;

    /// Starting stockpile
    pub const STARTING_ENERGY: u64 = 100;
    pub const STARTING_MINERALS: u64 = 50;
    pub const STARTING_POPULATION: u64 = 10;

    /// Colony build grid (6 x 4)
    pub const COLONY_GRID_COLUMNS: usize = 6;
    pub const COLONY_GRID_ROWS: usize = 4;
    pub const COLONY_GRID_SLOTS: usize = COLONY_GRID_COLUMNS * COLONY_GRID_ROWS;

    /// How long a transmission stays on the flight HUD
    pub const TRANSMISSION_LIFETIME_MS: u32 = 5000;

    /// Default pilot callsign
    pub const DEFAULT_PLAYER_NAME: &str = "Explorer";
}

/// Viewport dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert a percentage-space point (0-100 on both axes) to pixels
    #[inline]
    pub fn to_pixels(&self, percent: Vec2) -> Vec2 {
        Vec2::new(
            percent.x / 100.0 * self.width,
            percent.y / 100.0 * self.height,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_pixels() {
        let viewport = Viewport::new(800.0, 600.0);
        let p = viewport.to_pixels(Vec2::new(50.0, 25.0));
        assert_eq!(p, Vec2::new(400.0, 150.0));
    }
}
