//! Data-driven game balance
//!
//! Defaults reproduce the shipped balance. A JSON override only needs the
//! fields it changes; everything else falls back to the defaults.

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Travel minigame balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelTuning {
    /// Ship marker size in pixels (collision uses half of this)
    pub ship_size: f32,
    /// Ship marker top edge, in pixels above the bottom of the field
    pub ship_bottom_offset: f32,
    /// Frames needed to reach 100% progress
    pub duration_frames: u32,
    /// Horizontal move per frame while an arrow is held (percent)
    pub move_step: f32,
    /// Horizontal movement bounds (percent)
    pub min_x: f32,
    pub max_x: f32,
    /// Per-frame spawn probability
    pub spawn_chance: f64,
    /// Spawn height (percent, negative is above the field)
    pub spawn_y: f32,
    /// Obstacles at or past this height are dropped (percent)
    pub despawn_y: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Health lost per hit
    pub hit_damage: i32,
}

impl Default for TravelTuning {
    fn default() -> Self {
        Self {
            ship_size: 40.0,
            ship_bottom_offset: 100.0,
            duration_frames: 2000,
            move_step: 1.5,
            min_x: 5.0,
            max_x: 95.0,
            spawn_chance: 0.05,
            spawn_y: -10.0,
            despawn_y: 110.0,
            radius_min: 10.0,
            radius_max: 40.0,
            speed_min: 0.2,
            speed_max: 0.7,
            hit_damage: 10,
        }
    }
}

/// Colony simulation balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyTuning {
    /// Wall-clock interval between production ticks
    pub tick_interval_ms: u32,
    /// Flat energy drain per tick
    pub energy_upkeep: u64,
    /// Ticks run per `advance` call at most (a hidden tab can pile up hours)
    pub max_catchup_ticks: u32,
}

impl Default for ColonyTuning {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            energy_upkeep: 1,
            max_catchup_ticks: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub travel: TravelTuning,
    pub colony: ColonyTuning,
}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "astro_genesis_tuning";

    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let t = &self.travel;
        if t.duration_frames == 0 {
            return Err(GameError::InvalidTuning("travel.duration_frames must be > 0".into()));
        }
        if t.min_x > t.max_x {
            return Err(GameError::InvalidTuning("travel.min_x exceeds travel.max_x".into()));
        }
        if t.radius_min > t.radius_max || t.speed_min > t.speed_max {
            return Err(GameError::InvalidTuning("travel obstacle range is inverted".into()));
        }
        if !(0.0..=1.0).contains(&t.spawn_chance) {
            return Err(GameError::InvalidTuning("travel.spawn_chance must be in [0, 1]".into()));
        }
        if self.colony.tick_interval_ms == 0 {
            return Err(GameError::InvalidTuning("colony.tick_interval_ms must be > 0".into()));
        }
        Ok(())
    }

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Load a tuning override from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GameError::InvalidTuning(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "travel": { "hit_damage": 25 } }"#).unwrap();
        assert_eq!(tuning.travel.hit_damage, 25);
        assert_eq!(tuning.travel.duration_frames, 2000);
        assert_eq!(tuning.colony, ColonyTuning::default());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let err = Tuning::from_json(r#"{ "travel": { "duration_frames": 0 } }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ travel: ").unwrap_err();
        assert!(matches!(err, GameError::TuningParse(_)));
    }
}
