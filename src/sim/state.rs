//! Game state store
//!
//! `Store` owns the single `GameState` for a session. Every mutation goes
//! through one of its actions, and each action records `StoreEvent`s that
//! observers drain after the fact.

use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::catalog::{BuildingKind, PlanetId, ResourceKind};
use crate::consts::*;

/// Top-level phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Intro,
    PlanetSelection,
    Travel,
    Civilization,
    GameOver,
}

/// Colony stockpile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub energy: u64,
    pub minerals: u64,
    pub population: u64,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            energy: STARTING_ENERGY,
            minerals: STARTING_MINERALS,
            population: STARTING_POPULATION,
        }
    }
}

impl Resources {
    pub fn get(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Energy => self.energy,
            ResourceKind::Minerals => self.minerals,
            ResourceKind::Population => self.population,
        }
    }

    fn get_mut(&mut self, kind: ResourceKind) -> &mut u64 {
        match kind {
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Minerals => &mut self.minerals,
            ResourceKind::Population => &mut self.population,
        }
    }
}

/// A placed colony building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Creation timestamp (ms), bumped when two builds share a millisecond
    pub id: u64,
    pub kind: BuildingKind,
    pub slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransmissionKind {
    Info,
    Alert,
}

/// Narrative message on the flight HUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transmission {
    pub speaker: String,
    pub message: String,
    pub kind: TransmissionKind,
    pub remaining_ms: u32,
}

impl Transmission {
    pub fn new(
        speaker: impl Into<String>,
        message: impl Into<String>,
        kind: TransmissionKind,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
            kind,
            remaining_ms: TRANSMISSION_LIFETIME_MS,
        }
    }
}

/// Everything the presentation layer can observe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub stage: Stage,
    pub player_name: String,
    pub selected_planet: Option<PlanetId>,
    /// Percent, 0-100
    pub travel_progress: f32,
    /// 0-100
    pub ship_health: i32,
    pub resources: Resources,
    /// In placement order
    pub buildings: Vec<Building>,
    /// Cockpit camera instead of chase camera
    pub is_inside_view: bool,
    pub active_transmission: Option<Transmission>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            stage: Stage::Intro,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            selected_planet: None,
            travel_progress: 0.0,
            ship_health: MAX_SHIP_HEALTH,
            resources: Resources::default(),
            buildings: Vec::new(),
            is_inside_view: false,
            active_transmission: None,
        }
    }
}

impl GameState {
    /// Building occupying a grid slot, if any
    pub fn building_at(&self, slot: usize) -> Option<&Building> {
        self.buildings.iter().find(|b| b.slot == slot)
    }
}

/// Change notifications, in the order the mutations happened
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    StageChanged { from: Stage, to: Stage },
    PlanetSelected(PlanetId),
    ProgressChanged(f32),
    HealthChanged(i32),
    ResourceChanged { kind: ResourceKind, value: u64 },
    BuildingPlaced(Building),
    ViewToggled(bool),
    TransmissionChanged,
    PlayerRenamed,
    Reset,
}

/// Owner of the session's `GameState` and its action surface
#[derive(Debug, Default)]
pub struct Store {
    state: GameState,
    events: Vec<StoreEvent>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    /// Unconditional transition; any stage is reachable from any stage
    pub fn set_stage(&mut self, stage: Stage) {
        let from = self.state.stage;
        self.state.stage = stage;
        if from != stage {
            log::info!("Stage {:?} -> {:?}", from, stage);
            self.events.push(StoreEvent::StageChanged { from, to: stage });
        }
    }

    /// Record the destination (does not change stage)
    pub fn select_planet(&mut self, planet: PlanetId) {
        self.state.selected_planet = Some(planet);
        self.events.push(StoreEvent::PlanetSelected(planet));
    }

    pub fn update_travel_progress(&mut self, value: f32) {
        if value.is_nan() {
            log::warn!("Ignoring NaN travel progress");
            return;
        }
        let value = value.clamp(0.0, MAX_TRAVEL_PROGRESS);
        self.state.travel_progress = value;
        self.events.push(StoreEvent::ProgressChanged(value));
    }

    /// Set ship health. Trigger: `value <= 0` also forces `Stage::GameOver`
    /// before this returns, whatever the current stage.
    pub fn update_ship_health(&mut self, value: i32) {
        self.state.ship_health = value.clamp(0, MAX_SHIP_HEALTH);
        self.events.push(StoreEvent::HealthChanged(self.state.ship_health));
        if value <= 0 {
            self.set_stage(Stage::GameOver);
        }
    }

    /// Apply a signed delta, saturating at zero
    pub fn add_resource(&mut self, kind: ResourceKind, delta: i64) {
        let slot = self.state.resources.get_mut(kind);
        *slot = if delta >= 0 {
            slot.saturating_add(delta.unsigned_abs())
        } else {
            slot.saturating_sub(delta.unsigned_abs())
        };
        let value = *slot;
        self.events.push(StoreEvent::ResourceChanged { kind, value });
    }

    /// Subtract, clamped at zero
    pub fn remove_resource(&mut self, kind: ResourceKind, amount: u64) {
        let slot = self.state.resources.get_mut(kind);
        *slot = slot.saturating_sub(amount);
        let value = *slot;
        self.events.push(StoreEvent::ResourceChanged { kind, value });
    }

    /// Append a building; its slot must be on the grid and free
    pub fn add_building(&mut self, building: Building) -> Result<(), GameError> {
        if building.slot >= COLONY_GRID_SLOTS {
            return Err(GameError::SlotOutOfRange {
                slot: building.slot,
                slots: COLONY_GRID_SLOTS,
            });
        }
        if self.state.building_at(building.slot).is_some() {
            return Err(GameError::SlotOccupied { slot: building.slot });
        }
        self.state.buildings.push(building);
        self.events.push(StoreEvent::BuildingPlaced(building));
        Ok(())
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.state.player_name = name.into();
        self.events.push(StoreEvent::PlayerRenamed);
    }

    /// Flip between cockpit and chase camera
    pub fn toggle_view(&mut self) {
        self.state.is_inside_view = !self.state.is_inside_view;
        self.events.push(StoreEvent::ViewToggled(self.state.is_inside_view));
    }

    pub fn set_transmission(&mut self, transmission: Option<Transmission>) {
        self.state.active_transmission = transmission;
        self.events.push(StoreEvent::TransmissionChanged);
    }

    /// Count down the active transmission, clearing it once expired
    pub fn age_transmission(&mut self, elapsed_ms: u32) {
        let expired = match self.state.active_transmission.as_mut() {
            Some(t) => {
                t.remaining_ms = t.remaining_ms.saturating_sub(elapsed_ms);
                t.remaining_ms == 0
            }
            None => false,
        };
        if expired {
            self.set_transmission(None);
        }
    }

    /// Restore every field to its initial value
    pub fn reset_game(&mut self) {
        self.state = GameState::default();
        self.events.push(StoreEvent::Reset);
        log::info!("Game reset");
    }
}
