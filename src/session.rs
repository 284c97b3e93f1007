//! Session: the store plus whichever simulation the current stage mounts
//!
//! The host calls `frame` once per rendered frame and `dispatch` for every
//! click. Loops live only while their stage is mounted; leaving the stage drops
//! them.

use crate::Viewport;
use crate::catalog::{BuildingKind, PlanetId};
use crate::error::GameError;
use crate::router::{Screen, StageRouter, Transition};
use crate::sim::{ColonySim, GameState, Stage, Store, StoreEvent, TravelInput, TravelLoop};
use crate::tuning::Tuning;

/// Player actions coming from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Intro → planet selection
    BeginMission,
    /// Pick a destination and launch
    ChoosePlanet(PlanetId),
    /// Cockpit / chase camera
    ToggleView,
    Build { kind: BuildingKind, slot: usize },
    /// Start over from the intro
    Restart,
    Rename(String),
}

pub struct Session {
    store: Store,
    router: StageRouter,
    tuning: Tuning,
    seed: u64,
    trips: u64,
    travel: Option<TravelLoop>,
    colony: Option<ColonySim>,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut session = Self {
            store: Store::new(),
            router: StageRouter::new(),
            tuning,
            seed,
            trips: 0,
            travel: None,
            colony: None,
        };
        session.sync_router();
        session
    }

    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn screen(&self) -> Option<Screen> {
        self.router.mounted()
    }

    pub fn travel(&self) -> Option<&TravelLoop> {
        self.travel.as_ref()
    }

    pub fn colony(&self) -> Option<&ColonySim> {
        self.colony.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.store.drain_events()
    }

    /// JSON snapshot of the game state for the HUD
    pub fn snapshot_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self.store.state())?)
    }

    fn require_stage(&self, expected: Stage) -> Result<(), GameError> {
        let actual = self.store.state().stage;
        if actual != expected {
            return Err(GameError::WrongStage { expected, actual });
        }
        Ok(())
    }

    /// Apply a player intent. Rejections leave the state untouched.
    pub fn dispatch(&mut self, intent: Intent, now_ms: u64) -> Result<(), GameError> {
        match intent {
            Intent::BeginMission => {
                self.require_stage(Stage::Intro)?;
                self.store.set_stage(Stage::PlanetSelection);
            }
            Intent::ChoosePlanet(planet) => {
                self.require_stage(Stage::PlanetSelection)?;
                self.store.select_planet(planet);
                self.store.set_stage(Stage::Travel);
            }
            Intent::ToggleView => self.store.toggle_view(),
            Intent::Build { kind, slot } => {
                self.require_stage(Stage::Civilization)?;
                let colony = self
                    .colony
                    .get_or_insert_with(|| ColonySim::new(&self.tuning.colony));
                if let Err(e) = colony.build(&mut self.store, kind, slot, now_ms) {
                    log::warn!("Construction rejected: {}", e);
                    return Err(e);
                }
            }
            Intent::Restart => self.store.reset_game(),
            Intent::Rename(name) => self.store.set_player_name(name),
        }
        self.sync_router();
        Ok(())
    }

    /// One rendered frame: step whatever is mounted, age the transmission
    pub fn frame(&mut self, input: &TravelInput, viewport: Viewport, elapsed_ms: f64) {
        self.sync_router();

        if let Some(travel) = self.travel.as_mut() {
            travel.step(&mut self.store, input, viewport);
        }
        if let Some(colony) = self.colony.as_mut() {
            colony.advance(&mut self.store, elapsed_ms);
        }
        self.store.age_transmission(elapsed_ms.max(0.0) as u32);

        // Mount what this frame's mutations asked for
        self.sync_router();
    }

    fn sync_router(&mut self) {
        if let Some(transition) = self.router.sync(self.store.state().stage) {
            self.apply_transition(transition);
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition.unmount {
            Some(Screen::TravelMinigame) => self.travel = None,
            Some(Screen::ColonyBuilder) => self.colony = None,
            _ => {}
        }
        match transition.mount {
            Screen::TravelMinigame => {
                // Every trip starts from zero with a fresh obstacle stream
                self.store.update_travel_progress(0.0);
                self.trips += 1;
                let seed = self.seed.wrapping_add(self.trips.wrapping_mul(2654435761));
                self.travel = Some(TravelLoop::new(seed, &self.tuning.travel, &self.store));
            }
            Screen::ColonyBuilder => {
                if self.colony.is_none() {
                    self.colony = Some(ColonySim::new(&self.tuning.colony));
                }
            }
            _ => {}
        }
    }
}
