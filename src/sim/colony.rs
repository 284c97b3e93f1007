//! Colony simulation: periodic production and construction
//!
//! Production runs on a fixed wall-clock interval. `advance` accumulates real
//! elapsed time and runs as many whole ticks as fit, up to a catch-up cap.

use super::state::{Building, Store};
use crate::GameError;
use crate::catalog::{BuildingKind, ResourceKind};
use crate::consts::COLONY_GRID_SLOTS;
use crate::tuning::ColonyTuning;

/// Outcome of one production tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColonyReport {
    pub energy_produced: u64,
    pub minerals_produced: u64,
    /// Summed habitat output. Reported for the HUD, not applied as a cap.
    pub population_capacity: u64,
    /// Net energy change requested (production minus upkeep)
    pub energy_delta: i64,
}

#[derive(Debug, Clone)]
pub struct ColonySim {
    tuning: ColonyTuning,
    accumulator_ms: f64,
    ticks: u64,
    last_building_id: u64,
}

impl ColonySim {
    pub fn new(tuning: &ColonyTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            accumulator_ms: 0.0,
            ticks: 0,
            last_building_id: 0,
        }
    }

    /// Production ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Feed wall-clock time; runs one tick per full interval
    pub fn advance(&mut self, store: &mut Store, elapsed_ms: f64) -> Vec<ColonyReport> {
        if !elapsed_ms.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", elapsed_ms);
            return Vec::new();
        }
        let interval = self.tuning.tick_interval_ms as f64;
        self.accumulator_ms += elapsed_ms.max(0.0);

        let mut reports = Vec::new();
        while self.accumulator_ms >= interval {
            if reports.len() as u32 >= self.tuning.max_catchup_ticks {
                // Drop the backlog rather than replaying it
                self.accumulator_ms %= interval;
                break;
            }
            self.accumulator_ms -= interval;
            reports.push(self.tick(store));
        }
        reports
    }

    /// Apply one round of production and upkeep
    pub fn tick(&mut self, store: &mut Store) -> ColonyReport {
        let mut report = ColonyReport::default();
        for building in &store.state().buildings {
            let spec = building.kind.spec();
            report.energy_produced += spec.production_of(ResourceKind::Energy);
            report.minerals_produced += spec.production_of(ResourceKind::Minerals);
            report.population_capacity += spec.production_of(ResourceKind::Population);
        }
        report.energy_delta = report.energy_produced as i64 - self.tuning.energy_upkeep as i64;

        store.add_resource(ResourceKind::Energy, report.energy_delta);
        store.add_resource(ResourceKind::Minerals, report.minerals_produced as i64);

        self.ticks += 1;
        log::debug!(
            "Colony tick {}: energy {:+}, minerals +{}",
            self.ticks,
            report.energy_delta,
            report.minerals_produced
        );
        report
    }

    /// Whether the stockpile covers every cost entry of `kind`
    pub fn affordable(store: &Store, kind: BuildingKind) -> bool {
        Self::check_cost(store, kind).is_ok()
    }

    /// Building currently in `slot`
    pub fn slot_occupant(store: &Store, slot: usize) -> Option<Building> {
        store.state().building_at(slot).copied()
    }

    /// Place a building, debiting its full cost. Nothing changes on error.
    pub fn build(
        &mut self,
        store: &mut Store,
        kind: BuildingKind,
        slot: usize,
        now_ms: u64,
    ) -> Result<Building, GameError> {
        if slot >= COLONY_GRID_SLOTS {
            return Err(GameError::SlotOutOfRange {
                slot,
                slots: COLONY_GRID_SLOTS,
            });
        }
        if store.state().building_at(slot).is_some() {
            return Err(GameError::SlotOccupied { slot });
        }
        Self::check_cost(store, kind)?;

        let spec = kind.spec();
        for &(resource, amount) in spec.cost {
            store.remove_resource(resource, amount);
        }

        let id = now_ms.max(self.last_building_id + 1);
        self.last_building_id = id;
        let building = Building { id, kind, slot };
        store.add_building(building)?;

        log::info!("{} constructed in slot {}", spec.name, slot);
        Ok(building)
    }

    fn check_cost(store: &Store, kind: BuildingKind) -> Result<(), GameError> {
        let resources = &store.state().resources;
        for &(resource, required) in kind.spec().cost {
            let available = resources.get(resource);
            if available < required {
                return Err(GameError::InsufficientResources {
                    kind: resource,
                    required,
                    available,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Resources;

    fn colony() -> (Store, ColonySim) {
        (Store::new(), ColonySim::new(&ColonyTuning::default()))
    }

    #[test]
    fn test_solar_array_scenario() {
        let (mut store, mut sim) = colony();
        sim.build(&mut store, BuildingKind::Solar, 0, 1_000).unwrap();
        assert_eq!(store.state().resources.minerals, 20);
        assert_eq!(store.state().resources.energy, 100);

        let report = sim.tick(&mut store);
        assert_eq!(report.energy_delta, 4);
        assert_eq!(store.state().resources.energy, 104);
        assert_eq!(store.state().resources.minerals, 20);
    }

    #[test]
    fn test_upkeep_without_buildings() {
        let (mut store, mut sim) = colony();
        sim.tick(&mut store);
        assert_eq!(store.state().resources.energy, 99);
        assert_eq!(store.state().resources.minerals, 50);
    }

    #[test]
    fn test_habitat_output_not_applied() {
        let (mut store, mut sim) = colony();
        sim.build(&mut store, BuildingKind::Habitat, 5, 1).unwrap();
        let population = store.state().resources.population;

        let report = sim.tick(&mut store);
        assert_eq!(report.population_capacity, 2);
        assert_eq!(store.state().resources.population, population);
    }

    #[test]
    fn test_insufficient_resources_changes_nothing() {
        let (mut store, mut sim) = colony();
        store.remove_resource(crate::catalog::ResourceKind::Population, 9);
        let before = store.state().clone();

        // Mine needs 2 population, only 1 left
        let err = sim.build(&mut store, BuildingKind::Mine, 2, 1).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientResources {
                kind: ResourceKind::Population,
                required: 2,
                available: 1
            }
        ));
        assert_eq!(*store.state(), before);
    }

    #[test]
    fn test_exact_cost_is_affordable() {
        let (mut store, mut sim) = colony();
        store.remove_resource(ResourceKind::Minerals, 20);
        assert!(ColonySim::affordable(&store, BuildingKind::Solar));
        sim.build(&mut store, BuildingKind::Solar, 0, 1).unwrap();
        assert_eq!(store.state().resources.minerals, 0);
        assert!(!ColonySim::affordable(&store, BuildingKind::Solar));
    }

    #[test]
    fn test_occupied_slot_rejected_without_charge() {
        let (mut store, mut sim) = colony();
        store.add_resource(ResourceKind::Minerals, 100);
        let first = sim.build(&mut store, BuildingKind::Solar, 7, 10).unwrap();
        let resources: Resources = store.state().resources;

        let err = sim.build(&mut store, BuildingKind::Solar, 7, 11).unwrap_err();
        assert!(matches!(err, GameError::SlotOccupied { slot: 7 }));
        assert_eq!(store.state().resources, resources);
        assert_eq!(ColonySim::slot_occupant(&store, 7), Some(first));
    }

    #[test]
    fn test_building_ids_unique_within_same_millisecond() {
        let (mut store, mut sim) = colony();
        store.add_resource(ResourceKind::Minerals, 100);
        let a = sim.build(&mut store, BuildingKind::Solar, 0, 500).unwrap();
        let b = sim.build(&mut store, BuildingKind::Solar, 1, 500).unwrap();
        assert_eq!(a.id, 500);
        assert_eq!(b.id, 501);
    }

    #[test]
    fn test_advance_runs_one_tick_per_interval() {
        let (mut store, mut sim) = colony();
        assert!(sim.advance(&mut store, 1999.0).is_empty());
        assert_eq!(sim.advance(&mut store, 1.0).len(), 1);
        assert_eq!(sim.advance(&mut store, 4000.0).len(), 2);
        assert_eq!(sim.ticks(), 3);
        assert_eq!(store.state().resources.energy, 97);
    }

    #[test]
    fn test_advance_ignores_non_finite_time() {
        let (mut store, mut sim) = colony();
        assert!(sim.advance(&mut store, f64::INFINITY).is_empty());
        assert!(sim.advance(&mut store, f64::NAN).is_empty());
        assert_eq!(sim.advance(&mut store, 2000.0).len(), 1);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_advance_caps_catch_up() {
        let (mut store, mut sim) = colony();
        let reports = sim.advance(&mut store, 60_000.0);
        assert_eq!(reports.len(), 5);
        assert!(sim.advance(&mut store, 0.0).is_empty());
    }
}
