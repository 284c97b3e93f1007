//! Static game data: destination planets and colony building types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Colony currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Energy,
    Minerals,
    Population,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Energy,
        ResourceKind::Minerals,
        ResourceKind::Population,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Energy => "energy",
            ResourceKind::Minerals => "minerals",
            ResourceKind::Population => "population",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partial resource mapping; kinds not listed count as zero
pub type ResourceAmounts = &'static [(ResourceKind, u64)];

/// Look up one kind in a partial mapping
pub fn amount_of(amounts: ResourceAmounts, kind: ResourceKind) -> u64 {
    amounts
        .iter()
        .filter(|(k, _)| *k == kind)
        .map(|(_, n)| *n)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Normalized planet survey values, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanetStats {
    pub habitability: u8,
    pub resources: u8,
    pub threat: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanetId {
    Terran,
    Ice,
    Volcanic,
}

impl PlanetId {
    pub const ALL: [PlanetId; 3] = [PlanetId::Terran, PlanetId::Ice, PlanetId::Volcanic];

    pub fn planet(&self) -> &'static Planet {
        match self {
            PlanetId::Terran => &PLANETS[0],
            PlanetId::Ice => &PLANETS[1],
            PlanetId::Volcanic => &PLANETS[2],
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.planet().key
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

/// A destination in the planet selector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Planet {
    pub id: PlanetId,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub distance_ly: f32,
    pub distance_label: &'static str,
    pub difficulty: Difficulty,
    pub stats: PlanetStats,
}

pub static PLANETS: [Planet; 3] = [
    Planet {
        id: PlanetId::Terran,
        key: "terran",
        name: "Neo Terra",
        description: "A lush, Earth-like paradise. Ideal for rapid colonization, but scarce in rare minerals.",
        distance_ly: 4.2,
        distance_label: "4.2 Light Years",
        difficulty: Difficulty::Easy,
        stats: PlanetStats {
            habitability: 95,
            resources: 40,
            threat: 10,
        },
    },
    Planet {
        id: PlanetId::Ice,
        key: "ice",
        name: "Cryo Prime",
        description: "A frozen wasteland rich in ancient isotopes. Survival requires advanced thermal tech.",
        distance_ly: 12.0,
        distance_label: "12 Light Years",
        difficulty: Difficulty::Medium,
        stats: PlanetStats {
            habitability: 30,
            resources: 80,
            threat: 50,
        },
    },
    Planet {
        id: PlanetId::Volcanic,
        key: "volcanic",
        name: "Ignis IV",
        description: "A volatile world of magma and ash. Extreme energy potential, but highly dangerous.",
        distance_ly: 25.0,
        distance_label: "25 Light Years",
        difficulty: Difficulty::Hard,
        stats: PlanetStats {
            habitability: 10,
            resources: 100,
            threat: 90,
        },
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    Habitat,
    Solar,
    Mine,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 3] = [BuildingKind::Habitat, BuildingKind::Solar, BuildingKind::Mine];

    pub fn spec(&self) -> &'static BuildingType {
        match self {
            BuildingKind::Habitat => &BUILDING_TYPES[0],
            BuildingKind::Solar => &BUILDING_TYPES[1],
            BuildingKind::Mine => &BUILDING_TYPES[2],
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.spec().key
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// Construction cost and per-tick output of one building kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuildingType {
    pub kind: BuildingKind,
    pub key: &'static str,
    pub name: &'static str,
    pub cost: ResourceAmounts,
    pub production: ResourceAmounts,
    pub description: &'static str,
}

impl BuildingType {
    pub fn cost_of(&self, kind: ResourceKind) -> u64 {
        amount_of(self.cost, kind)
    }

    pub fn production_of(&self, kind: ResourceKind) -> u64 {
        amount_of(self.production, kind)
    }
}

pub static BUILDING_TYPES: [BuildingType; 3] = [
    BuildingType {
        kind: BuildingKind::Habitat,
        key: "habitat",
        name: "Living Pod",
        cost: &[(ResourceKind::Energy, 20), (ResourceKind::Minerals, 50)],
        production: &[(ResourceKind::Population, 2)],
        description: "Increases max population.",
    },
    BuildingType {
        kind: BuildingKind::Solar,
        key: "solar",
        name: "Solar Array",
        cost: &[(ResourceKind::Minerals, 30)],
        production: &[(ResourceKind::Energy, 5)],
        description: "Generates passive energy.",
    },
    BuildingType {
        kind: BuildingKind::Mine,
        key: "mine",
        name: "Auto-Miner",
        cost: &[(ResourceKind::Energy, 30), (ResourceKind::Population, 2)],
        production: &[(ResourceKind::Minerals, 3)],
        description: "Extracts minerals from the ground.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup_matches_index() {
        for id in PlanetId::ALL {
            assert_eq!(id.planet().id, id);
            assert_eq!(PlanetId::from_str(id.as_str()), Some(id));
        }
        for kind in BuildingKind::ALL {
            assert_eq!(kind.spec().kind, kind);
            assert_eq!(BuildingKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_partial_mapping_defaults_to_zero() {
        let solar = BuildingKind::Solar.spec();
        assert_eq!(solar.cost_of(ResourceKind::Minerals), 30);
        assert_eq!(solar.cost_of(ResourceKind::Energy), 0);
        assert_eq!(solar.production_of(ResourceKind::Energy), 5);
        assert_eq!(solar.production_of(ResourceKind::Population), 0);
    }

    #[test]
    fn test_planet_stats_in_range() {
        for planet in &PLANETS {
            assert!(planet.stats.habitability <= 100);
            assert!(planet.stats.resources <= 100);
            assert!(planet.stats.threat <= 100);
        }
    }
}
