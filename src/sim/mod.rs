//! Game simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - `state`: the store and its actions
//! - `travel`: per-frame asteroid dodge loop
//! - `colony`: fixed-interval production and construction

pub mod collision;
pub mod colony;
pub mod state;
pub mod travel;

pub use collision::ship_obstacle_hit;
pub use colony::{ColonyReport, ColonySim};
pub use state::{
    Building, GameState, Resources, Stage, Store, StoreEvent, Transmission, TransmissionKind,
};
pub use travel::{Obstacle, TravelInput, TravelLoop, TravelPhase};
