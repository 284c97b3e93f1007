//! Recoverable game errors
//!
//! None of these end a run. The host shows them as a notice and carries on.

use thiserror::Error;

use crate::catalog::ResourceKind;
use crate::sim::Stage;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("insufficient {kind}: need {required}, have {available}")]
    InsufficientResources {
        kind: ResourceKind,
        required: u64,
        available: u64,
    },
    #[error("slot {slot} is already occupied")]
    SlotOccupied { slot: usize },
    #[error("slot {slot} is outside the {slots}-slot colony grid")]
    SlotOutOfRange { slot: usize, slots: usize },
    #[error("action requires stage {expected:?}, current stage is {actual:?}")]
    WrongStage { expected: Stage, actual: Stage },
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
    #[error("failed to parse tuning JSON: {0}")]
    TuningParse(#[from] serde_json::Error),
}
