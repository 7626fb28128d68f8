use thiserror::Error;

use crate::core::types::{Side, TerritoryId};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Territory not found: {0:?}")]
    TerritoryNotFound(TerritoryId),

    #[error("No pre-attack troop snapshot recorded for this battle")]
    MissingBeforeCounts,

    #[error("Troop counts imply a negative loss ({side:?}: {before} before, {after} after)")]
    NegativeLoss { side: Side, before: u32, after: u32 },

    #[error("Battle outcome reports zero losses on both sides")]
    ZeroLossBothSides,

    #[error("Invalid dice count: {0}")]
    InvalidDiceCount(u32),

    #[error("A battle animation is already in progress")]
    BattleInProgress,

    #[error("An attack request is already in flight")]
    AttackInFlight,

    #[error("Selection flow does not allow {0} in its current state")]
    InvalidSelection(&'static str),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
