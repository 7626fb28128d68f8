pub mod config;
pub mod error;
pub mod types;

pub use config::DiceSceneConfig;
pub use error::{BattleError, Result};
pub use types::{BattleId, PlayerId, Side, TerritoryId, MAX_DICE_PER_SIDE};
