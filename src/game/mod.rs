//! Campaign map state and the backend seam

pub mod backend;
pub mod territory;

pub use backend::{AttackBackend, BattleOutcome, BattleRequest, LocalBackend, RolledDice};
pub use territory::{Territory, TerritoryMap, TroopSnapshot};
