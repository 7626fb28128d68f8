//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a territory on the campaign map.
///
/// Territory ids are assigned by the backend and stable for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerritoryId(pub u32);

impl TerritoryId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Monotonic identifier for a single battle animation.
///
/// Issued by the animation orchestrator; a stale id can never match a
/// live battle, which is what guards against duplicate spawns and late
/// completion callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BattleId(pub u64);

/// Which side of a battle a die (or a loss) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// Maximum dice either side may roll in one battle
pub const MAX_DICE_PER_SIDE: u32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_territory_id_equality() {
        let a = TerritoryId(7);
        let b = TerritoryId(7);
        let c = TerritoryId(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_territory_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<TerritoryId, &str> = HashMap::new();
        map.insert(TerritoryId(3), "kamchatka");
        assert_eq!(map.get(&TerritoryId(3)), Some(&"kamchatka"));
    }

    #[test]
    fn test_battle_id_ordering() {
        // Later battles always compare greater - the staleness guard
        // relies on this.
        assert!(BattleId(2) > BattleId(1));
        assert_ne!(BattleId(1), BattleId(2));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Attacker.opponent(), Side::Defender);
        assert_eq!(Side::Defender.opponent(), Side::Attacker);
    }
}
