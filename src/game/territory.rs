//! Territory map state
//!
//! The backend is the only authority over ownership and troop counts.
//! The client mutates this map exclusively by applying server-confirmed
//! outcomes; everything else reads it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};
use crate::core::types::{PlayerId, TerritoryId, MAX_DICE_PER_SIDE};
use crate::game::backend::BattleOutcome;

/// One territory on the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Territory {
    pub owner: PlayerId,
    /// Troops that have not moved this turn. Only these can roll
    /// attack dice.
    pub static_armies: u32,
    /// Troops moved into this territory during the current turn. They
    /// cannot attack, but they do hold the territory, which frees the
    /// static troops to commit fully.
    pub moved_in_armies: u32,
}

impl Territory {
    pub fn new(owner: PlayerId, static_armies: u32) -> Self {
        Self {
            owner,
            static_armies,
            moved_in_armies: 0,
        }
    }

    pub fn total_armies(&self) -> u32 {
        self.static_armies + self.moved_in_armies
    }

    /// Can this territory initiate an attack?
    ///
    /// Either more than one static troop (one must stay behind), or at
    /// least one moved-in troop holding the fort so every static troop
    /// may attack.
    pub fn can_attack(&self) -> bool {
        self.static_armies > 1 || (self.static_armies >= 1 && self.moved_in_armies >= 1)
    }

    /// Upper bound on attack dice this territory can roll.
    pub fn max_attack_dice(&self) -> u32 {
        let committable = if self.moved_in_armies >= 1 {
            self.static_armies
        } else {
            self.static_armies.saturating_sub(1)
        };
        committable.min(MAX_DICE_PER_SIDE)
    }

    /// Dice the territory rolls when defending.
    pub fn defense_dice(&self) -> u32 {
        self.total_armies().min(MAX_DICE_PER_SIDE)
    }
}

/// Troop counts captured immediately before an attack request is sent.
///
/// Reconciliation needs before-counts even when the server response
/// omits them, so the flow records a snapshot at confirm time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroopSnapshot {
    pub territory: TerritoryId,
    pub armies: u32,
}

/// The full territory map, keyed by territory id, with adjacency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerritoryMap {
    territories: HashMap<TerritoryId, Territory>,
    adjacency: HashMap<TerritoryId, Vec<TerritoryId>>,
}

impl TerritoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TerritoryId, territory: Territory) {
        self.territories.insert(id, territory);
    }

    /// Register a two-way border between territories.
    pub fn connect(&mut self, a: TerritoryId, b: TerritoryId) {
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    pub fn get(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(&id)
    }

    pub fn require(&self, id: TerritoryId) -> Result<&Territory> {
        self.territories
            .get(&id)
            .ok_or(BattleError::TerritoryNotFound(id))
    }

    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.adjacency
            .get(&a)
            .map(|ns| ns.contains(&b))
            .unwrap_or(false)
    }

    pub fn snapshot(&self, id: TerritoryId) -> Result<TroopSnapshot> {
        let territory = self.require(id)?;
        Ok(TroopSnapshot {
            territory: id,
            armies: territory.total_armies(),
        })
    }

    /// Apply a server-confirmed battle outcome.
    ///
    /// On conquest the defender territory flips to the attacker's owner
    /// and is garrisoned by the troops the server reports surviving
    /// there; they count as moved-in and cannot attack again this turn.
    pub fn apply_outcome(
        &mut self,
        attacker: TerritoryId,
        defender: TerritoryId,
        outcome: &BattleOutcome,
    ) -> Result<()> {
        let attacker_owner = self.require(attacker)?.owner;

        {
            let t = self
                .territories
                .get_mut(&attacker)
                .ok_or(BattleError::TerritoryNotFound(attacker))?;
            t.static_armies = outcome.attacker_troops_after.min(t.total_armies());
            t.moved_in_armies = 0;
        }

        let t = self
            .territories
            .get_mut(&defender)
            .ok_or(BattleError::TerritoryNotFound(defender))?;
        if outcome.conquered {
            t.owner = attacker_owner;
            t.static_armies = 0;
            t.moved_in_armies = outcome.defender_troops_after;
        } else {
            t.static_armies = outcome.defender_troops_after.min(t.static_armies);
            t.moved_in_armies = outcome
                .defender_troops_after
                .saturating_sub(t.static_armies);
        }

        tracing::debug!(
            ?attacker,
            ?defender,
            conquered = outcome.conquered,
            "applied battle outcome"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_2(a_armies: u32) -> (TerritoryMap, TerritoryId, TerritoryId, PlayerId, PlayerId) {
        let red = PlayerId::new();
        let blue = PlayerId::new();
        let a = TerritoryId(1);
        let d = TerritoryId(2);
        let mut map = TerritoryMap::new();
        map.insert(a, Territory::new(red, a_armies));
        map.insert(d, Territory::new(blue, 2));
        map.connect(a, d);
        (map, a, d, red, blue)
    }

    #[test]
    fn test_attack_eligibility() {
        let red = PlayerId::new();
        let mut lone = Territory::new(red, 1);
        assert!(!lone.can_attack());
        assert_eq!(lone.max_attack_dice(), 0);

        // A moved-in garrison frees the single static troop.
        lone.moved_in_armies = 1;
        assert!(lone.can_attack());
        assert_eq!(lone.max_attack_dice(), 1);

        let strong = Territory::new(red, 5);
        assert!(strong.can_attack());
        assert_eq!(strong.max_attack_dice(), 3);
    }

    #[test]
    fn test_defense_dice_capped() {
        let blue = PlayerId::new();
        assert_eq!(Territory::new(blue, 1).defense_dice(), 1);
        assert_eq!(Territory::new(blue, 2).defense_dice(), 2);
        assert_eq!(Territory::new(blue, 9).defense_dice(), 3);
    }

    #[test]
    fn test_adjacency_two_way() {
        let (map, a, d, _, _) = map_2(3);
        assert!(map.are_adjacent(a, d));
        assert!(map.are_adjacent(d, a));
        assert!(!map.are_adjacent(a, TerritoryId(99)));
    }

    #[test]
    fn test_snapshot_missing_territory() {
        let (map, _, _, _, _) = map_2(3);
        assert!(matches!(
            map.snapshot(TerritoryId(42)),
            Err(BattleError::TerritoryNotFound(TerritoryId(42)))
        ));
    }

    #[test]
    fn test_apply_conquest_flips_owner() {
        let (mut map, a, d, red, _blue) = map_2(4);
        let outcome = BattleOutcome {
            attacker_troops_before: 4,
            attacker_troops_after: 3,
            defender_troops_before: 2,
            defender_troops_after: 3,
            conquered: true,
            rolled: None,
        };
        map.apply_outcome(a, d, &outcome).unwrap();
        let defender = map.get(d).unwrap();
        assert_eq!(defender.owner, red);
        assert_eq!(defender.moved_in_armies, 3);
        assert_eq!(defender.static_armies, 0);
        // Occupying troops have moved this turn and cannot attack on.
        assert_eq!(defender.max_attack_dice(), 0);
    }
}
