//! Per-battle context
//!
//! Everything the reconciliation and animation stages need travels in
//! this explicit context instead of ambient shared state: territory
//! ids, dice counts, and the pre-attack troop snapshots.

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};
use crate::core::types::{Side, TerritoryId, MAX_DICE_PER_SIDE};
use crate::game::backend::BattleOutcome;
use crate::game::territory::{TerritoryMap, TroopSnapshot};

/// Aggregate losses derived from an authoritative outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLosses {
    pub attacker: u32,
    pub defender: u32,
    pub conquered: bool,
}

/// Context captured when the player confirms an attack.
///
/// Construction is the only place before-counts get recorded; a flow
/// that reaches reconciliation without one of these must abort rather
/// than guess (`BattleError::MissingBeforeCounts`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleContext {
    pub attacker: TerritoryId,
    pub defender: TerritoryId,
    pub attack_dice: u32,
    pub defense_dice: u32,
    pub attacker_before: TroopSnapshot,
    pub defender_before: TroopSnapshot,
}

impl BattleContext {
    /// Capture a context from the current map state.
    ///
    /// Fails if either territory is unknown or the dice count is not
    /// rollable from the attacker's eligible troops.
    pub fn capture(
        map: &TerritoryMap,
        attacker: TerritoryId,
        defender: TerritoryId,
        attack_dice: u32,
    ) -> Result<Self> {
        let attacker_territory = map.require(attacker)?;
        let defender_territory = map.require(defender)?;

        if attack_dice == 0
            || attack_dice > MAX_DICE_PER_SIDE
            || attack_dice > attacker_territory.max_attack_dice()
        {
            return Err(BattleError::InvalidDiceCount(attack_dice));
        }

        Ok(Self {
            attacker,
            defender,
            attack_dice,
            defense_dice: defender_territory.defense_dice(),
            attacker_before: map.snapshot(attacker)?,
            defender_before: map.snapshot(defender)?,
        })
    }

    /// Comparison slots actually contested this battle.
    pub fn comparisons(&self) -> u32 {
        self.attack_dice.min(self.defense_dice)
    }

    /// Derive per-side losses from the authoritative outcome.
    ///
    /// Fail-closed: inconsistent counts (negative loss, zero loss on
    /// both sides) abort instead of producing display data. On conquest
    /// every defending troop is removed, so the defender loss is the
    /// full before-count rather than the after-count delta.
    pub fn losses(&self, outcome: &BattleOutcome) -> Result<BattleLosses> {
        let attacker = checked_loss(
            Side::Attacker,
            self.attacker_before.armies,
            outcome.attacker_troops_after,
        )?;
        let defender = if outcome.conquered {
            self.defender_before.armies
        } else {
            checked_loss(
                Side::Defender,
                self.defender_before.armies,
                outcome.defender_troops_after,
            )?
        };

        if attacker == 0 && defender == 0 {
            return Err(BattleError::ZeroLossBothSides);
        }

        Ok(BattleLosses {
            attacker,
            defender,
            conquered: outcome.conquered,
        })
    }
}

fn checked_loss(side: Side, before: u32, after: u32) -> Result<u32> {
    if after > before {
        return Err(BattleError::NegativeLoss { side, before, after });
    }
    Ok(before - after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PlayerId;
    use crate::game::territory::Territory;

    fn context() -> BattleContext {
        let mut map = TerritoryMap::new();
        map.insert(TerritoryId(1), Territory::new(PlayerId::new(), 4));
        map.insert(TerritoryId(2), Territory::new(PlayerId::new(), 2));
        map.connect(TerritoryId(1), TerritoryId(2));
        BattleContext::capture(&map, TerritoryId(1), TerritoryId(2), 3).unwrap()
    }

    fn outcome(a_after: u32, d_after: u32, conquered: bool) -> BattleOutcome {
        BattleOutcome {
            attacker_troops_before: 4,
            attacker_troops_after: a_after,
            defender_troops_before: 2,
            defender_troops_after: d_after,
            conquered,
            rolled: None,
        }
    }

    #[test]
    fn test_capture_records_before_counts() {
        let ctx = context();
        assert_eq!(ctx.attacker_before.armies, 4);
        assert_eq!(ctx.defender_before.armies, 2);
        assert_eq!(ctx.defense_dice, 2);
        assert_eq!(ctx.comparisons(), 2);
    }

    #[test]
    fn test_capture_rejects_unrollable_dice() {
        let mut map = TerritoryMap::new();
        map.insert(TerritoryId(1), Territory::new(PlayerId::new(), 2));
        map.insert(TerritoryId(2), Territory::new(PlayerId::new(), 2));
        let err = BattleContext::capture(&map, TerritoryId(1), TerritoryId(2), 2).unwrap_err();
        assert!(matches!(err, BattleError::InvalidDiceCount(2)));
    }

    #[test]
    fn test_losses_mixed() {
        let losses = context().losses(&outcome(3, 1, false)).unwrap();
        assert_eq!(losses.attacker, 1);
        assert_eq!(losses.defender, 1);
        assert!(!losses.conquered);
    }

    #[test]
    fn test_losses_conquest_takes_full_before_count() {
        // Server reports 2 occupying troops after conquest; the
        // defender still lost all 2 defenders, not a delta.
        let losses = context().losses(&outcome(2, 2, true)).unwrap();
        assert_eq!(losses.defender, 2);
        assert!(losses.conquered);
    }

    #[test]
    fn test_losses_negative_is_error() {
        let err = context().losses(&outcome(9, 1, false)).unwrap_err();
        assert!(matches!(err, BattleError::NegativeLoss { .. }));
    }

    #[test]
    fn test_losses_zero_both_sides_is_error() {
        let err = context().losses(&outcome(4, 2, false)).unwrap_err();
        assert!(matches!(err, BattleError::ZeroLossBothSides));
    }
}
