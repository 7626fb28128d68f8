//! Backend attack interface
//!
//! The transport (REST, message bus) lives outside this crate; battles
//! only depend on the `AttackBackend` seam. `LocalBackend` is an
//! in-process authoritative implementation used by the demo binary and
//! the integration tests.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};
use crate::core::types::{TerritoryId, MAX_DICE_PER_SIDE};
use crate::game::territory::TerritoryMap;

/// Attack request sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    pub attacker: TerritoryId,
    pub defender: TerritoryId,
    /// 1-3, bounded by the attacker's eligible static troops.
    pub attack_dice: u32,
}

/// Individual die values, when the server chooses to reveal them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolledDice {
    pub attacker: Vec<u8>,
    pub defender: Vec<u8>,
}

/// Authoritative battle result.
///
/// In the general flow only the aggregate counts arrive; `rolled` is
/// populated by backends that reveal per-die values, in which case the
/// client animates those instead of synthesizing its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleOutcome {
    pub attacker_troops_before: u32,
    pub attacker_troops_after: u32,
    pub defender_troops_before: u32,
    pub defender_troops_after: u32,
    pub conquered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolled: Option<RolledDice>,
}

/// The backend seam the battle flow drives.
pub trait AttackBackend {
    fn attack(
        &mut self,
        request: &BattleRequest,
    ) -> impl std::future::Future<Output = Result<BattleOutcome>> + Send;
}

/// In-process authoritative backend.
///
/// Owns its own copy of the map and resolves attacks with real dice,
/// exactly the comparison the real server performs: both sides sorted
/// descending, pairwise compare, ties go to the defender.
#[derive(Debug)]
pub struct LocalBackend<R: Rng> {
    map: TerritoryMap,
    rng: R,
    /// Reveal per-die values in the outcome (the preferred long-term
    /// server behavior) instead of aggregate counts only.
    pub reveal_dice: bool,
}

impl<R: Rng + Send> LocalBackend<R> {
    pub fn new(map: TerritoryMap, rng: R) -> Self {
        Self {
            map,
            rng,
            reveal_dice: false,
        }
    }

    pub fn map(&self) -> &TerritoryMap {
        &self.map
    }

    fn roll_sorted(&mut self, count: u32) -> Vec<u8> {
        let mut dice: Vec<u8> = (0..count).map(|_| self.rng.gen_range(1..=6)).collect();
        dice.sort_unstable_by(|a, b| b.cmp(a));
        dice
    }

    fn resolve(&mut self, request: &BattleRequest) -> Result<BattleOutcome> {
        let attacker = self.map.require(request.attacker)?.clone();
        let defender = self.map.require(request.defender)?.clone();

        if request.attack_dice == 0
            || request.attack_dice > MAX_DICE_PER_SIDE
            || request.attack_dice > attacker.max_attack_dice()
        {
            return Err(BattleError::InvalidDiceCount(request.attack_dice));
        }

        let defense_dice = defender.defense_dice();
        let attack_roll = self.roll_sorted(request.attack_dice);
        let defense_roll = self.roll_sorted(defense_dice);

        let mut attacker_loss = 0u32;
        let mut defender_loss = 0u32;
        for (a, d) in attack_roll.iter().zip(defense_roll.iter()) {
            if a > d {
                defender_loss += 1;
            } else {
                attacker_loss += 1;
            }
        }

        let attacker_before = attacker.total_armies();
        let defender_before = defender.total_armies();
        let defender_after_losses = defender_before.saturating_sub(defender_loss);
        let conquered = defender_after_losses == 0;

        // On conquest the surviving attack dice's worth of troops march
        // in; the attacker territory keeps the rest.
        let marching = if conquered {
            request.attack_dice.saturating_sub(attacker_loss)
        } else {
            0
        };
        let attacker_after = attacker_before - attacker_loss - marching;
        let defender_after = if conquered {
            marching
        } else {
            defender_after_losses
        };

        let outcome = BattleOutcome {
            attacker_troops_before: attacker_before,
            attacker_troops_after: attacker_after,
            defender_troops_before: defender_before,
            defender_troops_after: defender_after,
            conquered,
            rolled: self.reveal_dice.then(|| RolledDice {
                attacker: attack_roll,
                defender: defense_roll,
            }),
        };

        self.map
            .apply_outcome(request.attacker, request.defender, &outcome)?;
        tracing::info!(
            ?request,
            attacker_loss,
            defender_loss,
            conquered,
            "local backend resolved attack"
        );
        Ok(outcome)
    }
}

impl<R: Rng + Send> AttackBackend for LocalBackend<R> {
    async fn attack(&mut self, request: &BattleRequest) -> Result<BattleOutcome> {
        self.resolve(request)
    }
}
