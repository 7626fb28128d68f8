//! Dice-count and loss reconciliation
//!
//! The backend reports aggregate losses, not individual die values, so
//! the animation has to fabricate a roll that reproduces them. The
//! fabricated dice are cosmetic only; the outcome already applied to
//! the map is the authority.
//!
//! Displayed dice are ranked highest-to-lowest on each side and the
//! top pairs compared, so the generated lists must reproduce the loss
//! counts *after* sorting, extra uncompared dice included. Independent
//! sorting can reshuffle which values land in the compared slots, so
//! generation resamples until the ranked comparison checks out, with a
//! constructive fallback that always does.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::context::{BattleContext, BattleLosses};
use crate::core::error::{BattleError, Result};
use crate::game::backend::BattleOutcome;

/// Resampling bound before the constructive fallback kicks in.
/// With at most 3 comparison slots a valid sample almost always shows
/// up within the first few attempts.
const MAX_SAMPLE_ATTEMPTS: u32 = 32;

/// A fabricated roll consistent with the reported losses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRoll {
    /// Attacker die values, sorted descending.
    pub attacker: Vec<u8>,
    /// Defender die values, sorted descending.
    pub defender: Vec<u8>,
    /// The unclamped losses, for the HUD counters.
    pub losses: BattleLosses,
}

impl ReconciledRoll {
    /// Count (attacker wins, defender wins-or-ties) over the ranked
    /// comparison pairs.
    pub fn ranked_wins(&self) -> (u32, u32) {
        ranked_wins(&self.attacker, &self.defender)
    }
}

fn ranked_wins(attacker: &[u8], defender: &[u8]) -> (u32, u32) {
    let mut attacker_wins = 0;
    let mut defender_wins = 0;
    for (a, d) in attacker.iter().zip(defender.iter()) {
        if a > d {
            attacker_wins += 1;
        } else {
            defender_wins += 1;
        }
    }
    (attacker_wins, defender_wins)
}

fn sort_descending(dice: &mut [u8]) {
    dice.sort_unstable_by(|a, b| b.cmp(a));
}

/// Fabricate die values for the reported losses.
///
/// `losses` may exceed the comparison slots on the defender side (full
/// conquest removes every defending troop); pair generation clamps to
/// the slots and keeps the original counts for display.
pub fn reconcile(
    attack_dice: u32,
    defense_dice: u32,
    losses: BattleLosses,
    rng: &mut impl Rng,
) -> Result<ReconciledRoll> {
    if attack_dice == 0 || attack_dice > 3 {
        return Err(BattleError::InvalidDiceCount(attack_dice));
    }
    if defense_dice == 0 || defense_dice > 3 {
        return Err(BattleError::InvalidDiceCount(defense_dice));
    }
    if losses.attacker == 0 && losses.defender == 0 {
        return Err(BattleError::ZeroLossBothSides);
    }

    let comparisons = attack_dice.min(defense_dice);
    // Conquest can report more defender losses than contested slots;
    // clamp for pair generation and rebalance so the pair counts sum
    // to the comparisons exactly.
    let defender_loss = losses.defender.min(comparisons);
    let attacker_loss = comparisons - defender_loss;

    let attacker_extra = attack_dice - comparisons;
    let defender_extra = defense_dice - comparisons;

    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let mut attacker = Vec::with_capacity(attack_dice as usize);
        let mut defender = Vec::with_capacity(defense_dice as usize);

        // Slots the attacker won: attacker strictly higher.
        for _ in 0..defender_loss {
            let d = rng.gen_range(1..=5u8);
            attacker.push(rng.gen_range(d + 1..=6u8));
            defender.push(d);
        }
        // Slots the defender won or tied: defender at least as high.
        for _ in 0..attacker_loss {
            let a = rng.gen_range(1..=6u8);
            attacker.push(a);
            defender.push(rng.gen_range(a..=6u8));
        }
        // Uncompared extra dice roll free.
        for _ in 0..attacker_extra {
            attacker.push(rng.gen_range(1..=6u8));
        }
        for _ in 0..defender_extra {
            defender.push(rng.gen_range(1..=6u8));
        }

        sort_descending(&mut attacker);
        sort_descending(&mut defender);

        if ranked_wins(&attacker, &defender) == (defender_loss, attacker_loss) {
            return Ok(ReconciledRoll {
                attacker,
                defender,
                losses,
            });
        }
    }

    // Constructive fallback: 6-over-5 for every attacker win, 1-on-1
    // for every defender win, extras pinned to 1 so sorting cannot
    // promote them into a compared slot.
    let mut attacker: Vec<u8> = Vec::with_capacity(attack_dice as usize);
    let mut defender: Vec<u8> = Vec::with_capacity(defense_dice as usize);
    attacker.extend(std::iter::repeat(6).take(defender_loss as usize));
    attacker.extend(std::iter::repeat(1).take((attacker_loss + attacker_extra) as usize));
    defender.extend(std::iter::repeat(5).take(defender_loss as usize));
    defender.extend(std::iter::repeat(1).take((attacker_loss + defender_extra) as usize));

    debug_assert_eq!(ranked_wins(&attacker, &defender), (defender_loss, attacker_loss));
    Ok(ReconciledRoll {
        attacker,
        defender,
        losses,
    })
}

/// Reconcile an authoritative outcome into displayable dice.
///
/// This is the single entry point the attack flow calls once the
/// server result arrives. Server-revealed die values take precedence
/// over fabrication; a missing context (no recorded before-counts)
/// aborts fail-closed.
pub fn reconcile_outcome(
    context: Option<&BattleContext>,
    outcome: &BattleOutcome,
    rng: &mut impl Rng,
) -> Result<ReconciledRoll> {
    let context = context.ok_or(BattleError::MissingBeforeCounts)?;
    let losses = context.losses(outcome)?;

    if let Some(rolled) = &outcome.rolled {
        let mut attacker = rolled.attacker.clone();
        let mut defender = rolled.defender.clone();
        sort_descending(&mut attacker);
        sort_descending(&mut defender);
        tracing::debug!("server revealed die values, skipping fabrication");
        return Ok(ReconciledRoll {
            attacker,
            defender,
            losses,
        });
    }

    reconcile(context.attack_dice, context.defense_dice, losses, rng)
}
