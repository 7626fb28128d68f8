//! Battle animation orchestration
//!
//! Sequences one battle's visible life: dice spawn with random
//! impulses (`Rolling`), faces get read once the tray settles or the
//! roll window expires (`Settling` holds them on screen briefly), and
//! the final value arrays are reported exactly once. Driven by the
//! caller's render loop through [`BattleAnimator::update`]; there are
//! no internal timers or threads.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::reconcile::ReconciledRoll;
use crate::core::config::DiceSceneConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{BattleId, Side, MAX_DICE_PER_SIDE};
use crate::dice::body::Die;
use crate::dice::simulation::{DiceWorld, DiePlan};

/// Phase of the running animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationPhase {
    Rolling,
    Settling,
}

/// Final per-side values, reported once per battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub battle: BattleId,
    pub attacker_values: Vec<u8>,
    pub defender_values: Vec<u8>,
}

#[derive(Debug)]
struct ActiveBattle {
    id: BattleId,
    phase: AnimationPhase,
    elapsed: f32,
    world: DiceWorld,
    resolved: Option<(Vec<u8>, Vec<u8>)>,
}

/// The battle animation state machine.
///
/// At most one battle runs at a time; battle ids are monotonic, so a
/// cancelled or finished battle can never have a report attributed to
/// a later one.
#[derive(Debug)]
pub struct BattleAnimator {
    config: DiceSceneConfig,
    next_battle: u64,
    active: Option<ActiveBattle>,
}

impl BattleAnimator {
    pub fn new(config: DiceSceneConfig) -> Self {
        Self {
            config,
            next_battle: 0,
            active: None,
        }
    }

    /// Begin a battle animation.
    ///
    /// With `predetermined` values (reconciled or server-revealed) the
    /// dice still tumble for spectacle, but every face is forced so the
    /// landing always reads the right value. Without them the physics
    /// decides, which is the free-roll scene.
    ///
    /// Rejected while a battle is still rolling or settling; the
    /// caller's duplicate confirm clicks must not double-spawn.
    pub fn start_battle(
        &mut self,
        attack_dice: u32,
        defense_dice: u32,
        predetermined: Option<(&[u8], &[u8])>,
        rng: &mut impl Rng,
    ) -> Result<BattleId> {
        if self.active.is_some() {
            return Err(BattleError::BattleInProgress);
        }
        if attack_dice == 0 || attack_dice > MAX_DICE_PER_SIDE {
            return Err(BattleError::InvalidDiceCount(attack_dice));
        }
        if defense_dice == 0 || defense_dice > MAX_DICE_PER_SIDE {
            return Err(BattleError::InvalidDiceCount(defense_dice));
        }
        if let Some((attacker, defender)) = predetermined {
            if attacker.len() != attack_dice as usize || defender.len() != defense_dice as usize {
                return Err(BattleError::InvalidDiceCount(attacker.len() as u32));
            }
        }

        let mut plans = Vec::with_capacity((attack_dice + defense_dice) as usize);
        for i in 0..attack_dice as usize {
            plans.push(DiePlan {
                side: Side::Attacker,
                forced: predetermined.map(|(a, _)| a[i]),
            });
        }
        for i in 0..defense_dice as usize {
            plans.push(DiePlan {
                side: Side::Defender,
                forced: predetermined.map(|(_, d)| d[i]),
            });
        }

        let id = BattleId(self.next_battle);
        self.next_battle += 1;

        let mut world = DiceWorld::new(self.config.clone());
        world.spawn(&plans, rng);
        self.active = Some(ActiveBattle {
            id,
            phase: AnimationPhase::Rolling,
            elapsed: 0.0,
            world,
            resolved: None,
        });
        tracing::info!(?id, attack_dice, defense_dice, "battle animation started");
        Ok(id)
    }

    /// Start a battle straight from a reconciled roll.
    pub fn start_reconciled(
        &mut self,
        roll: &ReconciledRoll,
        rng: &mut impl Rng,
    ) -> Result<BattleId> {
        self.start_battle(
            roll.attacker.len() as u32,
            roll.defender.len() as u32,
            Some((&roll.attacker, &roll.defender)),
            rng,
        )
    }

    /// Advance the animation one frame.
    ///
    /// Returns the final report exactly once, on the frame the battle
    /// completes; `None` on every other frame, including when idle.
    pub fn update(&mut self, dt: f32) -> Option<BattleReport> {
        let active = self.active.as_mut()?;
        active.elapsed += dt;

        match active.phase {
            AnimationPhase::Rolling => {
                active.world.step(dt);
                let window_over = active.elapsed >= self.config.roll_duration;
                if window_over || active.world.all_at_rest() {
                    if window_over && !active.world.all_at_rest() {
                        tracing::warn!(id = ?active.id, "roll window expired before rest, forcing resolution");
                    }
                    active.resolved = Some(read_values(active.world.dice()));
                    active.phase = AnimationPhase::Settling;
                    active.elapsed = 0.0;
                    tracing::debug!(id = ?active.id, "dice settled");
                }
                None
            }
            AnimationPhase::Settling => {
                if active.elapsed < self.config.settle_delay {
                    return None;
                }
                let finished = self.active.take()?;
                let (attacker_values, defender_values) =
                    finished.resolved.unwrap_or_else(|| read_values(finished.world.dice()));
                let report = BattleReport {
                    battle: finished.id,
                    attacker_values,
                    defender_values,
                };
                tracing::info!(id = ?finished.id, "battle animation complete");
                Some(report)
            }
        }
    }

    /// Drop the running battle, if any. No report will ever fire for
    /// it: pending phases are cleared and the id is burned.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::info!(id = ?active.id, "battle animation cancelled");
        }
    }

    /// Live dice poses for the rendering layer. Empty while idle.
    pub fn dice(&self) -> &[Die] {
        self.active
            .as_ref()
            .map(|a| a.world.dice())
            .unwrap_or(&[])
    }

    pub fn phase(&self) -> Option<AnimationPhase> {
        self.active.as_ref().map(|a| a.phase)
    }

    pub fn current_battle(&self) -> Option<BattleId> {
        self.active.as_ref().map(|a| a.id)
    }
}

fn read_values(dice: &[Die]) -> (Vec<u8>, Vec<u8>) {
    let mut attacker = Vec::new();
    let mut defender = Vec::new();
    for die in dice {
        match die.side {
            Side::Attacker => attacker.push(die.resolved_value()),
            Side::Defender => defender.push(die.resolved_value()),
        }
    }
    (attacker, defender)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn animator() -> BattleAnimator {
        BattleAnimator::new(DiceSceneConfig::overlay())
    }

    fn run_to_completion(animator: &mut BattleAnimator) -> BattleReport {
        // Bounded by the total animation budget plus slack.
        for _ in 0..1000 {
            if let Some(report) = animator.update(DT) {
                return report;
            }
        }
        panic!("animation never completed");
    }

    #[test]
    fn test_predetermined_values_survive_the_roll() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut animator = animator();
        animator
            .start_battle(3, 2, Some((&[6, 4, 2], &[5, 1])), &mut rng)
            .unwrap();
        let report = run_to_completion(&mut animator);
        assert_eq!(report.attacker_values, vec![6, 4, 2]);
        assert_eq!(report.defender_values, vec![5, 1]);
    }

    #[test]
    fn test_duplicate_start_rejected_while_rolling() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut animator = animator();
        let id = animator.start_battle(1, 1, None, &mut rng).unwrap();
        animator.update(DT);
        let err = animator.start_battle(1, 1, None, &mut rng).unwrap_err();
        assert!(matches!(err, BattleError::BattleInProgress));
        assert_eq!(animator.current_battle(), Some(id));
        // No second set of dice spawned.
        assert_eq!(animator.dice().len(), 2);
    }

    #[test]
    fn test_report_fires_exactly_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut animator = animator();
        animator.start_battle(2, 2, None, &mut rng).unwrap();
        let mut reports = 0;
        for _ in 0..1200 {
            if animator.update(DT).is_some() {
                reports += 1;
            }
        }
        assert_eq!(reports, 1);
    }

    #[test]
    fn test_battle_ids_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut animator = animator();
        let first = animator.start_battle(1, 1, None, &mut rng).unwrap();
        run_to_completion(&mut animator);
        let second = animator.start_battle(1, 1, None, &mut rng).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_cancel_suppresses_report() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut animator = animator();
        animator.start_battle(2, 1, None, &mut rng).unwrap();
        for _ in 0..30 {
            animator.update(DT);
        }
        animator.cancel();
        assert!(animator.phase().is_none());
        assert!(animator.dice().is_empty());
        for _ in 0..1200 {
            assert!(animator.update(DT).is_none());
        }
    }

    #[test]
    fn test_completion_within_time_budget() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut animator = animator();
        animator.start_battle(3, 3, None, &mut rng).unwrap();
        let budget_frames = (animator.config.total_duration() / DT) as usize + 10;
        let mut finished = false;
        for _ in 0..budget_frames {
            if animator.update(DT).is_some() {
                finished = true;
                break;
            }
        }
        assert!(finished, "battle exceeded its wall-clock budget");
    }

    #[test]
    fn test_mismatched_predetermined_lengths_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut animator = animator();
        let err = animator
            .start_battle(3, 2, Some((&[6, 4], &[5, 1])), &mut rng)
            .unwrap_err();
        assert!(matches!(err, BattleError::InvalidDiceCount(_)));
        assert!(animator.phase().is_none());
    }
}
