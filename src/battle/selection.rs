//! Attack selection flow
//!
//! Pick an owned territory with troops to spare, pick an adjacent
//! enemy territory, confirm a dice count, wait for the server. Cancel
//! resets everything; repeated confirms while a request is in flight
//! are rejected.

use serde::{Deserialize, Serialize};

use crate::battle::context::BattleContext;
use crate::core::error::{BattleError, Result};
use crate::core::types::{PlayerId, TerritoryId};
use crate::game::backend::BattleRequest;
use crate::game::territory::TerritoryMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    NoSelection,
    AttackerSelected(TerritoryId),
    DefenderSelected {
        attacker: TerritoryId,
        defender: TerritoryId,
    },
    AwaitingServerResult,
}

/// The selection state machine for one player's attack flow.
#[derive(Debug, Clone)]
pub struct AttackSelection {
    player: PlayerId,
    state: SelectionState,
    context: Option<BattleContext>,
}

impl AttackSelection {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            state: SelectionState::NoSelection,
            context: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn context(&self) -> Option<&BattleContext> {
        self.context.as_ref()
    }

    /// Handle a territory click.
    ///
    /// From `NoSelection` an owned, attack-capable territory becomes
    /// the attacker. From `AttackerSelected`, clicking another owned
    /// capable territory switches the attacker; clicking an adjacent
    /// enemy territory locks in the defender.
    pub fn select(&mut self, map: &TerritoryMap, territory: TerritoryId) -> Result<()> {
        let clicked = map.require(territory)?;
        match self.state {
            SelectionState::NoSelection => {
                if clicked.owner != self.player || !clicked.can_attack() {
                    return Err(BattleError::InvalidSelection("attacker selection"));
                }
                self.state = SelectionState::AttackerSelected(territory);
                tracing::debug!(?territory, "attacker selected");
                Ok(())
            }
            SelectionState::AttackerSelected(attacker) => {
                if clicked.owner == self.player {
                    if !clicked.can_attack() {
                        return Err(BattleError::InvalidSelection("attacker selection"));
                    }
                    self.state = SelectionState::AttackerSelected(territory);
                    return Ok(());
                }
                if !map.are_adjacent(attacker, territory) {
                    return Err(BattleError::InvalidSelection("defender selection"));
                }
                self.state = SelectionState::DefenderSelected {
                    attacker,
                    defender: territory,
                };
                tracing::debug!(?territory, "defender selected");
                Ok(())
            }
            SelectionState::DefenderSelected { .. } | SelectionState::AwaitingServerResult => {
                Err(BattleError::InvalidSelection("territory selection"))
            }
        }
    }

    /// Confirm the attack with a dice count.
    ///
    /// Captures the before-snapshots into a [`BattleContext`] and
    /// produces the request to send. While a request is in flight this
    /// is an idempotent rejection, not a second send.
    pub fn confirm(&mut self, map: &TerritoryMap, attack_dice: u32) -> Result<BattleRequest> {
        match self.state {
            SelectionState::DefenderSelected { attacker, defender } => {
                let context = BattleContext::capture(map, attacker, defender, attack_dice)?;
                self.context = Some(context);
                self.state = SelectionState::AwaitingServerResult;
                tracing::info!(?attacker, ?defender, attack_dice, "attack confirmed");
                Ok(BattleRequest {
                    attacker,
                    defender,
                    attack_dice,
                })
            }
            SelectionState::AwaitingServerResult => Err(BattleError::AttackInFlight),
            _ => Err(BattleError::InvalidSelection("confirm")),
        }
    }

    /// Reset to `NoSelection`, dropping any captured context and any
    /// highlight state the UI derives from it. No partial state
    /// survives; an outcome arriving after a cancel finds no context
    /// and takes the non-animated fallback.
    pub fn cancel(&mut self) {
        self.state = SelectionState::NoSelection;
        self.context = None;
        tracing::debug!("attack selection cancelled");
    }

    /// Consume the flow once the server responded (or the request
    /// failed), returning the captured context for reconciliation.
    pub fn finish(&mut self) -> Option<BattleContext> {
        self.state = SelectionState::NoSelection;
        self.context.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::territory::Territory;

    fn setup() -> (TerritoryMap, AttackSelection, TerritoryId, TerritoryId, TerritoryId) {
        let player = PlayerId::new();
        let enemy = PlayerId::new();
        let home = TerritoryId(1);
        let border = TerritoryId(2);
        let far = TerritoryId(3);
        let mut map = TerritoryMap::new();
        map.insert(home, Territory::new(player, 4));
        map.insert(border, Territory::new(enemy, 2));
        map.insert(far, Territory::new(enemy, 2));
        map.connect(home, border);
        (map, AttackSelection::new(player), home, border, far)
    }

    #[test]
    fn test_full_selection_flow() {
        let (map, mut sel, home, border, _) = setup();
        sel.select(&map, home).unwrap();
        assert_eq!(sel.state(), SelectionState::AttackerSelected(home));
        sel.select(&map, border).unwrap();
        let request = sel.confirm(&map, 3).unwrap();
        assert_eq!(request.attack_dice, 3);
        assert_eq!(sel.state(), SelectionState::AwaitingServerResult);
        assert!(sel.context().is_some());
    }

    #[test]
    fn test_cannot_attack_from_enemy_territory() {
        let (map, mut sel, _, border, _) = setup();
        assert!(sel.select(&map, border).is_err());
        assert_eq!(sel.state(), SelectionState::NoSelection);
    }

    #[test]
    fn test_cannot_attack_nonadjacent_territory() {
        let (map, mut sel, home, _, far) = setup();
        sel.select(&map, home).unwrap();
        assert!(sel.select(&map, far).is_err());
        // Attacker selection is preserved for another try.
        assert_eq!(sel.state(), SelectionState::AttackerSelected(home));
    }

    #[test]
    fn test_double_confirm_is_rejected() {
        let (map, mut sel, home, border, _) = setup();
        sel.select(&map, home).unwrap();
        sel.select(&map, border).unwrap();
        sel.confirm(&map, 2).unwrap();
        let err = sel.confirm(&map, 2).unwrap_err();
        assert!(matches!(err, BattleError::AttackInFlight));
    }

    #[test]
    fn test_cancel_clears_everything() {
        let (map, mut sel, home, border, _) = setup();
        sel.select(&map, home).unwrap();
        sel.select(&map, border).unwrap();
        sel.confirm(&map, 1).unwrap();
        sel.cancel();
        assert_eq!(sel.state(), SelectionState::NoSelection);
        assert!(sel.context().is_none());
    }

    #[test]
    fn test_finish_returns_context_once() {
        let (map, mut sel, home, border, _) = setup();
        sel.select(&map, home).unwrap();
        sel.select(&map, border).unwrap();
        sel.confirm(&map, 1).unwrap();
        assert!(sel.finish().is_some());
        assert!(sel.finish().is_none());
        assert_eq!(sel.state(), SelectionState::NoSelection);
    }
}
