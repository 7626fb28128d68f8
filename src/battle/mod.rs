//! Battle resolution pipeline
//!
//! The backend decides battles; this module makes them watchable.
//! Flow: selection confirms an attack and captures before-snapshots,
//! the authoritative outcome comes back as aggregate troop counts,
//! reconciliation fabricates die values that reproduce those counts,
//! and the orchestrator rolls them through the dice tray.

pub mod context;
pub mod orchestrator;
pub mod reconcile;
pub mod selection;

pub use context::{BattleContext, BattleLosses};
pub use orchestrator::{AnimationPhase, BattleAnimator, BattleReport};
pub use reconcile::{reconcile, reconcile_outcome, ReconciledRoll};
pub use selection::{AttackSelection, SelectionState};
