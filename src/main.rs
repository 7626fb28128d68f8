//! Dominion battle demo - Entry Point
//!
//! Runs one scripted attack end to end: selection, a request against
//! the in-process backend, loss reconciliation, and the dice-tray
//! animation stepped at 60 Hz, with the result logged at each stage.

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use dominion_battle::battle::{reconcile_outcome, AttackSelection, BattleAnimator};
use dominion_battle::core::config::DiceSceneConfig;
use dominion_battle::core::error::Result;
use dominion_battle::core::types::{PlayerId, TerritoryId};
use dominion_battle::game::backend::{AttackBackend, LocalBackend};
use dominion_battle::game::territory::{Territory, TerritoryMap};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scene {
    Overlay,
    Fullscreen,
}

#[derive(Parser, Debug)]
#[command(about = "Run one battle through the full client pipeline")]
struct Args {
    /// RNG seed for the backend roll, reconciliation, and dice spawns
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Dice tray preset
    #[arg(long, value_enum, default_value = "fullscreen")]
    scene: Scene,

    /// Attack dice to roll (1-3)
    #[arg(long, default_value_t = 3)]
    attack_dice: u32,

    /// Ask the backend to reveal its real die values instead of
    /// leaving them to reconciliation
    #[arg(long)]
    reveal_dice: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("dominion_battle=debug")
        .init();

    let args = Args::parse();
    tracing::info!(?args, "dominion battle demo starting");

    let player = PlayerId::new();
    let enemy = PlayerId::new();
    let home = TerritoryId(1);
    let border = TerritoryId(2);

    let mut map = TerritoryMap::new();
    map.insert(home, Territory::new(player, 6));
    map.insert(border, Territory::new(enemy, 3));
    map.connect(home, border);

    // The backend holds the authoritative copy; the client map only
    // changes by applying the confirmed outcome.
    let mut backend = LocalBackend::new(map.clone(), ChaCha8Rng::seed_from_u64(args.seed));
    backend.reveal_dice = args.reveal_dice;

    let mut selection = AttackSelection::new(player);
    selection.select(&map, home)?;
    selection.select(&map, border)?;
    let request = selection.confirm(&map, args.attack_dice)?;

    let outcome = backend.attack(&request).await?;
    map.apply_outcome(request.attacker, request.defender, &outcome)?;

    let context = selection.finish();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed ^ 0x0d1e);
    let roll = reconcile_outcome(context.as_ref(), &outcome, &mut rng)?;
    tracing::info!(
        attacker = ?roll.attacker,
        defender = ?roll.defender,
        losses = ?roll.losses,
        "reconciled roll"
    );

    let config = match args.scene {
        Scene::Overlay => DiceSceneConfig::overlay(),
        Scene::Fullscreen => DiceSceneConfig::fullscreen(),
    };
    let mut animator = BattleAnimator::new(config);
    animator.start_reconciled(&roll, &mut rng)?;

    let dt = 1.0 / 60.0;
    let report = loop {
        if let Some(report) = animator.update(dt) {
            break report;
        }
    };

    tracing::info!(
        battle = ?report.battle,
        attacker = ?report.attacker_values,
        defender = ?report.defender_values,
        conquered = outcome.conquered,
        "battle complete"
    );
    Ok(())
}
