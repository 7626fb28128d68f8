//! Dice scene configuration with documented constants
//!
//! All magic numbers for the battle animation are collected here with
//! explanations of their purpose and how they interact with each other.

use glam::Vec3;

/// Configuration for one dice scene
///
/// Two presets exist: the small in-map overlay tray and the full-screen
/// tray. They differ mostly in gravity and arena size; the timing
/// windows are shared so every battle resolves on the same schedule.
#[derive(Debug, Clone)]
pub struct DiceSceneConfig {
    // === TIMING ===
    /// Length of the rolling window in seconds.
    ///
    /// The simulation runs for exactly this long regardless of when the
    /// dice actually come to rest. It is the authoritative completion
    /// signal; rest detection only decides which rotation gets frozen.
    pub roll_duration: f32,

    /// Pause in seconds between the dice settling and the result being
    /// reported, so the player can read the faces before the HUD updates.
    pub settle_delay: f32,

    // === PHYSICS ===
    /// Gravitational acceleration (world units/s^2, negative = down).
    ///
    /// The overlay tray uses a stronger pull so dice slam down quickly
    /// inside the small visible area; the full-screen tray is gentler
    /// and lets the dice tumble longer.
    pub gravity: f32,

    /// Linear speed below which a die latches into its rest state.
    ///
    /// The latch is one-way: once crossed, the recorded rotation is
    /// frozen even if contact jitter perturbs the body afterwards.
    pub rest_speed_threshold: f32,

    /// Per-second proportional damping applied to linear velocity.
    /// Stands in for air drag and rolling resistance.
    pub linear_damping: f32,

    /// Per-second proportional damping applied to angular velocity.
    pub angular_damping: f32,

    // === DIE MATERIAL ===
    /// Die mass in arbitrary units; only ratios matter to the impulses.
    pub die_mass: f32,

    /// Half the edge length of a die cube (world units).
    pub die_half_extent: f32,

    /// Bounciness on contact, 0 = dead stop, 1 = perfect bounce.
    /// Above ~0.6 dice tend to escape the tray before settling.
    pub restitution: f32,

    /// Coulomb friction coefficient for contact impulses.
    pub friction: f32,

    // === ARENA ===
    /// Half-width of the square tray floor. Walls stand at +/- this
    /// distance on both horizontal axes.
    pub arena_half_extent: f32,

    /// Height of the invisible ceiling above the floor.
    pub ceiling_height: f32,

    /// Height band from which dice are dropped.
    pub spawn_height: f32,

    // === SPAWN IMPULSES ===
    /// Maximum magnitude of the randomized initial horizontal velocity.
    pub max_spawn_speed: f32,

    /// Maximum magnitude of each randomized angular velocity component
    /// (rad/s). High spin is what makes the tumble read as a real throw.
    pub max_spawn_spin: f32,
}

impl DiceSceneConfig {
    /// Preset for the compact dice tray overlaid on the map during an
    /// attack.
    pub fn overlay() -> Self {
        Self {
            roll_duration: 4.0,
            settle_delay: 1.0,
            gravity: -30.0,
            rest_speed_threshold: 0.1,
            linear_damping: 0.2,
            angular_damping: 0.3,
            die_mass: 1.0,
            die_half_extent: 0.5,
            restitution: 0.35,
            friction: 0.4,
            arena_half_extent: 4.0,
            ceiling_height: 8.0,
            spawn_height: 5.0,
            max_spawn_speed: 4.0,
            max_spawn_spin: 12.0,
        }
    }

    /// Preset for the full-screen dice roll scene.
    pub fn fullscreen() -> Self {
        Self {
            gravity: -9.8,
            arena_half_extent: 8.0,
            ceiling_height: 12.0,
            spawn_height: 7.0,
            max_spawn_speed: 6.0,
            ..Self::overlay()
        }
    }

    /// Downward gravity as a vector.
    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::new(0.0, self.gravity, 0.0)
    }

    /// Hard ceiling on how long a battle animation may take, used by
    /// callers to schedule their fallback path.
    pub fn total_duration(&self) -> f32 {
        self.roll_duration + self.settle_delay
    }
}

impl Default for DiceSceneConfig {
    fn default() -> Self {
        Self::fullscreen()
    }
}
