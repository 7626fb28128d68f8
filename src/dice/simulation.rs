//! Rigid-body dice tray
//!
//! A deliberately small integrator: box dice against the static planes
//! of the tray (floor, four walls, ceiling), semi-implicit Euler with
//! corner-contact impulses. Enough physics for a convincing tumble;
//! the roll-window timeout, not the solver, guarantees completion.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::core::config::DiceSceneConfig;
use crate::core::types::Side;
use crate::dice::body::Die;

/// What to spawn for one die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiePlan {
    pub side: Side,
    /// Predetermined pip value; `None` lets the physics decide.
    pub forced: Option<u8>,
}

/// A static boundary plane, expressed with its inward normal.
///
/// A point p is inside when `normal . p >= offset`.
#[derive(Debug, Clone, Copy)]
struct Plane {
    normal: Vec3,
    offset: f32,
}

/// The simulated tray holding one battle's dice.
#[derive(Debug, Clone)]
pub struct DiceWorld {
    config: DiceSceneConfig,
    planes: Vec<Plane>,
    dice: Vec<Die>,
}

impl DiceWorld {
    pub fn new(config: DiceSceneConfig) -> Self {
        let half = config.arena_half_extent;
        let planes = vec![
            // Floor and ceiling
            Plane { normal: Vec3::Y, offset: 0.0 },
            Plane { normal: Vec3::NEG_Y, offset: -config.ceiling_height },
            // Walls
            Plane { normal: Vec3::X, offset: -half },
            Plane { normal: Vec3::NEG_X, offset: -half },
            Plane { normal: Vec3::Z, offset: -half },
            Plane { normal: Vec3::NEG_Z, offset: -half },
        ];
        Self {
            config,
            planes,
            dice: Vec::new(),
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn all_at_rest(&self) -> bool {
        !self.dice.is_empty() && self.dice.iter().all(Die::is_at_rest)
    }

    /// Spawn one die per plan with randomized drop impulses.
    ///
    /// Dice line up across the tray so attacker and defender dice stay
    /// visually grouped, then each gets a random initial orientation,
    /// a horizontal shove, and a strong tumble.
    pub fn spawn(&mut self, plans: &[DiePlan], rng: &mut impl Rng) {
        let cfg = &self.config;
        let spacing = cfg.die_half_extent * 3.0;
        let row_offset = (plans.len() as f32 - 1.0) * 0.5;

        for (i, plan) in plans.iter().enumerate() {
            let position = Vec3::new(
                (i as f32 - row_offset) * spacing + rng.gen_range(-0.2..0.2),
                cfg.spawn_height + rng.gen_range(0.0..cfg.die_half_extent),
                rng.gen_range(-0.5..0.5),
            );
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                rng.gen_range(0.0..std::f32::consts::TAU),
                rng.gen_range(0.0..std::f32::consts::TAU),
                rng.gen_range(0.0..std::f32::consts::TAU),
            );
            let heading = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(0.3..1.0) * cfg.max_spawn_speed;
            let linear = Vec3::new(
                heading.cos() * speed,
                -rng.gen_range(0.0..cfg.max_spawn_speed * 0.5),
                heading.sin() * speed,
            );
            let angular = Vec3::new(
                rng.gen_range(-cfg.max_spawn_spin..cfg.max_spawn_spin),
                rng.gen_range(-cfg.max_spawn_spin..cfg.max_spawn_spin),
                rng.gen_range(-cfg.max_spawn_spin..cfg.max_spawn_spin),
            );

            let mut die = Die::new(plan.side, position, rotation, linear, angular);
            if let Some(value) = plan.forced {
                die.force_value(value);
            }
            self.dice.push(die);
        }
        tracing::debug!(count = plans.len(), "spawned dice");
    }

    /// Advance the world one frame. Returns how many dice latched into
    /// their rest state during this step.
    pub fn step(&mut self, dt: f32) -> usize {
        let cfg = self.config.clone();
        let gravity = cfg.gravity_vec();
        let inv_mass = 1.0 / cfg.die_mass;
        // Solid cube inertia: m * s^2 / 6.
        let side = cfg.die_half_extent * 2.0;
        let inv_inertia = 6.0 / (cfg.die_mass * side * side);

        let mut newly_rested = 0;
        for die in &mut self.dice {
            die.linear_velocity += gravity * dt;
            die.linear_velocity *= (1.0 - cfg.linear_damping * dt).max(0.0);
            die.angular_velocity *= (1.0 - cfg.angular_damping * dt).max(0.0);

            die.position += die.linear_velocity * dt;
            die.rotation = (Quat::from_scaled_axis(die.angular_velocity * dt) * die.rotation)
                .normalize();

            for plane in &self.planes {
                resolve_plane_contacts(die, plane, &cfg, inv_mass, inv_inertia);
            }

            if die.try_latch_rest(cfg.rest_speed_threshold) {
                newly_rested += 1;
                tracing::trace!(side = ?die.side, "die latched at rest");
            }
        }
        newly_rested
    }
}

/// The eight cube corners in world space.
fn world_corners(die: &Die, half_extent: f32) -> [Vec3; 8] {
    let h = half_extent;
    let locals = [
        Vec3::new(-h, -h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, h, h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, -h, h),
        Vec3::new(h, h, -h),
        Vec3::new(h, h, h),
    ];
    locals.map(|c| die.position + die.rotation * c)
}

/// Push the die out of one plane and apply contact impulses at every
/// penetrating corner.
///
/// Corners are solved sequentially against the updated velocity, so a
/// flat landing (four corners down) behaves like a single bounce
/// instead of quadrupling the impulse.
fn resolve_plane_contacts(
    die: &mut Die,
    plane: &Plane,
    cfg: &DiceSceneConfig,
    inv_mass: f32,
    inv_inertia: f32,
) {
    let n = plane.normal;

    let mut max_depth = 0.0f32;
    for corner in world_corners(die, cfg.die_half_extent) {
        let depth = plane.offset - n.dot(corner);
        max_depth = max_depth.max(depth);
    }
    if max_depth <= 0.0 {
        return;
    }
    die.position += n * max_depth;

    for corner in world_corners(die, cfg.die_half_extent) {
        let depth = plane.offset - n.dot(corner);
        if depth < -1e-4 {
            continue;
        }
        let r = corner - die.position;
        let point_velocity = die.linear_velocity + die.angular_velocity.cross(r);
        let normal_speed = point_velocity.dot(n);
        if normal_speed >= 0.0 {
            continue;
        }

        let rn = r.cross(n);
        let effective_mass = inv_mass + rn.length_squared() * inv_inertia;
        let jn = -(1.0 + cfg.restitution) * normal_speed / effective_mass;
        let impulse = n * jn;
        die.linear_velocity += impulse * inv_mass;
        die.angular_velocity += r.cross(impulse) * inv_inertia;

        // Coulomb friction against the tangential point velocity.
        let tangential = point_velocity - n * normal_speed;
        if tangential.length_squared() > 1e-8 {
            let t = tangential.normalize();
            let rt = r.cross(t);
            let effective_mass_t = inv_mass + rt.length_squared() * inv_inertia;
            let jt_unclamped = -tangential.length() / effective_mass_t;
            let jt = jt_unclamped.max(-cfg.friction * jn);
            let friction_impulse = t * jt;
            die.linear_velocity += friction_impulse * inv_mass;
            die.angular_velocity += r.cross(friction_impulse) * inv_inertia;
        }
    }
}
