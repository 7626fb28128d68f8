//! A single die rigid body
//!
//! Simulation state (position, velocities) is owned by the stepper;
//! the face bijection and the one-way rest latch are what the rest of
//! the battle pipeline reads.

use glam::{Quat, Vec3};

use crate::core::types::Side;
use crate::dice::orientation::{upward_face, DEFAULT_FACE_VALUES, FACE_COUNT};

#[derive(Debug, Clone)]
pub struct Die {
    pub side: Side,
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Pip value per face index. Fixed at creation; a forced die has
    /// every face set to the predetermined value.
    face_values: [u8; FACE_COUNT],
    /// Rotation frozen the moment the rest latch fired. One-way: never
    /// cleared or overwritten for the die's lifetime.
    rest_rotation: Option<Quat>,
}

impl Die {
    pub fn new(
        side: Side,
        position: Vec3,
        rotation: Quat,
        linear_velocity: Vec3,
        angular_velocity: Vec3,
    ) -> Self {
        Self {
            side,
            position,
            rotation,
            linear_velocity,
            angular_velocity,
            face_values: DEFAULT_FACE_VALUES,
            rest_rotation: None,
        }
    }

    /// Force every face to show `value`, for dice whose outcome is
    /// predetermined. The die still tumbles; whatever face lands up
    /// reads as `value`.
    pub fn force_value(&mut self, value: u8) {
        debug_assert!((1..=6).contains(&value));
        self.face_values = [value; FACE_COUNT];
    }

    pub fn is_at_rest(&self) -> bool {
        self.rest_rotation.is_some()
    }

    /// Latch into the rest state if the linear speed has dropped below
    /// the threshold. Returns true only on the transition itself, so a
    /// completion notification can fire at most once per die.
    pub fn try_latch_rest(&mut self, speed_threshold: f32) -> bool {
        if self.rest_rotation.is_some() {
            return false;
        }
        if self.linear_velocity.length() < speed_threshold {
            self.rest_rotation = Some(self.rotation);
            return true;
        }
        false
    }

    /// The pip value this die shows.
    ///
    /// Reads the frozen rest rotation when latched; before the latch
    /// (timeout path) the live rotation is the best available answer.
    pub fn resolved_value(&self) -> u8 {
        let rotation = self.rest_rotation.unwrap_or(self.rotation);
        self.face_values[upward_face(rotation)]
    }
}
