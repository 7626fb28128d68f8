//! Upward-face resolution
//!
//! A die's six faces carry fixed outward normals in its local frame.
//! The face pointing up after a roll is the one whose rotated normal
//! has the largest dot product with world +Y.

use glam::{Quat, Vec3};

pub const FACE_COUNT: usize = 6;

/// Outward face normals in the die's local frame.
///
/// Paired index-for-index with [`DEFAULT_FACE_VALUES`]; the order also
/// fixes the deterministic tie-break (first maximum wins), though real
/// resting rotations never tie exactly.
pub const FACE_NORMALS: [Vec3; FACE_COUNT] = [
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// Standard pip assignment: opposite faces sum to seven.
pub const DEFAULT_FACE_VALUES: [u8; FACE_COUNT] = [1, 6, 2, 5, 3, 4];

/// Index of the face oriented up for the given rotation.
///
/// The rotation must be a proper rotation (glam quaternions are); no
/// error cases, always returns a valid face index.
pub fn upward_face(rotation: Quat) -> usize {
    let mut best_face = 0;
    let mut best_dot = f32::NEG_INFINITY;
    for (face, normal) in FACE_NORMALS.iter().enumerate() {
        let dot = (rotation * *normal).dot(Vec3::Y);
        if dot > best_dot {
            best_dot = dot;
            best_face = face;
        }
    }
    best_face
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    fn value_up(rotation: Quat) -> u8 {
        DEFAULT_FACE_VALUES[upward_face(rotation)]
    }

    #[test]
    fn test_canonical_rotations() {
        // Identity leaves local +Y (pip 1) up.
        assert_eq!(value_up(Quat::IDENTITY), 1);
        // Half turn about X flips the die: 6 up.
        assert_eq!(value_up(Quat::from_rotation_x(PI)), 6);
        // Quarter turn about Z carries local +X to +Y: 2 up.
        assert_eq!(value_up(Quat::from_rotation_z(FRAC_PI_2)), 2);
        // Opposite quarter turn: -X up, pip 5.
        assert_eq!(value_up(Quat::from_rotation_z(-FRAC_PI_2)), 5);
        // Quarter turn about X carries local +Z to +Y: 3 up.
        assert_eq!(value_up(Quat::from_rotation_x(-FRAC_PI_2)), 3);
        // And the reverse carries -Z to +Y: 4 up.
        assert_eq!(value_up(Quat::from_rotation_x(FRAC_PI_2)), 4);
    }

    #[test]
    fn test_yaw_does_not_change_face() {
        // Spinning about the vertical axis keeps the same face up.
        for i in 0..8 {
            let yaw = Quat::from_rotation_y(i as f32 * FRAC_PI_2 * 0.5);
            assert_eq!(value_up(yaw), 1);
        }
    }

    #[test]
    fn test_perturbed_rotation_still_resolves() {
        // A slightly tilted die still reads as its dominant face.
        let tilt = Quat::from_rotation_x(0.12) * Quat::from_rotation_z(-0.08);
        assert_eq!(value_up(tilt), 1);
    }
}
