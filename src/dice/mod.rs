//! Dice bodies, the tray simulation, and upward-face resolution

pub mod body;
pub mod orientation;
pub mod simulation;

pub use body::Die;
pub use orientation::{upward_face, DEFAULT_FACE_VALUES, FACE_NORMALS};
pub use simulation::{DiePlan, DiceWorld};
