//! Dominion - client battle core for a territorial conquest game
//!
//! The backend owns the rules; this crate owns the experience of an
//! attack: the selection flow, the reconciliation of aggregate troop
//! losses into individual die values, and the physically simulated
//! dice roll that displays them.

pub mod battle;
pub mod core;
pub mod dice;
pub mod game;
