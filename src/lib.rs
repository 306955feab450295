//! Pixel Armada - deterministic pixel-ship battle simulation

pub mod command;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod world;
