//! World generation

pub mod asteroids;

pub use asteroids::scatter_asteroids;
