//! Seeded asteroid fields

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::MatchConfig;
use crate::entity::game::Asteroid;

/// Scatter the configured asteroid field across the match area
///
/// The same config always yields the same field.
pub fn scatter_asteroids(config: &MatchConfig) -> Vec<Asteroid> {
    let field = &config.asteroids;
    let mut rng = ChaCha8Rng::seed_from_u64(field.seed);

    (0..field.count)
        .map(|_| {
            let position = Vec2::new(
                rng.gen_range(0.0..config.width),
                rng.gen_range(0.0..config.height),
            );
            let size = rng.gen_range(field.min_size..=field.max_size);
            Asteroid::new(position, size)
        })
        .collect()
}
