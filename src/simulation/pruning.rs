//! Removal of destroyed pixels

use crate::entity::game::Gamestate;

/// Drop every pixel whose damage reached its component's threshold
///
/// Runs over every vessel of every player. Returns the number of pixels
/// removed.
pub fn prune_destroyed_pixels(gamestate: &mut Gamestate) -> usize {
    gamestate
        .player_progresses
        .iter_mut()
        .flat_map(|progress| progress.vessels.iter_mut())
        .map(|vessel| {
            vessel
                .pixel_components_mut()
                .map(|component| component.prune_destroyed())
                .sum::<usize>()
        })
        .sum()
}
