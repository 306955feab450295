//! Draft previews
//!
//! Lets a player see where their draft orders lead before committing them.
//! Other players are assumed to stand idle. Previews run on copies and never
//! touch history.

use rayon::prelude::*;

use crate::command::orders::{GameTick, PlayerAction};
use crate::core::error::ValidationError;
use crate::entity::game::{Game, Gamestate};
use crate::simulation::tick::advance;

/// Apply a sequence of ticks to a copy of `base`
pub fn simulate(game: &Game, base: &Gamestate, ticks: &[GameTick]) -> Result<Gamestate, ValidationError> {
    ticks
        .iter()
        .try_fold(base.clone(), |state, tick| advance(game, &state, tick))
}

/// Snapshot after the first `steps` ticks of `player`'s draft
///
/// Every other player issues no commands on those ticks.
pub fn preview_draft(
    game: &Game,
    base: &Gamestate,
    player: usize,
    draft: &[PlayerAction],
    steps: usize,
) -> Result<Gamestate, ValidationError> {
    draft.iter().take(steps).try_fold(base.clone(), |state, action| {
        let actions = (0..game.player_count())
            .map(|j| {
                if j == player {
                    action.clone()
                } else {
                    state
                        .player_progresses
                        .get(j)
                        .map(PlayerAction::idle)
                        .unwrap_or_default()
                }
            })
            .collect();
        advance(game, &state, &GameTick::new(actions))
    })
}

/// Evaluate several candidate tick sequences from the same base in parallel
///
/// Results come back in candidate order.
pub fn preview_candidates(
    game: &Game,
    base: &Gamestate,
    candidates: &[Vec<GameTick>],
) -> Vec<Result<Gamestate, ValidationError>> {
    candidates
        .par_iter()
        .map(|ticks| simulate(game, base, ticks))
        .collect()
}
