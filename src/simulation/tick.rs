//! Tick system - advances one snapshot by one simulation step
//!
//! A tick never touches its source snapshot: the whole batch of commands is
//! validated first, then applied to a deep copy. Players act one after
//! another; the order flips with history parity so neither side always moves
//! first. Each commanded vessel runs the same phase pipeline:
//!
//! lasers -> pruning -> rotation -> movement -> shipyards -> collectors
//!
//! Pruning runs inside every vessel's pipeline, so pixels shot away by an
//! earlier vessel are gone before later vessels move or fire.

use glam::Vec2;

use crate::command::orders::{Command, GameTick};
use crate::core::error::ValidationError;
use crate::core::types::VesselId;
use crate::entity::game::{Game, Gamestate};
use crate::simulation::beam::{fire_lasers, BeamHit};
use crate::simulation::collector::run_collectors;
use crate::simulation::kinematics::{apply_movement, apply_rotation};
use crate::simulation::pruning::prune_destroyed_pixels;
use crate::simulation::shipyard::{run_shipyards, ShipyardEvent};

/// Events generated during a tick
///
/// Returned by [`advance_with_events`] for logging and match reports.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    LaserFired {
        vessel: VesselId,
        laser: usize,
        hits: Vec<BeamHit>,
    },
    PixelsDestroyed {
        count: usize,
    },
    Rotated {
        vessel: VesselId,
        facing: f32,
    },
    Moved {
        vessel: VesselId,
        to: Vec2,
    },
    BuildStarted {
        vessel: VesselId,
        shipyard: usize,
        cost: f32,
    },
    VesselLaunched {
        parent: VesselId,
        shipyard: usize,
        vessel: VesselId,
    },
    BuildCancelled {
        vessel: VesselId,
        shipyard: usize,
    },
    ResourcesCollected {
        vessel: VesselId,
        collector: usize,
        amount: f32,
    },
}

/// Check a batch of actions against the snapshot it will be applied to
pub fn validate_tick(game: &Game, source: &Gamestate, tick: &GameTick) -> Result<(), ValidationError> {
    let expected = game.player_count();
    if tick.player_actions.len() != expected {
        return Err(ValidationError::PlayerCountMismatch {
            expected,
            found: tick.player_actions.len(),
        });
    }
    if source.player_progresses.len() != expected {
        return Err(ValidationError::PlayerCountMismatch {
            expected,
            found: source.player_progresses.len(),
        });
    }

    for (player, (action, progress)) in tick
        .player_actions
        .iter()
        .zip(&source.player_progresses)
        .enumerate()
    {
        let roster = progress.vessels.len();
        if action.roster_size != roster || action.commands.len() > roster {
            return Err(ValidationError::VesselCommandMismatch {
                player,
                roster,
                authored: action.roster_size,
            });
        }
    }
    Ok(())
}

/// Order in which players act on a tick leaving a history of `history_len`
/// snapshots
///
/// Natural order when the history length is even, reversed when it is odd.
pub fn player_order(player_count: usize, history_len: u64) -> Vec<usize> {
    if history_len % 2 == 1 {
        (0..player_count).rev().collect()
    } else {
        (0..player_count).collect()
    }
}

/// Produce the snapshot that follows `source` under `tick`
pub fn advance(game: &Game, source: &Gamestate, tick: &GameTick) -> Result<Gamestate, ValidationError> {
    advance_with_events(game, source, tick).map(|(next, _)| next)
}

/// [`advance`], also returning what happened during the tick
pub fn advance_with_events(
    game: &Game,
    source: &Gamestate,
    tick: &GameTick,
) -> Result<(Gamestate, Vec<TickEvent>), ValidationError> {
    validate_tick(game, source, tick)?;

    let tick_seconds = game.seconds_per_tick();
    let order = player_order(game.player_count(), source.history_len());
    tracing::debug!(sequence = source.sequence, ?order, "Advancing gamestate");

    let mut next = source.clone();
    next.sequence = source.sequence + 1;
    let mut events = Vec::new();

    for player in order {
        let action = &tick.player_actions[player];
        let roster: Vec<VesselId> = next.player_progresses[player]
            .vessels
            .iter()
            .map(|v| v.id)
            .collect();

        for id in roster {
            let Some(command) = action.command_for(id) else {
                continue;
            };
            let Some(index) = next.player_progresses[player].index_of(id) else {
                continue;
            };
            run_vessel(game, &mut next, player, index, command, tick_seconds, &mut events);
        }
    }

    Ok((next, events))
}

/// Run the phase pipeline for one commanded vessel
fn run_vessel(
    game: &Game,
    gamestate: &mut Gamestate,
    player: usize,
    index: usize,
    command: &Command,
    tick_seconds: f32,
    events: &mut Vec<TickEvent>,
) {
    let id = gamestate.player_progresses[player].vessels[index].id;

    for shot in fire_lasers(game, gamestate, player, index, |i| command.laser_active(i), tick_seconds) {
        tracing::trace!(vessel = id.0, laser = shot.laser, hits = shot.hits.len(), "Laser fired");
        events.push(TickEvent::LaserFired {
            vessel: id,
            laser: shot.laser,
            hits: shot.hits,
        });
    }

    let count = prune_destroyed_pixels(gamestate);
    if count > 0 {
        tracing::trace!(count, "Pixels destroyed");
        events.push(TickEvent::PixelsDestroyed { count });
    }

    {
        let vessel = &mut gamestate.player_progresses[player].vessels[index];
        let turned = apply_rotation(vessel, command.target_rotation);
        if turned.applied > 0.0 {
            events.push(TickEvent::Rotated {
                vessel: id,
                facing: vessel.facing,
            });
        }
        let moved = apply_movement(vessel, command.target_displacement, tick_seconds);
        if moved.applied > 0.0 {
            events.push(TickEvent::Moved {
                vessel: id,
                to: vessel.position,
            });
        }
    }

    for event in run_shipyards(gamestate, player, index, |i| command.shipyard_order(i), tick_seconds) {
        events.push(match event {
            ShipyardEvent::BuildStarted { shipyard, cost } => TickEvent::BuildStarted {
                vessel: id,
                shipyard,
                cost,
            },
            ShipyardEvent::VesselLaunched { shipyard, vessel } => {
                tracing::debug!(parent = id.0, vessel = vessel.0, "Vessel launched");
                TickEvent::VesselLaunched {
                    parent: id,
                    shipyard,
                    vessel,
                }
            }
            ShipyardEvent::BuildCancelled { shipyard } => {
                tracing::debug!(vessel = id.0, shipyard, "Build cancelled");
                TickEvent::BuildCancelled { vessel: id, shipyard }
            }
        });
    }

    for collection in run_collectors(gamestate, player, index, |i| command.collector_active(i), tick_seconds) {
        events.push(TickEvent::ResourcesCollected {
            vessel: id,
            collector: collection.collector,
            amount: collection.resources,
        });
    }
}
