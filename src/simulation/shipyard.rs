//! Shipyard production
//!
//! Each shipyard runs a small state machine per tick, in this order:
//! begin a build if idle and ordered to, work on the current build, then
//! honour a cancel order. A finished vessel is launched at the shipyard's
//! root and joins the end of its owner's roster.

use crate::command::orders::ShipyardOrder;
use crate::core::types::VesselId;
use crate::entity::component::{FunctionalRole, PixelComponent, ShipyardState};
use crate::entity::game::Gamestate;
use crate::entity::vessel::Vessel;

/// Something a shipyard did this tick
#[derive(Debug, Clone, PartialEq)]
pub enum ShipyardEvent {
    BuildStarted { shipyard: usize, cost: f32 },
    VesselLaunched { shipyard: usize, vessel: VesselId },
    BuildCancelled { shipyard: usize },
}

/// Per-second stats and current state of one shipyard
fn take_state(component: &mut PixelComponent) -> Option<(f32, f32, ShipyardState)> {
    let functional = component.functional_mut()?;
    let cost_per_second = functional.energy_cost_per_second();
    let build_speed = functional.build_speed();
    match &mut functional.role {
        FunctionalRole::Shipyard(state) => Some((cost_per_second, build_speed, std::mem::take(state))),
        _ => None,
    }
}

fn put_state(component: &mut PixelComponent, new_state: ShipyardState) {
    if let Some(FunctionalRole::Shipyard(state)) = component.functional_mut().map(|f| &mut f.role) {
        *state = new_state;
    }
}

/// Work every shipyard of one vessel
pub fn run_shipyards<'a>(
    gamestate: &mut Gamestate,
    player: usize,
    vessel_index: usize,
    order_for: impl Fn(usize) -> Option<&'a ShipyardOrder>,
    tick_seconds: f32,
) -> Vec<ShipyardEvent> {
    let shipyard_count = gamestate
        .player_progresses
        .get(player)
        .and_then(|p| p.vessels.get(vessel_index))
        .map(|v| v.shipyards.len())
        .unwrap_or(0);

    let mut events = Vec::new();
    for shipyard in 0..shipyard_count {
        let Some(order) = order_for(shipyard) else {
            continue;
        };

        let progress = &mut gamestate.player_progresses[player];
        let vessel = &mut progress.vessels[vessel_index];
        let Some((cost_per_second, build_speed, mut state)) = take_state(&mut vessel.shipyards[shipyard]) else {
            continue;
        };

        if order.run && order.begin && !state.is_building() {
            if let Some(blueprint) = &order.blueprint {
                let cost = blueprint.build_cost();
                if progress.stored_resources >= cost {
                    progress.stored_resources -= cost;
                    state = ShipyardState::Building {
                        blueprint: Box::new(blueprint.clone()),
                        progress: 0.0,
                    };
                    events.push(ShipyardEvent::BuildStarted { shipyard, cost });
                }
            }
        }

        let mut complete = false;
        if order.run {
            if let ShipyardState::Building { blueprint, progress: done } = &mut state {
                let build_time = blueprint.build_time();
                work(vessel, done, build_time, cost_per_second, build_speed, tick_seconds);
                complete = *done >= build_time;
            }
        }
        let finished = if complete {
            match std::mem::take(&mut state) {
                ShipyardState::Building { blueprint, .. } => Some(blueprint),
                ShipyardState::Idle => None,
            }
        } else {
            None
        };

        if order.cancel && state.is_building() {
            state = ShipyardState::Idle;
            events.push(ShipyardEvent::BuildCancelled { shipyard });
        }

        let launch_point = vessel.position + vessel.shipyards[shipyard].root.as_vec2();
        put_state(&mut vessel.shipyards[shipyard], state);

        if let Some(blueprint) = finished {
            let id = gamestate.allocate_vessel_id();
            let mut launched = (*blueprint).with_identity(id);
            launched.position = launch_point;
            gamestate.player_progresses[player].vessels.push(launched);
            events.push(ShipyardEvent::VesselLaunched { shipyard, vessel: id });
        }
    }
    events
}

/// Advance a build by up to one tick, limited by stored energy
fn work(
    vessel: &mut Vessel,
    done: &mut f32,
    build_time: f32,
    cost_per_second: f32,
    build_speed: f32,
    tick_seconds: f32,
) {
    if build_speed <= 0.0 || tick_seconds <= 0.0 {
        return;
    }
    let seconds_to_finish = (build_time - *done).max(0.0) / build_speed;
    let seconds_of_energy = if cost_per_second > 0.0 {
        vessel.stored_energy() / cost_per_second
    } else {
        f32::INFINITY
    };
    let seconds = tick_seconds.min(seconds_of_energy).min(seconds_to_finish).max(0.0);

    vessel.spend_energy(seconds * cost_per_second);
    if seconds >= seconds_to_finish {
        *done = build_time;
    } else {
        *done += seconds * build_speed;
    }
}
