//! Per-vessel commands and the per-player, per-tick batches that carry them

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::VesselId;
use crate::entity::game::PlayerProgress;
use crate::entity::vessel::Vessel;

/// Per-shipyard production flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipyardOrder {
    /// Work the shipyard this tick; without it progress is frozen
    pub run: bool,
    /// Start a new build if the shipyard is idle and resources allow
    pub begin: bool,
    /// Abandon the current build (spent resources are not refunded)
    pub cancel: bool,
    /// Vessel to build when `begin` takes effect
    pub blueprint: Option<Vessel>,
}

impl ShipyardOrder {
    /// Begin building `blueprint` and keep the shipyard running
    pub fn build(blueprint: Vessel) -> Self {
        Self {
            run: true,
            begin: true,
            cancel: false,
            blueprint: Some(blueprint),
        }
    }

    /// Keep working on the current build
    pub fn keep_running() -> Self {
        Self {
            run: true,
            ..Self::default()
        }
    }

    pub fn cancel() -> Self {
        Self {
            cancel: true,
            ..Self::default()
        }
    }
}

/// One vessel's intent for one tick
///
/// Flag vectors are indexed like the vessel's component lists. Missing
/// entries mean "off"; extra entries are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Signed turn to attempt (radians, counter-clockwise positive)
    pub target_rotation: f32,
    /// Displacement to attempt in world units
    pub target_displacement: Vec2,
    pub shipyards: Vec<ShipyardOrder>,
    pub activate_collectors: Vec<bool>,
    pub activate_lasers: Vec<bool>,
}

impl Command {
    /// A command that does nothing
    pub fn idle() -> Self {
        Self::default()
    }

    /// An idle command with flag vectors sized to the vessel's components
    pub fn for_vessel(vessel: &Vessel) -> Self {
        Self {
            target_rotation: 0.0,
            target_displacement: Vec2::ZERO,
            shipyards: vec![ShipyardOrder::default(); vessel.shipyards.len()],
            activate_collectors: vec![false; vessel.collectors.len()],
            activate_lasers: vec![false; vessel.lasers.len()],
        }
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.target_rotation = radians;
        self
    }

    pub fn with_displacement(mut self, displacement: Vec2) -> Self {
        self.target_displacement = displacement;
        self
    }

    /// Set the activation flag of laser `index`, growing the flag vector if needed
    pub fn fire_laser(mut self, index: usize) -> Self {
        set_flag(&mut self.activate_lasers, index);
        self
    }

    pub fn activate_collector(mut self, index: usize) -> Self {
        set_flag(&mut self.activate_collectors, index);
        self
    }

    pub fn with_shipyard_order(mut self, index: usize, order: ShipyardOrder) -> Self {
        if self.shipyards.len() <= index {
            self.shipyards.resize(index + 1, ShipyardOrder::default());
        }
        self.shipyards[index] = order;
        self
    }

    pub fn laser_active(&self, index: usize) -> bool {
        self.activate_lasers.get(index).copied().unwrap_or(false)
    }

    pub fn collector_active(&self, index: usize) -> bool {
        self.activate_collectors.get(index).copied().unwrap_or(false)
    }

    pub fn shipyard_order(&self, index: usize) -> Option<&ShipyardOrder> {
        self.shipyards.get(index)
    }
}

fn set_flag(flags: &mut Vec<bool>, index: usize) {
    if flags.len() <= index {
        flags.resize(index + 1, false);
    }
    flags[index] = true;
}

/// One player's commands for one tick
///
/// Keyed by vessel identity; vessels without an entry do nothing. The
/// roster size the commands were authored against travels with them so the
/// simulator can reject batches written for a different roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub roster_size: usize,
    pub commands: BTreeMap<VesselId, Command>,
}

impl PlayerAction {
    pub fn new(roster_size: usize) -> Self {
        Self {
            roster_size,
            commands: BTreeMap::new(),
        }
    }

    /// No commands, authored against the given roster
    pub fn idle(progress: &PlayerProgress) -> Self {
        Self::new(progress.vessels.len())
    }

    pub fn with_command(mut self, vessel: VesselId, command: Command) -> Self {
        self.commands.insert(vessel, command);
        self
    }

    pub fn command_for(&self, vessel: VesselId) -> Option<&Command> {
        self.commands.get(&vessel)
    }
}

/// Every player's action for exactly one simulation step, in player order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameTick {
    pub player_actions: Vec<PlayerAction>,
}

impl GameTick {
    pub fn new(player_actions: Vec<PlayerAction>) -> Self {
        Self { player_actions }
    }
}

/// A player's actions for every tick of one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnPlan {
    pub actions: Vec<PlayerAction>,
}

impl TurnPlan {
    pub fn new(actions: Vec<PlayerAction>) -> Self {
        Self { actions }
    }

    /// The same action repeated for `ticks` ticks
    pub fn repeated(action: PlayerAction, ticks: usize) -> Self {
        Self {
            actions: vec![action; ticks],
        }
    }
}
