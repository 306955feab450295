//! Energy-budgeted rotation and movement
//!
//! Both phases follow the same budget: work out how much the command wants,
//! how much the power core can afford this tick, apply the smaller of the
//! two and draw only the energy that was actually used.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use crate::core::types::heading;
use crate::entity::component::FunctionalRole;
use crate::entity::vessel::Vessel;

/// Largest share of stored energy a vessel may spend turning in one tick
pub const MAX_TURNING_ENERGY_PORTION: f32 = 1.0 / 6.0;

/// What a kinematic phase actually did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionOutcome {
    /// Radians turned or units travelled (unsigned)
    pub applied: f32,
    pub energy_spent: f32,
}

/// Turn toward `target_rotation` radians within the energy budget
pub fn apply_rotation(vessel: &mut Vessel, target_rotation: f32) -> MotionOutcome {
    let desired = target_rotation.abs();
    let radians_per_energy = vessel.energy_to_radians_conversion();
    if !desired.is_finite() || desired <= 0.0 || radians_per_energy <= 0.0 {
        return MotionOutcome::default();
    }

    let stored = vessel.stored_energy();
    let affordable_energy = stored.min(stored * MAX_TURNING_ENERGY_PORTION);
    let possible = affordable_energy * radians_per_energy;
    let applied = desired.min(possible);

    let energy_spent = vessel.spend_energy(applied / radians_per_energy);
    if target_rotation >= 0.0 {
        vessel.facing += applied;
    } else {
        vessel.facing -= applied;
    }

    MotionOutcome {
        applied,
        energy_spent,
    }
}

/// Unsigned angle between a direction and the vessel's heading, in [0, PI]
fn angle_off_heading(vessel: &Vessel, direction: Vec2) -> f32 {
    direction
        .angle_between(heading(vessel.facing))
        .clamp(-PI, PI)
        .abs()
}

/// Speed the engines can push the vessel along `direction`
///
/// Each engine contributes its thrust over vessel weight, scaled down
/// linearly the further the direction is from the vessel's heading.
pub fn units_per_second_in_direction(vessel: &Vessel, direction: Vec2) -> f32 {
    let weight = vessel.weight();
    if weight <= 0.0 || direction == Vec2::ZERO {
        return 0.0;
    }
    let off_ratio = angle_off_heading(vessel, direction) / PI;
    vessel
        .engines
        .iter()
        .filter_map(|engine| engine.functional())
        .map(|engine| (1.0 - off_ratio) * engine.thrust_per_second() / weight)
        .sum()
}

/// Energy per second drawn by engines firing along `direction`
///
/// Only counted while the direction is within 90 degrees of the heading.
pub fn energy_cost_per_second_in_direction(vessel: &Vessel, direction: Vec2) -> f32 {
    if direction == Vec2::ZERO || angle_off_heading(vessel, direction) >= FRAC_PI_2 {
        return 0.0;
    }
    vessel
        .engines
        .iter()
        .filter_map(|engine| engine.functional())
        .filter(|engine| matches!(engine.role, FunctionalRole::Engine))
        .map(|engine| engine.energy_cost_per_second())
        .sum()
}

/// Move toward `target_displacement` within the energy budget
pub fn apply_movement(vessel: &mut Vessel, target_displacement: Vec2, tick_seconds: f32) -> MotionOutcome {
    let desired = target_displacement.length();
    if !desired.is_finite() || desired <= 0.0 || tick_seconds <= 0.0 {
        return MotionOutcome::default();
    }

    let units_per_second = units_per_second_in_direction(vessel, target_displacement);
    let possible = tick_seconds * units_per_second;
    let cost_rate = energy_cost_per_second_in_direction(vessel, target_displacement);
    let seconds_of_energy = if cost_rate > 0.0 {
        vessel.stored_energy() / cost_rate
    } else {
        f32::INFINITY
    };
    let seconds_this_tick = tick_seconds.min(seconds_of_energy);

    let applied = desired.min(possible) * (seconds_this_tick / tick_seconds);
    if applied <= 0.0 {
        return MotionOutcome::default();
    }

    vessel.position += target_displacement / desired * applied;
    let energy_spent = vessel.spend_energy((applied / desired) * tick_seconds * cost_rate);

    MotionOutcome {
        applied,
        energy_spent,
    }
}
