//! Laser beams
//!
//! A firing laser sweeps a rectangle in front of its muzzle, split into
//! unit-wide lanes along the beam. Each lane stops at the nearest enemy pixel
//! inside it, and that pixel takes one tick's worth of damage.

use glam::Vec2;
use ordered_float::OrderedFloat;

use crate::core::types::rotate;
use crate::entity::game::{Game, Gamestate};
use crate::entity::vessel::Vessel;

/// The rectangle swept by one laser this tick
#[derive(Debug, Clone, PartialEq)]
pub struct BeamStrip {
    origin: Vec2,
    forward: Vec2,
    step: Vec2,
    rails: Vec<Vec2>,
    length: f32,
}

impl BeamStrip {
    /// Strip starting at `origin`, pointing along `direction` radians
    ///
    /// The strip is centred on the muzzle and split into `round(width)` lanes.
    pub fn new(origin: Vec2, direction: f32, width: f32, length: f32) -> Self {
        let forward = rotate(Vec2::Y, direction);
        // Clockwise perpendicular
        let right = Vec2::new(forward.y, -forward.x);
        let lanes = width.round().max(0.0) as usize;
        let step = if lanes > 0 {
            right * (width / lanes as f32)
        } else {
            Vec2::ZERO
        };
        let left_edge = origin - right * (width / 2.0);
        let rails = (0..=lanes).map(|a| left_edge + step * a as f32).collect();

        Self {
            origin,
            forward,
            step,
            rails,
            length,
        }
    }

    /// Strip fired by laser `laser` of `vessel`, or `None` if it isn't one
    pub fn for_laser(vessel: &Vessel, laser: usize) -> Option<Self> {
        let component = vessel.lasers.get(laser)?;
        let stats = component.functional()?;
        let origin = vessel.pixel_to_world(component.root);
        Some(Self::new(
            origin,
            vessel.facing + stats.facing,
            stats.beam_width(),
            stats.beam_length(),
        ))
    }

    pub fn lane_count(&self) -> usize {
        self.rails.len().saturating_sub(1)
    }

    /// Lane containing `point`, if the point is inside the strip
    ///
    /// A lane owns the points strictly right of its left rail and on or left
    /// of its right rail, strictly ahead of the muzzle and no further than
    /// the beam length.
    pub fn lane_of(&self, point: Vec2) -> Option<usize> {
        let along = self.forward.dot(point - self.origin);
        if along <= 0.0 || along > self.length {
            return None;
        }
        self.rails.windows(2).position(|rails| {
            self.step.dot(point - rails[0]) > 0.0 && self.step.dot(point - rails[1]) <= 0.0
        })
    }
}

/// Address of one pixel in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelAddress {
    pub player: usize,
    pub vessel: usize,
    /// Index in [`Vessel::pixel_components`] order
    pub component: usize,
    pub pixel: usize,
}

/// Nearest enemy pixel caught in one lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamHit {
    pub lane: usize,
    pub target: PixelAddress,
    pub distance_squared: f32,
}

/// Nearest enemy pixel per lane of `strip`
///
/// Enemies are players on a team other than `team`. Pixels are scanned
/// player, vessel, component, pixel in ascending order and a lane only
/// switches target for a strictly closer pixel, so equidistant pixels
/// resolve to the lowest address.
pub fn resolve_hits(game: &Game, gamestate: &Gamestate, strip: &BeamStrip, team: u32) -> Vec<BeamHit> {
    let mut lanes: Vec<Option<BeamHit>> = vec![None; strip.lane_count()];
    if lanes.is_empty() {
        return Vec::new();
    }

    for (player, progress) in gamestate.player_progresses.iter().enumerate() {
        let is_enemy = game.players.get(player).is_some_and(|p| p.team != team);
        if !is_enemy {
            continue;
        }
        for (vessel_index, vessel) in progress.vessels.iter().enumerate() {
            for (component_index, component) in vessel.pixel_components().enumerate() {
                for pixel in 0..component.pixel_count() {
                    let Some(local) = component.local_pixel(pixel) else {
                        continue;
                    };
                    let world = vessel.pixel_to_world(local);
                    let Some(lane) = strip.lane_of(world) else {
                        continue;
                    };
                    let distance_squared = strip.origin.distance_squared(world);
                    let closer = match &lanes[lane] {
                        Some(best) => {
                            OrderedFloat(distance_squared) < OrderedFloat(best.distance_squared)
                        }
                        None => true,
                    };
                    if closer {
                        lanes[lane] = Some(BeamHit {
                            lane,
                            target: PixelAddress {
                                player,
                                vessel: vessel_index,
                                component: component_index,
                                pixel,
                            },
                            distance_squared,
                        });
                    }
                }
            }
        }
    }

    lanes.into_iter().flatten().collect()
}

/// Result of one laser's attempt to fire
#[derive(Debug, Clone, PartialEq)]
pub struct LaserShot {
    pub laser: usize,
    pub energy_spent: f32,
    pub hits: Vec<BeamHit>,
}

/// Fire every activated laser of one vessel
///
/// A laser fires only if the vessel holds at least its energy cost for the
/// tick. The cost is paid whether or not anything is in the beam. Damage is
/// written to pixel counters only; removal happens in the pruning pass.
pub fn fire_lasers(
    game: &Game,
    gamestate: &mut Gamestate,
    player: usize,
    vessel_index: usize,
    activated: impl Fn(usize) -> bool,
    tick_seconds: f32,
) -> Vec<LaserShot> {
    let team = match game.players.get(player) {
        Some(p) => p.team,
        None => return Vec::new(),
    };
    let laser_count = match vessel_at(gamestate, player, vessel_index) {
        Some(vessel) => vessel.lasers.len(),
        None => return Vec::new(),
    };

    let mut shots = Vec::new();
    for laser in (0..laser_count).filter(|&i| activated(i)) {
        let Some(vessel) = vessel_at(gamestate, player, vessel_index) else {
            break;
        };
        let Some(cost) = vessel.lasers[laser]
            .functional()
            .map(|f| f.energy_cost_per_second() * tick_seconds)
        else {
            continue;
        };
        if vessel.stored_energy() < cost {
            continue;
        }
        let Some(strip) = BeamStrip::for_laser(vessel, laser) else {
            continue;
        };

        let hits = resolve_hits(game, gamestate, &strip, team);
        for hit in &hits {
            let target = hit.target;
            if let Some(component) = gamestate
                .player_progresses
                .get_mut(target.player)
                .and_then(|p| p.vessels.get_mut(target.vessel))
                .and_then(|v| v.component_mut(target.component))
            {
                component.add_damage(target.pixel, tick_seconds);
            }
        }

        let energy_spent = gamestate.player_progresses[player].vessels[vessel_index].spend_energy(cost);
        shots.push(LaserShot {
            laser,
            energy_spent,
            hits,
        });
    }
    shots
}

fn vessel_at(gamestate: &Gamestate, player: usize, vessel_index: usize) -> Option<&Vessel> {
    gamestate
        .player_progresses
        .get(player)
        .and_then(|p| p.vessels.get(vessel_index))
}
