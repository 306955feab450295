//! Asteroid mining

use crate::entity::game::{Asteroid, Gamestate};

/// Resources one collector gathered this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collection {
    pub collector: usize,
    pub asteroid: usize,
    pub resources: f32,
    pub energy_spent: f32,
}

/// Largest asteroid strictly within `radius` of `point`; earliest wins ties
fn largest_in_range(asteroids: &[Asteroid], point: glam::Vec2, radius: f32) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, asteroid) in asteroids.iter().enumerate() {
        if asteroid.position.distance(point) >= radius {
            continue;
        }
        if best.map_or(true, |b| asteroid.size > asteroids[b].size) {
            best = Some(index);
        }
    }
    best
}

/// Run every activated collector of one vessel
///
/// A collector with nothing in range costs nothing. Otherwise it mines only
/// while the vessel holds more energy than the collector's cost for the tick.
pub fn run_collectors(
    gamestate: &mut Gamestate,
    player: usize,
    vessel_index: usize,
    activated: impl Fn(usize) -> bool,
    tick_seconds: f32,
) -> Vec<Collection> {
    let Gamestate {
        player_progresses,
        asteroids,
        ..
    } = gamestate;
    let Some(progress) = player_progresses.get_mut(player) else {
        return Vec::new();
    };
    let Some(vessel) = progress.vessels.get_mut(vessel_index) else {
        return Vec::new();
    };

    let mut collections = Vec::new();
    for collector in (0..vessel.collectors.len()).filter(|&i| activated(i)) {
        let component = &vessel.collectors[collector];
        let Some(stats) = component.functional() else {
            continue;
        };
        let point = vessel.pixel_to_world(component.root);
        let Some(asteroid) = largest_in_range(asteroids, point, stats.collection_radius()) else {
            continue;
        };

        let cost = stats.energy_cost_per_second() * tick_seconds;
        let resources = stats.resources_per_second(asteroids[asteroid].size) * tick_seconds;
        if vessel.stored_energy() <= cost {
            continue;
        }

        let energy_spent = vessel.spend_energy(cost);
        progress.stored_resources += resources;
        collections.push(Collection {
            collector,
            asteroid,
            resources,
            energy_spent,
        });
    }
    collections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::blueprint::VesselBlueprint;
    use crate::entity::game::PlayerProgress;
    use crate::entity::vessel::Vessel;
    use glam::{IVec2, Vec2};

    /// Collector of size 4 (radius 2, cost 4/s) and quality 3 at local (0, 1)
    fn miner() -> Vessel {
        VesselBlueprint::new()
            .power_core(IVec2::ZERO, 10.0, 1.0)
            .collector(IVec2::new(0, 1), 4.0, 3.0)
            .build()
    }

    fn state_with(vessel: Vessel, asteroids: Vec<Asteroid>) -> Gamestate {
        Gamestate {
            sequence: 0,
            next_vessel_id: 1,
            player_progresses: vec![PlayerProgress {
                vessels: vec![vessel],
                research: 0.0,
                stored_resources: 0.0,
            }],
            asteroids,
        }
    }

    #[test]
    fn test_mines_largest_asteroid_in_range() {
        let asteroids = vec![
            Asteroid::new(Vec2::new(0.0, 2.0), 2.0),
            Asteroid::new(Vec2::new(1.0, 1.0), 5.0),
            Asteroid::new(Vec2::new(0.0, 9.0), 50.0),
        ];
        let mut gamestate = state_with(miner(), asteroids);

        let collections = run_collectors(&mut gamestate, 0, 0, |_| true, 0.5);

        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].asteroid, 1, "the out-of-range giant is ignored");
        // 5 * 3 * 0.5
        assert!((collections[0].resources - 7.5).abs() < 1e-6);
        assert!((gamestate.player_progresses[0].stored_resources - 7.5).abs() < 1e-6);
        assert!((gamestate.player_progresses[0].vessels[0].stored_energy() - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_range_is_strict() {
        // Collector sits at (0, 1); radius 2 reaches (0, 3) only on the boundary
        let mut gamestate = state_with(miner(), vec![Asteroid::new(Vec2::new(0.0, 3.0), 4.0)]);
        assert!(run_collectors(&mut gamestate, 0, 0, |_| true, 0.5).is_empty());
        assert_eq!(gamestate.player_progresses[0].vessels[0].stored_energy(), 10.0);
    }

    #[test]
    fn test_ties_keep_first_asteroid() {
        let asteroids = vec![
            Asteroid::new(Vec2::new(0.5, 1.0), 3.0),
            Asteroid::new(Vec2::new(-0.5, 1.0), 3.0),
        ];
        let mut gamestate = state_with(miner(), asteroids);
        let collections = run_collectors(&mut gamestate, 0, 0, |_| true, 0.5);
        assert_eq!(collections[0].asteroid, 0);
    }

    #[test]
    fn test_needs_more_energy_than_cost() {
        let mut vessel = miner();
        vessel.spend_energy(8.0);
        let mut gamestate = state_with(vessel, vec![Asteroid::new(Vec2::new(0.0, 1.5), 1.0)]);

        // Cost is exactly the 2 stored energy
        assert!(run_collectors(&mut gamestate, 0, 0, |_| true, 0.5).is_empty());
        assert_eq!(gamestate.player_progresses[0].stored_resources, 0.0);
    }

    #[test]
    fn test_collector_position_follows_facing() {
        let mut vessel = miner();
        vessel.facing = std::f32::consts::PI;
        // Facing down, the collector root (0, 1) is at world (0, -1)
        let mut gamestate = state_with(vessel, vec![Asteroid::new(Vec2::new(0.0, -1.5), 1.0)]);
        assert_eq!(run_collectors(&mut gamestate, 0, 0, |_| true, 0.5).len(), 1);
    }
}
