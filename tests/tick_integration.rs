//! Tick integration tests
//!
//! Drive `advance` end to end through the public API: energy budgets,
//! evaluation-order contention, beam damage, shipyard launches and mining.

use std::f32::consts::PI;

use glam::{IVec2, Vec2};

use pixel_armada::command::{Command, GameTick, PlayerAction, ShipyardOrder};
use pixel_armada::core::{MatchConfig, ValidationError, VesselId};
use pixel_armada::entity::{
    Asteroid, FunctionalRole, Game, Gamestate, Player, Vessel, VesselBlueprint,
};
use pixel_armada::simulation::{advance, History};

// ============================================================================
// Fixtures
// ============================================================================

/// Config with one-second ticks
fn one_second_ticks() -> MatchConfig {
    MatchConfig {
        ticks_per_turn: 1,
        seconds_per_turn: 1.0,
        ..MatchConfig::default()
    }
}

/// Single-lane gunship: laser at the origin, core behind it, hull behind that
fn duelist(position: Vec2, facing: f32) -> Vessel {
    VesselBlueprint::new()
        .light_hull_block(IVec2::new(0, -2), 1, 1)
        .power_core(IVec2::new(0, -1), 10.0, 1.0)
        .laser(IVec2::ZERO, 0.0, 1.0, 2.0)
        .at(position, facing)
        .build()
}

fn game_with(config: MatchConfig, red: Vessel, blue: Vessel, blue_team: u32) -> Game {
    Game::new(
        config,
        vec![
            Player::new("Red", 0, vec![red]),
            Player::new("Blue", blue_team, vec![blue]),
        ],
    )
}

fn fire_all(state: &Gamestate) -> GameTick {
    GameTick::new(
        state
            .player_progresses
            .iter()
            .map(|progress| {
                progress
                    .vessels
                    .iter()
                    .fold(PlayerAction::idle(progress), |action, vessel| {
                        action.with_command(vessel.id, Command::idle().fire_laser(0))
                    })
            })
            .collect(),
    )
}

fn idle_tick(state: &Gamestate) -> GameTick {
    GameTick::new(state.player_progresses.iter().map(PlayerAction::idle).collect())
}

fn vessel(state: &Gamestate, player: usize, index: usize) -> &Vessel {
    &state.player_progresses[player].vessels[index]
}

// ============================================================================
// Energy-budgeted movement
// ============================================================================

#[test]
fn test_single_engine_analytic_movement() {
    let ship = VesselBlueprint::new()
        .power_core(IVec2::ZERO, 10.0, 1.0)
        .engine(IVec2::new(0, -1), 0.0, 2.0, 1.0)
        .build();
    let weight = ship.weight();
    let game = Game::new(one_second_ticks(), vec![Player::new("Solo", 0, vec![ship])]);
    let source = game.build_first_gamestate(vec![]).unwrap();

    let tick = GameTick::new(vec![PlayerAction::new(1).with_command(
        VesselId(0),
        Command::idle().with_displacement(Vec2::new(0.0, 5.0)),
    )]);
    let next = advance(&game, &source, &tick).unwrap();

    let moved = vessel(&next, 0, 0);
    // Thrust 10 over weight W for one second; the 5-unit request is out of reach
    assert!((moved.position.y - 10.0 / weight).abs() < 1e-6, "y = {}", moved.position.y);
    assert!(moved.position.x.abs() < 1e-6);
    // Cost rate 1/s scaled by the fraction of the request achieved
    assert!(
        (moved.stored_energy() - (10.0 - 2.0 / weight)).abs() < 1e-5,
        "energy = {}",
        moved.stored_energy()
    );
}

#[test]
fn test_idle_tick_is_a_no_op() {
    let game = game_with(
        one_second_ticks(),
        duelist(Vec2::ZERO, 0.0),
        duelist(Vec2::new(0.0, 5.0), PI),
        1,
    );
    let source = game.build_first_gamestate(vec![]).unwrap();

    let next = advance(&game, &source, &idle_tick(&source)).unwrap();

    assert_eq!(next.player_progresses, source.player_progresses);
    assert_eq!(next.asteroids, source.asteroids);
    assert_eq!(next.sequence, source.sequence + 1);
}

// ============================================================================
// Evaluation order
// ============================================================================

#[test]
fn test_first_tick_lets_last_player_shoot_first() {
    let game = game_with(
        one_second_ticks(),
        duelist(Vec2::ZERO, 0.0),
        duelist(Vec2::new(0.0, 5.0), PI),
        1,
    );
    let source = game.build_first_gamestate(vec![]).unwrap();

    // History length 1 is odd: Blue acts before Red
    let next = advance(&game, &source, &fire_all(&source)).unwrap();

    let red = vessel(&next, 0, 0);
    let blue = vessel(&next, 1, 0);
    assert!(red.lasers[0].is_empty(), "Blue's beam takes out Red's laser first");
    assert_eq!(red.stored_energy(), 10.0, "a wrecked laser cannot fire");
    assert_eq!(blue.lasers[0].pixel_count(), 1);
    assert_eq!(blue.lasers[0].damage(), &[0.0]);
    assert_eq!(blue.stored_energy(), 9.0);
}

#[test]
fn test_second_tick_lets_first_player_shoot_first() {
    let game = game_with(
        one_second_ticks(),
        duelist(Vec2::ZERO, 0.0),
        duelist(Vec2::new(0.0, 5.0), PI),
        1,
    );
    let mut history = History::new(game.build_first_gamestate(vec![]).unwrap());
    let idle = idle_tick(history.latest());
    history.commit(&game, &idle).unwrap();

    // History length 2 is even: Red acts first
    let tick = fire_all(history.latest());
    let next = history.commit(&game, &tick).unwrap();

    assert_eq!(vessel(next, 0, 0).lasers[0].pixel_count(), 1);
    assert!(vessel(next, 1, 0).lasers[0].is_empty());
}

// ============================================================================
// Beams
// ============================================================================

#[test]
fn test_pixels_destroyed_before_later_vessels_move() {
    let red = duelist(Vec2::ZERO, 0.0);
    // Blue's engine is its pixel nearest to Red's muzzle
    let blue = VesselBlueprint::new()
        .light_hull_block(IVec2::new(0, -3), 1, 1)
        .power_core(IVec2::new(0, -2), 10.0, 1.0)
        .engine(IVec2::ZERO, 0.0, 2.0, 1.0)
        .at(Vec2::new(0.0, 5.0), PI)
        .build();
    let game = game_with(one_second_ticks(), red, blue, 1);
    let mut history = History::new(game.build_first_gamestate(vec![]).unwrap());
    let idle = idle_tick(history.latest());
    history.commit(&game, &idle).unwrap();

    let state = history.latest();
    // Blue faces down, so its engine pushes toward -y
    let escape = Command::idle().with_displacement(Vec2::new(0.0, -1.0));
    let tick = GameTick::new(vec![
        PlayerAction::idle(&state.player_progresses[0])
            .with_command(VesselId(0), Command::idle().fire_laser(0)),
        PlayerAction::idle(&state.player_progresses[1]).with_command(VesselId(1), escape.clone()),
    ]);
    let next = advance(&game, state, &tick).unwrap();

    let blue = vessel(&next, 1, 0);
    assert!(blue.engines[0].is_empty());
    assert_eq!(blue.position, Vec2::new(0.0, 5.0), "no engine left to move with");

    // Without the shot the same order moves Blue
    let calm = GameTick::new(vec![
        PlayerAction::idle(&state.player_progresses[0]),
        PlayerAction::idle(&state.player_progresses[1]).with_command(VesselId(1), escape),
    ]);
    let moved = advance(&game, state, &calm).unwrap();
    assert_ne!(vessel(&moved, 1, 0).position, Vec2::new(0.0, 5.0));
}

#[test]
fn test_allies_never_damage_each_other() {
    let game = game_with(
        one_second_ticks(),
        duelist(Vec2::ZERO, 0.0),
        duelist(Vec2::new(0.0, 5.0), PI),
        0,
    );
    let source = game.build_first_gamestate(vec![]).unwrap();

    let next = advance(&game, &source, &fire_all(&source)).unwrap();

    for player in 0..2 {
        let v = vessel(&next, player, 0);
        assert_eq!(v.pixel_count(), 3, "player {} took damage from an ally", player);
        assert_eq!(v.stored_energy(), 9.0, "lasers still pay for firing");
    }
}

#[test]
fn test_destroyed_vessel_stays_in_roster() {
    // A single hull pixel in front of an uncharged core
    let target = VesselBlueprint::new()
        .light_hull_block(IVec2::new(0, -1), 1, 1)
        .at(Vec2::new(0.0, 3.0), 0.0)
        .build();
    let game = game_with(one_second_ticks(), duelist(Vec2::ZERO, 0.0), target, 1);
    let source = game.build_first_gamestate(vec![]).unwrap();

    let tick = GameTick::new(vec![
        PlayerAction::new(1).with_command(VesselId(0), Command::idle().fire_laser(0)),
        PlayerAction::new(1),
    ]);
    let next = advance(&game, &source, &tick).unwrap();

    let roster = &next.player_progresses[1].vessels;
    assert_eq!(roster.len(), 1);
    assert!(roster[0].is_destroyed());
}

// ============================================================================
// Shipyards and identity
// ============================================================================

fn dock() -> Vessel {
    VesselBlueprint::new()
        .light_hull_block(IVec2::new(-1, -1), 3, 3)
        .power_core(IVec2::ZERO, 20.0, 1.0)
        .shipyard(IVec2::new(0, 2), 2.0, 2.0)
        .at(Vec2::new(10.0, 10.0), 0.0)
        .build()
}

/// Weight 4
fn drone() -> Vessel {
    VesselBlueprint::new().light_hull_block(IVec2::ZERO, 2, 2).build()
}

#[test]
fn test_shipyard_launch_grows_roster_with_fresh_identity() {
    // Default config: half-second ticks, so the drone needs four ticks
    let game = game_with(MatchConfig::default(), dock(), dock(), 1);
    let mut history = History::new(game.build_first_gamestate(vec![]).unwrap());

    for step in 0..4 {
        let state = history.latest();
        let order = if step == 0 {
            ShipyardOrder::build(drone())
        } else {
            ShipyardOrder::keep_running()
        };
        let tick = GameTick::new(vec![
            PlayerAction::idle(&state.player_progresses[0])
                .with_command(VesselId(0), Command::idle().with_shipyard_order(0, order)),
            PlayerAction::idle(&state.player_progresses[1]),
        ]);
        history.commit(&game, &tick).unwrap();
    }

    let state = history.latest();
    let roster = &state.player_progresses[0].vessels;
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[1].id, VesselId(2), "identities 0 and 1 went to the motherships");
    assert_eq!(roster[1].position, Vec2::new(10.0, 12.0));
    assert_eq!(state.player_progresses[0].stored_resources, 96.0);
    assert_eq!(state.player_progresses[1].vessels.len(), 1);

    // Commands authored against the old roster are now stale
    let stale = GameTick::new(vec![PlayerAction::new(1), PlayerAction::new(1)]);
    assert_eq!(
        advance(&game, state, &stale),
        Err(ValidationError::VesselCommandMismatch {
            player: 0,
            roster: 2,
            authored: 1
        })
    );

    // Commands keep addressing vessels by identity after the roster grew
    let tick = GameTick::new(vec![
        PlayerAction::idle(&state.player_progresses[0])
            .with_command(VesselId(0), Command::idle().with_rotation(0.2)),
        PlayerAction::idle(&state.player_progresses[1]),
    ]);
    let next = advance(&game, state, &tick).unwrap();
    assert!((vessel(&next, 0, 0).facing - 0.2).abs() < 1e-6);
    assert_eq!(vessel(&next, 0, 1).facing, 0.0);
}

#[test]
fn test_cancel_keeps_resources_spent() {
    let game = game_with(MatchConfig::default(), dock(), dock(), 1);
    let mut history = History::new(game.build_first_gamestate(vec![]).unwrap());

    for order in [ShipyardOrder::build(drone()), ShipyardOrder::cancel()] {
        let state = history.latest();
        let tick = GameTick::new(vec![
            PlayerAction::idle(&state.player_progresses[0])
                .with_command(VesselId(0), Command::idle().with_shipyard_order(0, order)),
            PlayerAction::idle(&state.player_progresses[1]),
        ]);
        history.commit(&game, &tick).unwrap();
    }

    let state = history.latest();
    assert_eq!(state.player_progresses[0].stored_resources, 96.0);
    assert_eq!(state.player_progresses[0].vessels.len(), 1);
    let building = match vessel(state, 0, 0).shipyards[0].functional().map(|f| &f.role) {
        Some(FunctionalRole::Shipyard(shipyard)) => shipyard.is_building(),
        other => panic!("expected a shipyard, got {:?}", other),
    };
    assert!(!building, "cancel returns the shipyard to idle");
}

// ============================================================================
// Mining
// ============================================================================

#[test]
fn test_collector_mines_asteroid() {
    let miner = VesselBlueprint::new()
        .light_hull_block(IVec2::new(-1, -1), 3, 3)
        .power_core(IVec2::ZERO, 10.0, 1.0)
        .collector(IVec2::new(0, 1), 4.0, 2.0)
        .build();
    let game = Game::new(one_second_ticks(), vec![Player::new("Miner", 0, vec![miner])]);
    let source = game
        .build_first_gamestate(vec![Asteroid::new(Vec2::new(0.0, 2.0), 3.0)])
        .unwrap();

    let tick = GameTick::new(vec![
        PlayerAction::new(1).with_command(VesselId(0), Command::idle().activate_collector(0)),
    ]);
    let next = advance(&game, &source, &tick).unwrap();

    // 3 size * 2 quality * 1 second on top of the starting 100
    assert_eq!(next.player_progresses[0].stored_resources, 106.0);
    assert_eq!(vessel(&next, 0, 0).stored_energy(), 6.0);
    assert_eq!(next.asteroids, source.asteroids, "asteroids are not depleted");
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_inputs_give_identical_outputs() {
    let game = game_with(
        one_second_ticks(),
        duelist(Vec2::new(0.3, 0.1), 0.05),
        duelist(Vec2::new(0.1, 5.2), PI - 0.05),
        1,
    );
    let source = game.build_first_gamestate(vec![]).unwrap();
    let tick = fire_all(&source);

    let a = advance(&game, &source, &tick).unwrap();
    let b = advance(&game, &source, &tick).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
