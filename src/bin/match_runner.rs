//! Headless Match Runner
//!
//! Plays a scripted two-fleet skirmish and prints a JSON or text report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use pixel_armada::command::{Command, GameTick, PlayerAction, ShipyardOrder};
use pixel_armada::core::types::heading;
use pixel_armada::core::{ArmadaError, MatchConfig};
use pixel_armada::entity::blueprint::{fighter, mothership};
use pixel_armada::entity::{Game, Gamestate, Player, Vessel};
use pixel_armada::simulation::{History, TickEvent};
use pixel_armada::world::scatter_asteroids;

/// Headless Match Runner - scripted skirmish between two fleets
#[derive(Parser, Debug)]
#[command(name = "match_runner")]
#[command(about = "Run a scripted skirmish and report the final state")]
struct Args {
    /// Match configuration file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns to play
    #[arg(long, default_value_t = 3)]
    turns: u32,

    /// Asteroid field seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of asteroids (overrides the config)
    #[arg(long)]
    asteroids: Option<u32>,

    /// Distance fleets try to keep from their target
    #[arg(long, default_value_t = 12.0)]
    standoff: f32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Serialize, Default)]
struct EventTotals {
    lasers_fired: usize,
    pixel_hits: usize,
    pixels_destroyed: usize,
    vessels_launched: usize,
    resources_collected: f32,
}

#[derive(Serialize)]
struct PlayerReport {
    name: String,
    team: u32,
    vessels: usize,
    destroyed_vessels: usize,
    pixels: usize,
    stored_energy: f32,
    stored_resources: f32,
}

/// JSON output structure
#[derive(Serialize)]
struct MatchReport {
    game: String,
    ticks: u64,
    asteroids: usize,
    seed: u64,
    events: EventTotals,
    players: Vec<PlayerReport>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pixel_armada=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            print_report(&report, &args.format);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Match failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<MatchReport, ArmadaError> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.asteroids.seed = seed;
    }
    if let Some(count) = args.asteroids {
        config.asteroids.count = count;
    }
    config.validate()?;

    let asteroids = scatter_asteroids(&config);
    let seed = config.asteroids.seed;
    let (width, height) = (config.width, config.height);

    let game = Game::new(
        config,
        vec![
            Player::new(
                "Red",
                0,
                vec![mothership().at(Vec2::new(width / 2.0, height * 0.3), 0.0), fighter()],
            ),
            Player::new(
                "Blue",
                1,
                vec![
                    mothership().at(Vec2::new(width / 2.0, height * 0.7), std::f32::consts::PI),
                    fighter(),
                ],
            ),
        ],
    );
    let mut history = History::start(&game, game.build_first_gamestate(asteroids)?);
    let mut totals = EventTotals::default();

    let ticks = args.turns as usize * game.ticks_per_turn();
    for _ in 0..ticks {
        let tick = script_tick(&game, history.latest(), args.standoff);
        let events = history.commit_with_events(&game, &tick)?;
        tally(&mut totals, &events);
    }

    let latest = history.latest();
    tracing::info!(sequence = latest.sequence, "Match finished");

    Ok(MatchReport {
        game: game.id.0.to_string(),
        ticks: latest.sequence,
        asteroids: latest.asteroids.len(),
        seed,
        events: totals,
        players: game
            .players
            .iter()
            .zip(&latest.player_progresses)
            .map(|(player, progress)| PlayerReport {
                name: player.name.clone(),
                team: player.team,
                vessels: progress.vessels.len(),
                destroyed_vessels: progress.vessels.iter().filter(|v| v.is_destroyed()).count(),
                pixels: progress.vessels.iter().map(Vessel::pixel_count).sum(),
                stored_energy: progress.vessels.iter().map(Vessel::stored_energy).sum(),
                stored_resources: progress.stored_resources,
            })
            .collect(),
    })
}

/// Every surviving vessel turns toward and closes on the nearest enemy,
/// firing and mining throughout; shipyards keep producing fighters.
fn script_tick(game: &Game, state: &Gamestate, standoff: f32) -> GameTick {
    let actions = state
        .player_progresses
        .iter()
        .enumerate()
        .map(|(player, progress)| {
            let team = game.players[player].team;
            let escort = game.players[player].deck.get(1).cloned();
            progress
                .vessels
                .iter()
                .filter(|vessel| !vessel.is_destroyed())
                .fold(PlayerAction::idle(progress), |action, vessel| {
                    let command = scripted_command(game, state, vessel, team, escort.as_ref(), standoff);
                    action.with_command(vessel.id, command)
                })
        })
        .collect();
    GameTick::new(actions)
}

fn scripted_command(
    game: &Game,
    state: &Gamestate,
    vessel: &Vessel,
    team: u32,
    escort: Option<&Vessel>,
    standoff: f32,
) -> Command {
    let mut command = Command::for_vessel(vessel);
    command.activate_lasers.fill(true);
    command.activate_collectors.fill(true);
    for order in command.shipyards.iter_mut() {
        *order = match escort {
            Some(blueprint) => ShipyardOrder::build(blueprint.clone()),
            None => ShipyardOrder::keep_running(),
        };
    }

    let target = state
        .player_progresses
        .iter()
        .enumerate()
        .filter(|(player, _)| game.players.get(*player).is_some_and(|p| p.team != team))
        .flat_map(|(_, progress)| progress.vessels.iter())
        .filter(|enemy| !enemy.is_destroyed())
        .map(|enemy| enemy.position)
        .min_by(|a, b| a.distance(vessel.position).total_cmp(&b.distance(vessel.position)));

    let Some(target) = target else {
        return command;
    };
    let offset = target - vessel.position;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return command;
    }

    command.target_rotation = heading(vessel.facing).angle_between(offset);
    if distance > standoff {
        command.target_displacement = offset / distance * (distance - standoff);
    }
    command
}

fn tally(totals: &mut EventTotals, events: &[TickEvent]) {
    for event in events {
        match event {
            TickEvent::LaserFired { hits, .. } => {
                totals.lasers_fired += 1;
                totals.pixel_hits += hits.len();
            }
            TickEvent::PixelsDestroyed { count } => totals.pixels_destroyed += count,
            TickEvent::VesselLaunched { .. } => totals.vessels_launched += 1,
            TickEvent::ResourcesCollected { amount, .. } => totals.resources_collected += amount,
            _ => {}
        }
    }
}

fn print_report(report: &MatchReport, format: &str) {
    match format {
        "text" => {
            println!("Match Report");
            println!("============");
            println!("Game: {}", report.game);
            println!("Ticks: {}", report.ticks);
            println!("Asteroids: {} (seed {})", report.asteroids, report.seed);
            println!(
                "Lasers fired: {} ({} pixel hits, {} pixels destroyed)",
                report.events.lasers_fired, report.events.pixel_hits, report.events.pixels_destroyed
            );
            println!("Vessels launched: {}", report.events.vessels_launched);
            println!("Resources collected: {:.1}", report.events.resources_collected);
            println!();
            for player in &report.players {
                println!(
                    "{} (team {}): {} vessels ({} destroyed), {} pixels, {:.1} energy, {:.1} resources",
                    player.name,
                    player.team,
                    player.vessels,
                    player.destroyed_vessels,
                    player.pixels,
                    player.stored_energy,
                    player.stored_resources
                );
            }
        }
        other => {
            if other != "json" {
                tracing::warn!("Unknown format '{}', defaulting to json", other);
            }
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("Failed to serialize report: {}", e),
            }
        }
    }
}
