//! Match configuration and world snapshots

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::config::MatchConfig;
use crate::core::error::SetupError;
use crate::core::types::{GameId, VesselId};
use crate::entity::vessel::Vessel;

/// A participant in a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub elo: f32,
    /// Blueprints the player brings; the first is their mothership
    pub deck: Vec<Vessel>,
    pub research_thresholds: Vec<f32>,
    /// Players on the same team never damage each other
    pub team: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, team: u32, deck: Vec<Vessel>) -> Self {
        Self {
            name: name.into(),
            elo: 1000.0,
            deck,
            research_thresholds: Vec::new(),
            team,
        }
    }

    pub fn mothership(&self) -> Option<&Vessel> {
        self.deck.first()
    }
}

/// Immutable per-match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub config: MatchConfig,
    pub players: Vec<Player>,
}

impl Game {
    pub fn new(config: MatchConfig, players: Vec<Player>) -> Self {
        Self {
            id: GameId::new(),
            config,
            players,
        }
    }

    pub fn ticks_per_turn(&self) -> usize {
        self.config.ticks_per_turn as usize
    }

    /// Length of one simulation step in seconds
    pub fn seconds_per_tick(&self) -> f32 {
        self.config.seconds_per_tick()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Build the opening snapshot: every player fields their mothership
    pub fn build_first_gamestate(&self, asteroids: Vec<Asteroid>) -> Result<Gamestate, SetupError> {
        if self.players.is_empty() {
            return Err(SetupError::NoPlayers);
        }

        let mut gamestate = Gamestate {
            sequence: 0,
            next_vessel_id: 0,
            player_progresses: Vec::with_capacity(self.players.len()),
            asteroids,
        };

        for (index, player) in self.players.iter().enumerate() {
            let mothership = player
                .mothership()
                .ok_or(SetupError::EmptyDeck { player: index })?;
            let id = gamestate.allocate_vessel_id();
            gamestate.player_progresses.push(PlayerProgress {
                vessels: vec![mothership.clone().with_identity(id)],
                research: 0.0,
                stored_resources: self.config.starting_resources,
            });
        }

        Ok(gamestate)
    }
}

/// A mineable rock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub position: Vec2,
    pub size: f32,
}

impl Asteroid {
    pub fn new(position: Vec2, size: f32) -> Self {
        Self { position, size }
    }
}

/// Per-player state within one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Owned vessels; roster order is evaluation order
    pub vessels: Vec<Vessel>,
    pub research: f32,
    pub stored_resources: f32,
}

impl PlayerProgress {
    pub fn index_of(&self, id: VesselId) -> Option<usize> {
        self.vessels.iter().position(|v| v.id == id)
    }
}

/// One world snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gamestate {
    /// Position of this snapshot in match history (opening snapshot is 0)
    pub sequence: u64,
    /// Next unused vessel identity
    pub next_vessel_id: u64,
    pub player_progresses: Vec<PlayerProgress>,
    pub asteroids: Vec<Asteroid>,
}

impl Gamestate {
    /// Reserve a fresh vessel identity
    pub fn allocate_vessel_id(&mut self) -> VesselId {
        let id = VesselId(self.next_vessel_id);
        self.next_vessel_id += 1;
        id
    }

    /// Every vessel, player by player in roster order
    pub fn vessels(&self) -> impl Iterator<Item = &Vessel> {
        self.player_progresses.iter().flat_map(|p| p.vessels.iter())
    }

    /// Find a vessel and its owning player's index
    pub fn vessel(&self, id: VesselId) -> Option<(usize, &Vessel)> {
        self.player_progresses
            .iter()
            .enumerate()
            .find_map(|(player, progress)| {
                progress.vessels.iter().find(|v| v.id == id).map(|v| (player, v))
            })
    }

    /// Number of snapshots in history up to and including this one
    pub fn history_len(&self) -> u64 {
        self.sequence + 1
    }
}
