//! Append-only match history
//!
//! Snapshot `n` is the world after `n` ticks. Past snapshots are never
//! mutated; committing a tick appends the snapshot it produces.

use serde::{Deserialize, Serialize, Serializer};

use crate::command::orders::{GameTick, TurnPlan};
use crate::core::error::ValidationError;
use crate::entity::game::{Game, Gamestate};
use crate::simulation::tick::{advance, advance_with_events, TickEvent};

/// Ordered snapshots of one match, never empty
///
/// Persists as `{ "snapshots": [...] }`; an empty list is rejected on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "HistoryRepr")]
pub struct History {
    first: Gamestate,
    later: Vec<Gamestate>,
}

#[derive(Deserialize)]
struct HistoryRepr {
    snapshots: Vec<Gamestate>,
}

#[derive(Serialize)]
struct HistoryView<'a> {
    snapshots: Vec<&'a Gamestate>,
}

impl TryFrom<HistoryRepr> for History {
    type Error = String;

    fn try_from(repr: HistoryRepr) -> Result<Self, Self::Error> {
        let mut snapshots = repr.snapshots.into_iter();
        let first = snapshots
            .next()
            .ok_or_else(|| "history has no snapshots".to_string())?;
        Ok(Self {
            first,
            later: snapshots.collect(),
        })
    }
}

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HistoryView {
            snapshots: self.snapshots().collect(),
        }
        .serialize(serializer)
    }
}

impl History {
    pub fn new(first: Gamestate) -> Self {
        Self {
            first,
            later: Vec::new(),
        }
    }

    /// Start a history from the game's opening snapshot
    pub fn start(game: &Game, first: Gamestate) -> Self {
        tracing::info!(
            game = %game.id.0,
            players = game.player_count(),
            "Match started"
        );
        Self::new(first)
    }

    pub fn len(&self) -> usize {
        self.later.len() + 1
    }

    /// Always false; a history holds at least its opening snapshot
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn latest(&self) -> &Gamestate {
        self.later.last().unwrap_or(&self.first)
    }

    pub fn get(&self, index: usize) -> Option<&Gamestate> {
        match index {
            0 => Some(&self.first),
            n => self.later.get(n - 1),
        }
    }

    /// Snapshots from the opening one to the latest
    pub fn snapshots(&self) -> impl Iterator<Item = &Gamestate> + '_ {
        std::iter::once(&self.first).chain(self.later.iter())
    }

    /// Apply one tick to the latest snapshot and append the result
    pub fn commit(&mut self, game: &Game, tick: &GameTick) -> Result<&Gamestate, ValidationError> {
        let next = advance(game, self.latest(), tick)?;
        self.later.push(next);
        Ok(self.latest())
    }

    /// [`History::commit`], returning the events of the committed tick
    pub fn commit_with_events(&mut self, game: &Game, tick: &GameTick) -> Result<Vec<TickEvent>, ValidationError> {
        let (next, events) = advance_with_events(game, self.latest(), tick)?;
        self.later.push(next);
        Ok(events)
    }

    /// Apply a whole turn: every player's plan, tick by tick
    ///
    /// Either every tick of the turn is appended or none is. Plans must cover
    /// exactly `ticks_per_turn` ticks.
    pub fn commit_turn(&mut self, game: &Game, plans: &[TurnPlan]) -> Result<&Gamestate, ValidationError> {
        if plans.len() != game.player_count() {
            return Err(ValidationError::PlayerCountMismatch {
                expected: game.player_count(),
                found: plans.len(),
            });
        }
        let ticks = game.ticks_per_turn();
        if let Some((player, plan)) = plans
            .iter()
            .enumerate()
            .find(|(_, plan)| plan.actions.len() != ticks)
        {
            return Err(ValidationError::TurnLengthMismatch {
                player,
                expected: ticks,
                found: plan.actions.len(),
            });
        }

        let mut produced: Vec<Gamestate> = Vec::with_capacity(ticks);
        for t in 0..ticks {
            let tick = GameTick::new(plans.iter().map(|plan| plan.actions[t].clone()).collect());
            let source = produced.last().unwrap_or_else(|| self.latest());
            let next = advance(game, source, &tick)?;
            produced.push(next);
        }

        self.later.extend(produced);
        tracing::info!(sequence = self.latest().sequence, "Turn committed");
        Ok(self.latest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::orders::PlayerAction;
    use crate::core::config::MatchConfig;
    use crate::entity::blueprint::mothership;
    use crate::entity::game::Player;

    fn setup(ticks_per_turn: u32) -> (Game, History) {
        let config = MatchConfig {
            ticks_per_turn,
            ..MatchConfig::default()
        };
        let game = Game::new(
            config,
            vec![
                Player::new("Red", 0, vec![mothership()]),
                Player::new("Blue", 1, vec![mothership()]),
            ],
        );
        let first = game.build_first_gamestate(vec![]).unwrap();
        (game, History::new(first))
    }

    fn idle_plan(ticks: usize) -> TurnPlan {
        TurnPlan::repeated(PlayerAction::new(1), ticks)
    }

    #[test]
    fn test_commit_appends_snapshot() {
        let (game, mut history) = setup(4);
        let tick = GameTick::new(vec![PlayerAction::new(1), PlayerAction::new(1)]);

        let sequence = history.commit(&game, &tick).unwrap().sequence;

        assert_eq!(sequence, 1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().sequence, 0);
    }

    #[test]
    fn test_failed_commit_leaves_history_alone() {
        let (game, mut history) = setup(4);
        let tick = GameTick::new(vec![PlayerAction::new(1)]);

        assert!(history.commit(&game, &tick).is_err());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_commit_with_events_appends_snapshot() {
        let (game, mut history) = setup(4);
        let tick = GameTick::new(vec![PlayerAction::new(1), PlayerAction::new(1)]);

        let events = history.commit_with_events(&game, &tick).unwrap();

        assert!(events.is_empty(), "idle tick produces no events");
        assert_eq!(history.latest().sequence, 1);
    }

    #[test]
    fn test_commit_turn_appends_every_tick() {
        let (game, mut history) = setup(4);

        history.commit_turn(&game, &[idle_plan(4), idle_plan(4)]).unwrap();

        assert_eq!(history.len(), 5);
        let sequences: Vec<u64> = history.snapshots().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_commit_turn_checks_plan_length_first() {
        let (game, mut history) = setup(4);

        let result = history.commit_turn(&game, &[idle_plan(4), idle_plan(3)]);

        assert_eq!(
            result.err(),
            Some(ValidationError::TurnLengthMismatch {
                player: 1,
                expected: 4,
                found: 3
            })
        );
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_commit_turn_is_all_or_nothing() {
        let (game, mut history) = setup(3);
        let mut stale = idle_plan(3);
        stale.actions[2].roster_size = 5;

        assert!(history.commit_turn(&game, &[idle_plan(3), stale]).is_err());
        assert_eq!(history.len(), 1, "no tick of a rejected turn is kept");
    }

    #[test]
    fn test_empty_persisted_history_is_rejected() {
        let result = serde_json::from_str::<History>(r#"{"snapshots":[]}"#);
        assert!(result.is_err(), "a history without snapshots must not load");
    }

    #[test]
    fn test_persisted_history_keeps_snapshot_order() {
        let (game, mut history) = setup(4);
        let tick = GameTick::new(vec![PlayerAction::new(1), PlayerAction::new(1)]);
        history.commit(&game, &tick).unwrap();
        history.commit(&game, &tick).unwrap();

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["snapshots"].as_array().map(Vec::len), Some(3));

        let restored: History = serde_json::from_value(json).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.latest().sequence, 2);
        assert_eq!(restored.get(0).map(|s| s.sequence), Some(0));
        assert_eq!(restored.get(3), None);
    }
}
