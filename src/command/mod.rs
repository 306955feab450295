//! Player commands
//!
//! A [`Command`] is one vessel's intent for one tick. Commands are grouped
//! per player into a [`PlayerAction`], per tick into a [`GameTick`], and a
//! player authors a whole turn at once as a [`TurnPlan`].

pub mod orders;

pub use orders::{Command, GameTick, PlayerAction, ShipyardOrder, TurnPlan};
