//! Entity model: pixel components, vessels, players and world snapshots

pub mod blueprint;
pub mod component;
pub mod game;
pub mod vessel;

pub use blueprint::VesselBlueprint;
pub use component::{
    ComponentKind, FunctionalComponent, FunctionalRole, PixelComponent, ShipyardState,
};
pub use game::{Asteroid, Game, Gamestate, Player, PlayerProgress};
pub use vessel::Vessel;
