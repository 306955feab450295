//! Deterministic tick simulation
//!
//! [`tick::advance`] is the only way a snapshot turns into the next one.
//! The phase modules each own one step of a vessel's pipeline.

pub mod beam;
pub mod collector;
pub mod history;
pub mod kinematics;
pub mod preview;
pub mod pruning;
pub mod shipyard;
pub mod tick;

pub use beam::{BeamHit, BeamStrip, PixelAddress};
pub use history::History;
pub use preview::{preview_candidates, preview_draft, simulate};
pub use tick::{advance, advance_with_events, player_order, validate_tick, TickEvent};
