//! Core type definitions used throughout the codebase

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a vessel
///
/// Allocated from the snapshot's identity counter when a vessel enters the
/// world and never reused, so commands can address vessels even after a
/// roster grows mid-tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VesselId(pub u64);

/// Identity of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

/// Integer pixel offset in vessel-local space
pub type PixelOffset = IVec2;

/// Rotate a vector counter-clockwise by `radians`
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// Unit vector a facing angle points along (0 radians is "up", +y)
pub fn heading(facing: f32) -> Vec2 {
    rotate(Vec2::Y, facing)
}
