//! Pixel components - the building blocks of a vessel
//!
//! Every component owns a set of vessel-local pixels and a parallel array of
//! accumulated damage-seconds. What the component *does* is carried by a
//! tagged [`ComponentKind`]: hull plating has no stats, functional parts
//! derive every gameplay number from their size and quality.

use serde::{Deserialize, Serialize};

use crate::core::types::PixelOffset;
use crate::entity::vessel::Vessel;

/// Seconds of beam exposure that destroy a light hull pixel
pub const LIGHT_HULL_SECONDS_TO_DESTROY: f32 = 1.0;
/// Seconds of beam exposure that destroy a dark hull pixel
pub const DARK_HULL_SECONDS_TO_DESTROY: f32 = 3.0;
/// Seconds of beam exposure that destroy a functional component pixel
pub const FUNCTIONAL_SECONDS_TO_DESTROY: f32 = 1.0;

/// Thrust produced per unit of engine size
const ENGINE_THRUST_PER_SIZE: f32 = 5.0;
/// Beam length per unit of laser quality
const LASER_LENGTH_PER_QUALITY: f32 = 5.0;

/// What a pixel component is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentKind {
    LightHull,
    DarkHull,
    Functional(FunctionalComponent),
}

/// Shared payload of every functional part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalComponent {
    /// Local facing relative to the vessel (0 is "up")
    pub facing: f32,
    pub size: f32,
    pub quality: f32,
    pub role: FunctionalRole,
}

/// Role-specific payload of a functional part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionalRole {
    PowerCore { stored_energy: f32 },
    Engine,
    Laser,
    Collector,
    Shipyard(ShipyardState),
}

/// Shipyard production state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ShipyardState {
    #[default]
    Idle,
    /// Construction underway; the blueprint is latched when the build begins
    Building {
        blueprint: Box<Vessel>,
        /// Construction-seconds accumulated toward `blueprint.build_time()`
        progress: f32,
    },
}

impl ShipyardState {
    pub fn is_building(&self) -> bool {
        matches!(self, ShipyardState::Building { .. })
    }

    pub fn progress(&self) -> f32 {
        match self {
            ShipyardState::Idle => 0.0,
            ShipyardState::Building { progress, .. } => *progress,
        }
    }
}

impl FunctionalComponent {
    /// Energy capacity (power cores)
    pub fn max_energy(&self) -> f32 {
        self.size
    }

    /// Recharge rate (power cores)
    pub fn energy_per_second(&self) -> f32 {
        self.quality
    }

    pub fn thrust_per_second(&self) -> f32 {
        match self.role {
            FunctionalRole::Engine => self.size * ENGINE_THRUST_PER_SIZE,
            _ => 0.0,
        }
    }

    /// Energy drawn per second of operation
    ///
    /// Better engines are more efficient; every other active part draws its size.
    pub fn energy_cost_per_second(&self) -> f32 {
        match self.role {
            FunctionalRole::Engine => self.size * (1.0 / (1.0 + self.quality)),
            FunctionalRole::Laser | FunctionalRole::Collector | FunctionalRole::Shipyard(_) => {
                self.size
            }
            FunctionalRole::PowerCore { .. } => 0.0,
        }
    }

    pub fn beam_width(&self) -> f32 {
        self.size
    }

    pub fn beam_length(&self) -> f32 {
        self.quality * LASER_LENGTH_PER_QUALITY
    }

    pub fn collection_radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn collection_efficiency(&self) -> f32 {
        self.quality
    }

    /// Resources gathered per second from an asteroid of the given size
    pub fn resources_per_second(&self, asteroid_size: f32) -> f32 {
        asteroid_size * self.collection_efficiency()
    }

    /// Construction-seconds produced per second of shipyard work
    pub fn build_speed(&self) -> f32 {
        self.quality
    }
}

/// A contiguous set of vessel-relative pixels sharing one damage model
///
/// `offsets` and `damage` are kept the same length by every method on this
/// type, including deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PixelComponentRepr")]
pub struct PixelComponent {
    /// Offset of the component root from the vessel origin
    pub root: PixelOffset,
    /// Pixel offsets relative to `root`
    offsets: Vec<PixelOffset>,
    /// Accumulated damage-seconds, one per pixel
    damage: Vec<f32>,
    pub kind: ComponentKind,
}

#[derive(Deserialize)]
struct PixelComponentRepr {
    root: PixelOffset,
    offsets: Vec<PixelOffset>,
    damage: Vec<f32>,
    kind: ComponentKind,
}

impl TryFrom<PixelComponentRepr> for PixelComponent {
    type Error = String;

    fn try_from(repr: PixelComponentRepr) -> Result<Self, Self::Error> {
        if repr.offsets.len() != repr.damage.len() {
            return Err(format!(
                "pixel component has {} offsets but {} damage entries",
                repr.offsets.len(),
                repr.damage.len()
            ));
        }
        Ok(Self {
            root: repr.root,
            offsets: repr.offsets,
            damage: repr.damage,
            kind: repr.kind,
        })
    }
}

impl PixelComponent {
    /// Create an undamaged component
    pub fn new(root: PixelOffset, offsets: Vec<PixelOffset>, kind: ComponentKind) -> Self {
        let damage = vec![0.0; offsets.len()];
        Self {
            root,
            offsets,
            damage,
            kind,
        }
    }

    pub fn light_hull(root: PixelOffset, offsets: Vec<PixelOffset>) -> Self {
        Self::new(root, offsets, ComponentKind::LightHull)
    }

    pub fn dark_hull(root: PixelOffset, offsets: Vec<PixelOffset>) -> Self {
        Self::new(root, offsets, ComponentKind::DarkHull)
    }

    fn with_role(
        root: PixelOffset,
        offsets: Vec<PixelOffset>,
        facing: f32,
        size: f32,
        quality: f32,
        role: FunctionalRole,
    ) -> Self {
        Self::new(
            root,
            offsets,
            ComponentKind::Functional(FunctionalComponent {
                facing,
                size,
                quality,
                role,
            }),
        )
    }

    /// A power core starts fully charged
    pub fn power_core(root: PixelOffset, offsets: Vec<PixelOffset>, size: f32, quality: f32) -> Self {
        Self::with_role(
            root,
            offsets,
            0.0,
            size,
            quality,
            FunctionalRole::PowerCore { stored_energy: size },
        )
    }

    pub fn engine(
        root: PixelOffset,
        offsets: Vec<PixelOffset>,
        facing: f32,
        size: f32,
        quality: f32,
    ) -> Self {
        Self::with_role(root, offsets, facing, size, quality, FunctionalRole::Engine)
    }

    pub fn laser(
        root: PixelOffset,
        offsets: Vec<PixelOffset>,
        facing: f32,
        size: f32,
        quality: f32,
    ) -> Self {
        Self::with_role(root, offsets, facing, size, quality, FunctionalRole::Laser)
    }

    pub fn collector(root: PixelOffset, offsets: Vec<PixelOffset>, size: f32, quality: f32) -> Self {
        Self::with_role(root, offsets, 0.0, size, quality, FunctionalRole::Collector)
    }

    pub fn shipyard(root: PixelOffset, offsets: Vec<PixelOffset>, size: f32, quality: f32) -> Self {
        Self::with_role(
            root,
            offsets,
            0.0,
            size,
            quality,
            FunctionalRole::Shipyard(ShipyardState::Idle),
        )
    }

    pub fn offsets(&self) -> &[PixelOffset] {
        &self.offsets
    }

    pub fn damage(&self) -> &[f32] {
        &self.damage
    }

    pub fn pixel_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Vessel-local position of a pixel (root + offset)
    pub fn local_pixel(&self, index: usize) -> Option<PixelOffset> {
        self.offsets.get(index).map(|offset| self.root + *offset)
    }

    /// Damage-seconds at which a pixel of this component is destroyed
    pub fn destroy_threshold(&self) -> f32 {
        match self.kind {
            ComponentKind::LightHull => LIGHT_HULL_SECONDS_TO_DESTROY,
            ComponentKind::DarkHull => DARK_HULL_SECONDS_TO_DESTROY,
            ComponentKind::Functional(_) => FUNCTIONAL_SECONDS_TO_DESTROY,
        }
    }

    /// Add damage-seconds to one pixel; out-of-range indices are ignored
    pub fn add_damage(&mut self, index: usize, seconds: f32) {
        if let Some(damage) = self.damage.get_mut(index) {
            *damage += seconds;
        }
    }

    /// Remove every pixel whose damage reached the destroy threshold
    ///
    /// Walks indices from the back so removals don't shift pixels not yet
    /// visited. Returns the number of pixels removed.
    pub fn prune_destroyed(&mut self) -> usize {
        let threshold = self.destroy_threshold();
        let mut removed = 0;
        for i in (0..self.offsets.len()).rev() {
            if self.damage[i] >= threshold {
                self.offsets.remove(i);
                self.damage.remove(i);
                removed += 1;
            }
        }
        removed
    }

    /// Gameplay stats of a working functional component
    ///
    /// `None` for hull plating, and for a functional component whose pixels
    /// have all been shot away: a wrecked part contributes no weight, energy
    /// or action.
    pub fn functional(&self) -> Option<&FunctionalComponent> {
        match &self.kind {
            ComponentKind::Functional(f) if !self.offsets.is_empty() => Some(f),
            _ => None,
        }
    }

    pub fn functional_mut(&mut self) -> Option<&mut FunctionalComponent> {
        if self.offsets.is_empty() {
            return None;
        }
        match &mut self.kind {
            ComponentKind::Functional(f) => Some(f),
            _ => None,
        }
    }

    /// Functional size, zero for hull plating
    pub fn size(&self) -> f32 {
        self.functional().map(|f| f.size).unwrap_or(0.0)
    }
}
