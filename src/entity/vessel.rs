//! Vessels - player-owned ships assembled from pixel components

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{rotate, PixelOffset, VesselId};
use crate::entity::component::{FunctionalComponent, FunctionalRole, PixelComponent};

/// A ship in the world
///
/// Component lists are ordered; command activation flags address them by
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub position: Vec2,
    /// Facing in radians (0 is "up", counter-clockwise positive)
    pub facing: f32,
    pub light_hull: PixelComponent,
    pub dark_hull: PixelComponent,
    pub power_core: PixelComponent,
    pub engines: Vec<PixelComponent>,
    pub lasers: Vec<PixelComponent>,
    pub collectors: Vec<PixelComponent>,
    pub shipyards: Vec<PixelComponent>,
}

impl Vessel {
    /// Copy of this vessel carrying a different identity
    pub fn with_identity(mut self, id: VesselId) -> Self {
        self.id = id;
        self
    }

    /// Copy of this vessel placed at `position` with `facing`
    pub fn at(mut self, position: Vec2, facing: f32) -> Self {
        self.position = position;
        self.facing = facing;
        self
    }

    /// Functional components in evaluation order: engines, lasers,
    /// collectors, shipyards, then the power core
    pub fn functional_components(&self) -> impl Iterator<Item = &FunctionalComponent> {
        self.engines
            .iter()
            .chain(self.lasers.iter())
            .chain(self.collectors.iter())
            .chain(self.shipyards.iter())
            .chain(std::iter::once(&self.power_core))
            .filter_map(PixelComponent::functional)
    }

    /// All pixel components: functional components first, then light and
    /// dark hull
    ///
    /// The position in this sequence is the component index used by beam
    /// tie-breaking and [`Vessel::component_mut`].
    pub fn pixel_components(&self) -> impl Iterator<Item = &PixelComponent> {
        self.engines
            .iter()
            .chain(self.lasers.iter())
            .chain(self.collectors.iter())
            .chain(self.shipyards.iter())
            .chain(std::iter::once(&self.power_core))
            .chain(std::iter::once(&self.light_hull))
            .chain(std::iter::once(&self.dark_hull))
    }

    pub fn pixel_components_mut(&mut self) -> impl Iterator<Item = &mut PixelComponent> {
        self.engines
            .iter_mut()
            .chain(self.lasers.iter_mut())
            .chain(self.collectors.iter_mut())
            .chain(self.shipyards.iter_mut())
            .chain(std::iter::once(&mut self.power_core))
            .chain(std::iter::once(&mut self.light_hull))
            .chain(std::iter::once(&mut self.dark_hull))
    }

    /// Component at `index` in [`Vessel::pixel_components`] order
    pub fn component_mut(&mut self, index: usize) -> Option<&mut PixelComponent> {
        self.pixel_components_mut().nth(index)
    }

    /// Mass used by turning, thrust, and shipyard pricing
    ///
    /// Light hull pixels weigh 1, dark hull pixels 2, and each functional
    /// component weighs its size squared.
    pub fn weight(&self) -> f32 {
        let components: f32 = self
            .functional_components()
            .map(|c| c.size * c.size)
            .sum();
        self.light_hull.pixel_count() as f32 + self.dark_hull.pixel_count() as f32 * 2.0 + components
    }

    /// Resources a shipyard must spend to start building this vessel
    pub fn build_cost(&self) -> f32 {
        self.weight()
    }

    /// Construction-seconds a shipyard must accumulate to finish this vessel
    pub fn build_time(&self) -> f32 {
        self.weight()
    }

    /// Radians of turn bought per unit of energy
    pub fn energy_to_radians_conversion(&self) -> f32 {
        self.weight()
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_components().map(PixelComponent::pixel_count).sum()
    }

    /// A vessel whose hull plating has been shot away entirely
    ///
    /// Destroyed vessels stay in their roster; removing them is left to the
    /// caller.
    pub fn is_destroyed(&self) -> bool {
        self.light_hull.is_empty() && self.dark_hull.is_empty()
    }

    /// World position of a vessel-local point
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.facing)
    }

    /// World position of a vessel-local pixel
    pub fn pixel_to_world(&self, pixel: PixelOffset) -> Vec2 {
        self.local_to_world(pixel.as_vec2())
    }

    pub fn stored_energy(&self) -> f32 {
        match self.power_core.functional().map(|f| &f.role) {
            Some(FunctionalRole::PowerCore { stored_energy }) => *stored_energy,
            _ => 0.0,
        }
    }

    pub fn max_energy(&self) -> f32 {
        self.power_core
            .functional()
            .map(FunctionalComponent::max_energy)
            .unwrap_or(0.0)
    }

    /// Draw up to `amount` energy from the power core
    ///
    /// Never takes the store below zero. Returns the energy actually drawn.
    pub fn spend_energy(&mut self, amount: f32) -> f32 {
        if amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        match self.power_core.functional_mut().map(|f| &mut f.role) {
            Some(FunctionalRole::PowerCore { stored_energy }) => {
                let drawn = amount.min(*stored_energy).max(0.0);
                *stored_energy = (*stored_energy - drawn).max(0.0);
                drawn
            }
            _ => 0.0,
        }
    }
}
