//! Programmatic vessel blueprints
//!
//! Assembles vessels out of rectangular pixel blocks. Image-based ship
//! import lives outside this crate; this builder covers decks, fixtures and
//! the headless runner.

use glam::{IVec2, Vec2};

use crate::core::types::{PixelOffset, VesselId};
use crate::entity::component::PixelComponent;
use crate::entity::vessel::Vessel;

/// Pixels of a `width` x `height` rectangle whose lower-left corner is `origin`
pub fn block(origin: PixelOffset, width: i32, height: i32) -> Vec<PixelOffset> {
    let mut pixels = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(origin + IVec2::new(x, y));
        }
    }
    pixels
}

/// Builder for a [`Vessel`]
///
/// Functional parts occupy a single pixel at their root. The resulting vessel
/// carries a placeholder identity; the world assigns a real one when the
/// vessel enters a snapshot.
#[derive(Debug, Clone)]
pub struct VesselBlueprint {
    light_hull: Vec<PixelOffset>,
    dark_hull: Vec<PixelOffset>,
    power_core: PixelComponent,
    engines: Vec<PixelComponent>,
    lasers: Vec<PixelComponent>,
    collectors: Vec<PixelComponent>,
    shipyards: Vec<PixelComponent>,
    position: Vec2,
    facing: f32,
}

impl Default for VesselBlueprint {
    fn default() -> Self {
        Self {
            light_hull: Vec::new(),
            dark_hull: Vec::new(),
            power_core: PixelComponent::power_core(IVec2::ZERO, vec![IVec2::ZERO], 0.0, 0.0),
            engines: Vec::new(),
            lasers: Vec::new(),
            collectors: Vec::new(),
            shipyards: Vec::new(),
            position: Vec2::ZERO,
            facing: 0.0,
        }
    }
}

impl VesselBlueprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn light_hull_block(mut self, origin: PixelOffset, width: i32, height: i32) -> Self {
        self.light_hull.extend(block(origin, width, height));
        self
    }

    pub fn dark_hull_block(mut self, origin: PixelOffset, width: i32, height: i32) -> Self {
        self.dark_hull.extend(block(origin, width, height));
        self
    }

    /// Replace the power core; it starts fully charged
    pub fn power_core(mut self, root: PixelOffset, size: f32, quality: f32) -> Self {
        self.power_core = PixelComponent::power_core(root, vec![IVec2::ZERO], size, quality);
        self
    }

    pub fn engine(mut self, root: PixelOffset, facing: f32, size: f32, quality: f32) -> Self {
        self.engines
            .push(PixelComponent::engine(root, vec![IVec2::ZERO], facing, size, quality));
        self
    }

    pub fn laser(mut self, root: PixelOffset, facing: f32, size: f32, quality: f32) -> Self {
        self.lasers
            .push(PixelComponent::laser(root, vec![IVec2::ZERO], facing, size, quality));
        self
    }

    pub fn collector(mut self, root: PixelOffset, size: f32, quality: f32) -> Self {
        self.collectors
            .push(PixelComponent::collector(root, vec![IVec2::ZERO], size, quality));
        self
    }

    pub fn shipyard(mut self, root: PixelOffset, size: f32, quality: f32) -> Self {
        self.shipyards
            .push(PixelComponent::shipyard(root, vec![IVec2::ZERO], size, quality));
        self
    }

    pub fn at(mut self, position: Vec2, facing: f32) -> Self {
        self.position = position;
        self.facing = facing;
        self
    }

    pub fn build(self) -> Vessel {
        Vessel {
            id: VesselId(0),
            position: self.position,
            facing: self.facing,
            light_hull: PixelComponent::light_hull(IVec2::ZERO, self.light_hull),
            dark_hull: PixelComponent::dark_hull(IVec2::ZERO, self.dark_hull),
            power_core: self.power_core,
            engines: self.engines,
            lasers: self.lasers,
            collectors: self.collectors,
            shipyards: self.shipyards,
        }
    }
}

/// Standard flagship: armoured hull, forward laser battery, rear engines,
/// a collector and a shipyard
pub fn mothership() -> Vessel {
    VesselBlueprint::new()
        .light_hull_block(IVec2::new(-3, -4), 7, 8)
        .dark_hull_block(IVec2::new(-4, -4), 1, 8)
        .dark_hull_block(IVec2::new(4, -4), 1, 8)
        .power_core(IVec2::new(0, 0), 30.0, 2.0)
        .engine(IVec2::new(-2, -5), 0.0, 2.0, 1.0)
        .engine(IVec2::new(2, -5), 0.0, 2.0, 1.0)
        .laser(IVec2::new(-1, 5), 0.0, 2.0, 4.0)
        .laser(IVec2::new(1, 5), 0.0, 2.0, 4.0)
        .collector(IVec2::new(0, -2), 6.0, 1.0)
        .shipyard(IVec2::new(0, 2), 2.0, 2.0)
        .build()
}

/// Small escort a mothership can build
pub fn fighter() -> Vessel {
    VesselBlueprint::new()
        .light_hull_block(IVec2::new(-1, -1), 3, 3)
        .power_core(IVec2::ZERO, 3.0, 1.0)
        .engine(IVec2::new(0, -2), 0.0, 1.0, 2.0)
        .laser(IVec2::new(0, 2), 0.0, 1.0, 3.0)
        .build()
}
