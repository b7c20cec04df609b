//! Terrain generation module.
//!
//! The terrain of a tile is decided by independent layers, each layer is asked in a fixed
//! priority order and may either classify the tile or defer to the next layer by giving
//! no opinion. Water layers come first and act as cutouts, land layers then fill the
//! remaining area. All layers are pure functions of the world position and of their
//! immutable configuration, the same position always gives the same terrain.

use glam::DVec2;

use crate::chunk::{TerrainKind, WorldBounds};

mod ocean;
mod lake;
mod biome;
mod mountain;

pub use ocean::{OceanGenerator, OceanConfig, Landmass};
pub use lake::{LakeGenerator, LakeConfig};
pub use biome::{BiomeGenerator, BiomeConfig};
pub use mountain::{MountainGenerator, MountainConfig, SpineRidge, BranchRidge, PeaksConfig};


/// A trait common to all terrain layers. A generator maps a world position to a terrain
/// classification, or to none if this layer has no opinion on that position and the
/// next layer should be asked.
pub trait TerrainGenerator {

    /// Evaluate this layer at the given world position.
    fn evaluate(&self, pos: DVec2) -> Option<TerrainKind>;

}


/// Identifies one of the four terrain layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Ocean,
    Lake,
    Biome,
    Mountain,
}

/// One of the four terrain layers.
#[derive(Debug, Clone)]
pub enum TerrainLayer {
    Ocean(OceanGenerator),
    Lake(LakeGenerator),
    Biome(BiomeGenerator),
    Mountain(MountainGenerator),
}

impl TerrainLayer {

    #[inline]
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Ocean(_) => LayerKind::Ocean,
            Self::Lake(_) => LayerKind::Lake,
            Self::Biome(_) => LayerKind::Biome,
            Self::Mountain(_) => LayerKind::Mountain,
        }
    }

}

impl TerrainGenerator for TerrainLayer {

    #[inline]
    fn evaluate(&self, pos: DVec2) -> Option<TerrainKind> {
        match self {
            Self::Ocean(generator) => generator.evaluate(pos),
            Self::Lake(generator) => generator.evaluate(pos),
            Self::Biome(generator) => generator.evaluate(pos),
            Self::Mountain(generator) => generator.evaluate(pos),
        }
    }

}


/// Resolve the final terrain of any world position by asking each layer in priority
/// order: ocean, lake, biome and then mountain. The first layer giving an opinion wins.
#[derive(Debug, Clone)]
pub struct TerrainCompositor {
    /// Layers in priority order.
    layers: [TerrainLayer; 4],
}

impl TerrainCompositor {

    /// Terrain returned if no layer classifies a position.
    pub const FALLBACK: TerrainKind = TerrainKind::Grassland;

    /// Create a compositor from the four generators.
    pub fn new(
        ocean: OceanGenerator,
        lake: LakeGenerator,
        biome: BiomeGenerator,
        mountain: MountainGenerator,
    ) -> Self {
        Self {
            layers: [
                TerrainLayer::Ocean(ocean),
                TerrainLayer::Lake(lake),
                TerrainLayer::Biome(biome),
                TerrainLayer::Mountain(mountain),
            ],
        }
    }

    /// Create a compositor with the default tuning of every layer for the given world.
    pub fn for_world(bounds: &WorldBounds) -> Self {
        Self::new(
            OceanGenerator::new(OceanConfig::for_world(bounds)),
            LakeGenerator::new(LakeConfig::for_world(bounds)),
            BiomeGenerator::new(BiomeConfig::for_world(bounds)),
            MountainGenerator::new(MountainConfig::for_world(bounds)),
        )
    }

    /// The layers, in priority order.
    #[inline]
    pub fn layers(&self) -> &[TerrainLayer] {
        &self.layers
    }

    /// Resolve the terrain at the given world position.
    #[inline]
    pub fn resolve(&self, pos: DVec2) -> TerrainKind {
        self.resolve_with_layer(pos).0
    }

    /// Resolve the terrain at the given world position and also return the layer that
    /// classified it, none if the fallback terrain has been used.
    pub fn resolve_with_layer(&self, pos: DVec2) -> (TerrainKind, Option<LayerKind>) {

        debug_assert!(pos.is_finite(), "terrain position must be finite: {pos}");

        for layer in &self.layers {
            if let Some(kind) = layer.evaluate(pos) {
                return (kind, Some(layer.kind()));
            }
        }

        (Self::FALLBACK, None)

    }

}

impl Default for TerrainCompositor {
    fn default() -> Self {
        Self::for_world(&WorldBounds::DEFAULT)
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    fn sample_positions(bounds: &WorldBounds) -> impl Iterator<Item = DVec2> {
        let extent = bounds.extent();
        (0..40).flat_map(move |i| (0..40).map(move |j| {
            DVec2::new(i as f64 + 0.37, j as f64 + 0.61) / 40.0 * extent
        }))
    }

    #[test]
    fn deterministic() {
        let bounds = WorldBounds::DEFAULT;
        let a = TerrainCompositor::for_world(&bounds);
        let b = TerrainCompositor::for_world(&bounds);
        for pos in sample_positions(&bounds) {
            let kind = a.resolve(pos);
            assert_eq!(kind, a.resolve(pos));
            assert_eq!(kind, b.resolve(pos));
        }
    }

    #[test]
    fn priority_order() {

        let bounds = WorldBounds::DEFAULT;
        let compositor = TerrainCompositor::for_world(&bounds);
        let layers = compositor.layers();

        assert_eq!(layers.iter().map(TerrainLayer::kind).collect::<Vec<_>>(),
            [LayerKind::Ocean, LayerKind::Lake, LayerKind::Biome, LayerKind::Mountain]);

        let mut ocean_seen = 0;
        for pos in sample_positions(&bounds) {
            let (kind, layer) = compositor.resolve_with_layer(pos);
            // The first layer with an opinion must always be the one used.
            let expected = layers.iter().find_map(|layer| layer.evaluate(pos).map(|k| (k, layer.kind())));
            assert_eq!(Some((kind, layer.unwrap())), expected);
            if let Some(ocean) = layers[0].evaluate(pos) {
                assert_eq!(kind, ocean);
                ocean_seen += 1;
            }
        }

        assert!(ocean_seen > 0);

    }

    #[test]
    fn default_world_proportions() {

        let bounds = WorldBounds::DEFAULT;
        let compositor = TerrainCompositor::for_world(&bounds);
        let extent = bounds.extent();

        let mut counts = [0usize; 4];
        for i in 0..200 {
            for j in 0..200 {
                let pos = DVec2::new(i as f64 + 0.5, j as f64 + 0.5) / 200.0 * extent;
                counts[compositor.resolve(pos) as usize] += 1;
            }
        }

        let [ocean, lake, grassland, mountain] = counts;
        let land = lake + grassland + mountain;
        let total = ocean + land;

        // Every layer must contribute a visible share of the world.
        assert!(ocean * 4 >= total, "{counts:?}");
        assert!(land * 10 >= total, "{counts:?}");
        assert!(lake * 200 >= land, "{counts:?}");
        assert!(mountain * 200 >= land, "{counts:?}");
        assert!(grassland * 2 >= land, "{counts:?}");

    }

    #[test]
    fn shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TerrainCompositor>();
    }

    #[test]
    fn world_corner_is_ocean() {
        let compositor = TerrainCompositor::default();
        assert_eq!(compositor.resolve_with_layer(DVec2::ZERO), (TerrainKind::Ocean, Some(LayerKind::Ocean)));
    }

    #[test]
    fn world_center_is_land() {
        let bounds = WorldBounds::DEFAULT;
        let compositor = TerrainCompositor::for_world(&bounds);
        let (kind, layer) = compositor.resolve_with_layer(bounds.center());
        assert_ne!(kind, TerrainKind::Ocean);
        assert_ne!(layer, Some(LayerKind::Ocean));
    }

    #[test]
    fn mountain_always_commits() {
        let bounds = WorldBounds::DEFAULT;
        let compositor = TerrainCompositor::for_world(&bounds);
        for pos in sample_positions(&bounds) {
            assert!(compositor.layers()[3].evaluate(pos).is_some());
            assert!(compositor.resolve_with_layer(pos).1.is_some());
        }
    }

}
