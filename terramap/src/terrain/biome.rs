//! Biome layer, splits land between grassland and mountain ranges.

use glam::DVec2;

use crate::chunk::{TerrainKind, WorldBounds};
use crate::util::noise::{DomainWarp, FbmParams};
use crate::util::math::band_blend;

use super::TerrainGenerator;


/// Configuration of the [`BiomeGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeConfig {
    /// World-space center of the map, where the capital is.
    pub center: DVec2,
    /// Under this distance from the center, mountains are suppressed.
    pub capital_radius: f64,
    /// Beyond this distance from the center, the land is only made of small islands
    /// where no mountain range is generated.
    pub outer_radius: f64,
    pub warp: DomainWarp,
    /// Fractal noise of mountain zones.
    pub noise: FbmParams,
    /// Noise value around which the biome switches to mountain zone. Tuned against the
    /// amplitude normalized fractal noise, whose values gather around 0.5.
    pub threshold: f64,
    /// Half width of the smooth transition band around the threshold.
    pub blend_band: f64,
}

impl BiomeConfig {

    /// The default tuning of biomes, scaled to the given world.
    pub fn for_world(bounds: &WorldBounds) -> Self {
        let size = bounds.extent().min_element();
        Self {
            center: bounds.center(),
            capital_radius: size * 0.05,
            outer_radius: size * 0.32,
            warp: DomainWarp {
                frequency: 0.00001,
                amplitude: 2000.0,
                offset: 5678.0,
            },
            noise: FbmParams::new(4, 0.00003, 2.2, 0.45),
            threshold: 0.52,
            blend_band: 0.15,
        }
    }

}


/// The biome layer, gives grassland or no opinion where the mountain layer must decide.
#[derive(Debug, Clone)]
pub struct BiomeGenerator {
    config: BiomeConfig,
}

impl BiomeGenerator {

    pub fn new(config: BiomeConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &BiomeConfig {
        &self.config
    }

    /// Return the mountain zone blend factor at this position, in `[0, 1]`, the position
    /// is a mountain candidate when greater than 0.5. Zero in the capital zone and on
    /// outer islands.
    pub fn mountain_blend(&self, pos: DVec2) -> f64 {

        let config = &self.config;
        let distance = pos.distance(config.center);
        if distance < config.capital_radius || distance > config.outer_radius {
            return 0.0;
        }

        let warped = config.warp.apply(pos);
        band_blend(config.noise.fbm(warped), config.threshold, config.blend_band)

    }

}

impl TerrainGenerator for BiomeGenerator {

    #[inline]
    fn evaluate(&self, pos: DVec2) -> Option<TerrainKind> {
        if self.mountain_blend(pos) > 0.5 {
            None
        } else {
            Some(TerrainKind::Grassland)
        }
    }

}
