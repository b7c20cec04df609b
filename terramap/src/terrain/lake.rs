//! Lake layer.

use glam::DVec2;

use crate::chunk::{TerrainKind, WorldBounds};
use crate::util::noise::{self, DomainWarp, FbmParams};

use super::TerrainGenerator;


/// Configuration of the [`LakeGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct LakeConfig {
    pub warp: DomainWarp,
    /// Base fractal noise of lake basins.
    pub noise: FbmParams,
    /// Frequency of the high frequency term roughening the shores.
    pub detail_frequency: f64,
    /// Amplitude of the shore detail term.
    pub detail_amplitude: f64,
    /// Noise value at or under which the tile is a lake. The fractal noise is amplitude
    /// normalized, so its values gather around 0.5 and this sits in its lower tail.
    pub threshold: f64,
}

impl LakeConfig {

    /// The default tuning of lakes. Lakes are local features, so the tuning does not
    /// depend on the world size.
    pub fn for_world(_bounds: &WorldBounds) -> Self {
        Self {
            warp: DomainWarp {
                frequency: 0.00005,
                amplitude: 600.0,
                offset: 3100.0,
            },
            noise: FbmParams::new(4, 0.00012, 2.0, 0.5),
            detail_frequency: 0.002,
            detail_amplitude: 0.03,
            threshold: 0.38,
        }
    }

}


/// The lake layer, gives lakes where the noise is low and no opinion elsewhere.
#[derive(Debug, Clone)]
pub struct LakeGenerator {
    config: LakeConfig,
}

impl LakeGenerator {

    pub fn new(config: LakeConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &LakeConfig {
        &self.config
    }

    /// The lake noise value at the given position, lower is wetter.
    pub fn value(&self, pos: DVec2) -> f64 {
        let config = &self.config;
        let warped = config.warp.apply(pos);
        let f = config.detail_frequency;
        let detail = noise::perlin_signed(warped.x * f, warped.y * f) * config.detail_amplitude;
        config.noise.fbm(warped) + detail
    }

}

impl TerrainGenerator for LakeGenerator {

    #[inline]
    fn evaluate(&self, pos: DVec2) -> Option<TerrainKind> {
        (self.value(pos) <= self.config.threshold).then_some(TerrainKind::Lake)
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    fn positions() -> impl Iterator<Item = DVec2> {
        (0..400).map(|i| DVec2::new(i as f64 * 251.3, (i % 37) as f64 * 977.1))
    }

    #[test]
    fn threshold_extremes() {

        let mut config = LakeConfig::for_world(&WorldBounds::DEFAULT);

        config.threshold = 2.0;
        let everywhere = LakeGenerator::new(config.clone());
        config.threshold = -1.0;
        let nowhere = LakeGenerator::new(config);

        for pos in positions() {
            assert_eq!(everywhere.evaluate(pos), Some(TerrainKind::Lake));
            assert_eq!(nowhere.evaluate(pos), None);
        }

    }

    #[test]
    fn threshold_inclusive() {
        let mut config = LakeConfig::for_world(&WorldBounds::DEFAULT);
        let pos = DVec2::new(12345.0, 6789.0);
        config.threshold = LakeGenerator::new(config.clone()).value(pos);
        assert_eq!(LakeGenerator::new(config).evaluate(pos), Some(TerrainKind::Lake));
    }

    #[test]
    fn default_lake_share() {

        let bounds = WorldBounds::DEFAULT;
        let lake = LakeGenerator::new(LakeConfig::for_world(&bounds));
        let extent = bounds.extent();

        let mut lakes = 0;
        for i in 0..100 {
            for j in 0..100 {
                let pos = DVec2::new(i as f64 + 0.5, j as f64 + 0.5) / 100.0 * extent;
                if lake.evaluate(pos).is_some() {
                    lakes += 1;
                }
            }
        }

        // Lakes are a visible but minor part of the world.
        assert!(lakes >= 100 && lakes <= 2500, "{lakes}");

    }

    #[test]
    fn value_range() {
        let lake = LakeGenerator::new(LakeConfig::for_world(&WorldBounds::DEFAULT));
        for pos in positions() {
            let value = lake.value(pos);
            assert!(value >= -0.03 && value <= 1.03, "{value}");
        }
    }

}
