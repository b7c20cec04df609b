//! Ocean layer, cuts the continent shape out of the surrounding ocean.

use glam::DVec2;

use crate::chunk::{TerrainKind, WorldBounds};
use crate::util::noise::{self, DomainWarp, FbmParams};

use super::TerrainGenerator;


/// A landmass of the continent: a rotated ellipse whose border is perturbed by noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmass {
    /// Offset of the ellipse center from the world center.
    pub offset: DVec2,
    /// Half width (X) and half height (Y) of the ellipse before rotation.
    pub half_size: DVec2,
    /// Counter-clockwise rotation of the ellipse, in radians.
    pub rotation: f64,
}

impl Landmass {

    /// Distance of the given position (relative to world center) to the ellipse center,
    /// normalized so that the ellipse border is at 1.
    #[inline]
    pub fn normalized_distance(&self, rel: DVec2) -> f64 {
        let local = DVec2::from_angle(-self.rotation).rotate(rel - self.offset);
        (local / self.half_size).length()
    }

}


/// Configuration of the [`OceanGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct OceanConfig {
    /// World-space center of the continent.
    pub center: DVec2,
    /// Beyond this warped distance from the center, everything is ocean.
    pub outer_radius: f64,
    /// Landmasses whose union forms the continent.
    pub landmasses: Vec<Landmass>,
    /// Warp applied before every shape and threshold test.
    pub warp: DomainWarp,
    /// Frequency of the noise perturbing the landmass borders.
    pub shape_frequency: f64,
    /// Amplitude of the border perturbation, relative to the ellipse size.
    pub shape_amplitude: f64,
    /// Normalized landmass distance under which islands may appear.
    pub island_band: f64,
    /// Fractal noise deciding where islands are carved in the band.
    pub island_noise: FbmParams,
    /// Island noise value from which an island is carved.
    pub island_threshold: f64,
}

impl OceanConfig {

    /// The default tuning of the ocean, scaled to the given world.
    pub fn for_world(bounds: &WorldBounds) -> Self {
        let size = bounds.extent().min_element();
        Self {
            center: bounds.center(),
            outer_radius: size * 0.48,
            landmasses: vec![
                Landmass {
                    offset: DVec2::ZERO,
                    half_size: DVec2::new(0.30, 0.24) * size,
                    rotation: 0.35,
                },
                Landmass {
                    offset: DVec2::new(-0.17, 0.14) * size,
                    half_size: DVec2::new(0.14, 0.10) * size,
                    rotation: -0.6,
                },
                Landmass {
                    offset: DVec2::new(0.18, -0.15) * size,
                    half_size: DVec2::new(0.12, 0.09) * size,
                    rotation: 1.1,
                },
            ],
            warp: DomainWarp {
                frequency: 0.00003,
                amplitude: size * 0.02,
                offset: 5000.0,
            },
            shape_frequency: 0.00008,
            shape_amplitude: 0.12,
            island_band: 1.45,
            island_noise: FbmParams::new(4, 0.00025, 2.0, 0.5),
            island_threshold: 0.62,
        }
    }

}


/// The ocean layer, gives ocean outside of the continent and no opinion on land.
#[derive(Debug, Clone)]
pub struct OceanGenerator {
    config: OceanConfig,
}

impl OceanGenerator {

    pub fn new(config: OceanConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &OceanConfig {
        &self.config
    }

    /// Smallest normalized distance to any landmass, including the noise perturbation of
    /// the borders. Values lower or equal to 1 are on land.
    fn landmass_distance(&self, warped: DVec2) -> f64 {

        let config = &self.config;
        let rel = warped - config.center;
        let f = config.shape_frequency;
        // The border moves outward when the noise is positive, which is the same as
        // scaling down the normalized distance.
        let perturbation = 1.0 + noise::perlin_signed(warped.x * f, warped.y * f) * config.shape_amplitude;

        config.landmasses.iter()
            .map(|landmass| landmass.normalized_distance(rel) / perturbation)
            .fold(f64::INFINITY, f64::min)

    }

}

impl TerrainGenerator for OceanGenerator {

    fn evaluate(&self, pos: DVec2) -> Option<TerrainKind> {

        let config = &self.config;
        let warped = config.warp.apply(pos);

        if warped.distance(config.center) > config.outer_radius {
            return Some(TerrainKind::Ocean);
        }

        let distance = self.landmass_distance(warped);
        if distance <= 1.0 {
            return None;
        }

        if distance <= config.island_band && config.island_noise.fbm(warped) >= config.island_threshold {
            return None;
        }

        Some(TerrainKind::Ocean)

    }

}
